//! Poisson correct-score matrix.
//!
//! Stateless numeric helpers; the matrix is rebuilt from scratch on every
//! recompute.

use serde::{Deserialize, Serialize};

use crate::state::MatchState;
use crate::tuning::odds;

const CELLS: usize = odds::MAX_GOALS + 1;

/// Correct-score probabilities and display odds for final scores
/// 0-4 x 0-4, indexed `[home_goals][away_goals]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    pub probabilities: [[f32; CELLS]; CELLS],
    pub odds: [[f32; CELLS]; CELLS],
}

/// `P(k; lambda) = e^-lambda * lambda^k / k!`
pub fn pmf(k: u32, lambda: f32) -> f32 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    (-lambda).exp() * lambda.powi(k as i32) / factorial(k)
}

fn factorial(k: u32) -> f32 {
    (1..=k).fold(1.0, |acc, n| acc * n as f32)
}

/// Projected final goal count for one side: goals already scored plus the
/// remaining share of the (decayed) expected-goals rate.
pub fn projected_goals(current: u8, xg_per_90: f32, minute: f32) -> f32 {
    let remaining_ratio = ((90.0 - minute) / 90.0).clamp(0.0, 1.0);
    current as f32 + xg_per_90 * remaining_ratio
}

/// Builds the matrix: independent Poisson marginals per side, with the
/// live-score cell boosted multiplicatively as the match progresses (the
/// current score becomes ever more likely to be the final one). The matrix
/// is renormalized after the boost; displayed odds are `1 / probability`,
/// capped.
pub fn score_matrix(state: &MatchState) -> ScoreMatrix {
    let lambda_home =
        projected_goals(state.score.home, state.effective_xg.home, state.minute);
    let lambda_away =
        projected_goals(state.score.away, state.effective_xg.away, state.minute);
    let elapsed_ratio = (state.minute / 90.0).clamp(0.0, 1.0);
    let boost = 1.0 + odds::LIVE_CELL_BOOST * elapsed_ratio;

    let mut probabilities = [[0.0f32; CELLS]; CELLS];
    let mut total = 0.0;
    for (h, row) in probabilities.iter_mut().enumerate() {
        for (a, cell) in row.iter_mut().enumerate() {
            let mut p = pmf(h as u32, lambda_home) * pmf(a as u32, lambda_away);
            if h == state.score.home as usize && a == state.score.away as usize {
                p *= boost;
            }
            *cell = p;
            total += p;
        }
    }
    if total > 0.0 {
        for row in probabilities.iter_mut() {
            for cell in row.iter_mut() {
                *cell /= total;
            }
        }
    }

    let mut display = [[0.0f32; CELLS]; CELLS];
    for h in 0..CELLS {
        for a in 0..CELLS {
            let p = probabilities[h][a];
            display[h][a] = if p > 0.0 {
                (1.0 / p).clamp(odds::MIN_ODDS, 500.0)
            } else {
                500.0
            };
        }
    }

    ScoreMatrix { probabilities, odds: display }
}
