//! Value-bet detection.
//!
//! Compares a simplified "actual" probability heuristic (momentum plus
//! current scoreline) against the market's implied probability (`1/odds`)
//! and flags any market where the model edge clears the margin.

use serde::{Deserialize, Serialize};

use crate::models::TeamSide;
use crate::state::MatchState;
use crate::tuning::odds as tuning;

use super::{OverUnderOdds, ThreeWayOdds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_edge(edge: f32) -> Self {
        if edge > 0.25 {
            Confidence::High
        } else if edge > 0.17 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    /// Market label, e.g. `home_win` or `over_2.5`.
    pub market: String,
    pub odds: f32,
    /// Model probability.
    pub actual: f32,
    /// `1 / odds`.
    pub implied: f32,
    pub edge: f32,
    pub confidence: Confidence,
}

/// Heuristic win probability for one side: momentum-weighted base plus a
/// scoreline nudge. Deliberately simpler than the market model so the two
/// can disagree.
fn actual_win_probability(state: &MatchState, side: TeamSide) -> f32 {
    let momentum_share = state.momentum.get(side) / 100.0;
    let diff = state.score.get(side) as f32 - state.score.get(side.opponent()) as f32;
    (0.20 + 0.45 * momentum_share + 0.12 * diff).clamp(0.02, 0.95)
}

/// Over-line heuristic: tail probability of the projected total under a
/// Poisson model.
fn actual_over_probability(projected_total: f32) -> f32 {
    let under: f32 = (0..=2).map(|k| super::poisson::pmf(k, projected_total)).sum();
    (1.0 - under).clamp(0.01, 0.99)
}

pub fn detect(
    state: &MatchState,
    three_way: &ThreeWayOdds,
    over_under: &OverUnderOdds,
) -> Vec<ValueBet> {
    let mut bets = Vec::new();
    let candidates = [
        ("home_win", three_way.home, actual_win_probability(state, TeamSide::Home)),
        ("away_win", three_way.away, actual_win_probability(state, TeamSide::Away)),
        ("over_2.5", over_under.over, actual_over_probability(over_under.projected_total)),
    ];
    for (market, market_odds, actual) in candidates {
        if market_odds <= 0.0 {
            continue;
        }
        let implied = 1.0 / market_odds;
        let edge = actual - implied;
        if edge > tuning::VALUE_MARGIN {
            bets.push(ValueBet {
                market: market.to_string(),
                odds: market_odds,
                actual,
                implied,
                edge,
                confidence: Confidence::from_edge(edge),
            });
        }
    }
    // Biggest edge first.
    bets.sort_by(|a, b| b.edge.partial_cmp(&a.edge).unwrap_or(std::cmp::Ordering::Equal));
    bets
}
