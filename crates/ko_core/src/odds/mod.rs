//! Odds and value-bet analytics.
//!
//! Pure recomputation from the current MatchState after every tick; the
//! only retained state is the bounded per-minute odds history. The market
//! model is hand-tuned interpolation, not a real bookmaker feed.

pub mod poisson;
pub mod value;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::RateParameters;
use crate::state::MatchState;
use crate::tuning::odds as tuning;

pub use poisson::ScoreMatrix;
pub use value::{Confidence, ValueBet};

/// Decimal odds for the match-winner market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreeWayOdds {
    pub home: f32,
    pub draw: f32,
    pub away: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverUnderOdds {
    pub line: f32,
    pub over: f32,
    pub under: f32,
    /// Current total plus remaining expected goals.
    pub projected_total: f32,
}

/// Both-teams-to-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BttsOdds {
    pub yes: f32,
    pub no: f32,
}

/// One point of the rolling market history, keyed by simulated minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsPoint {
    pub minute: u8,
    pub three_way: ThreeWayOdds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub three_way: ThreeWayOdds,
    pub over_under: OverUnderOdds,
    pub btts: BttsOdds,
    pub correct_score: ScoreMatrix,
    pub value_bets: Vec<ValueBet>,
    pub history: Vec<OddsPoint>,
}

#[derive(Debug, Clone)]
pub struct OddsEngine {
    history: VecDeque<OddsPoint>,
    snapshot: OddsSnapshot,
}

impl OddsEngine {
    pub fn new(state: &MatchState, params: &RateParameters) -> Self {
        let mut engine = Self { history: VecDeque::new(), snapshot: compute(state, params, &[]) };
        engine.recompute(state, params);
        engine
    }

    /// Rebuilds the full odds board from the given state. Appends one
    /// history point per simulated minute, bounded.
    pub fn recompute(&mut self, state: &MatchState, params: &RateParameters) {
        let three_way = three_way_odds(state, params);
        let minute = state.display_minute();
        let record = self.history.back().map(|p| p.minute != minute).unwrap_or(true);
        if record {
            self.history.push_back(OddsPoint { minute, three_way });
            while self.history.len() > tuning::HISTORY_LIMIT {
                self.history.pop_front();
            }
        }
        let history: Vec<OddsPoint> = self.history.iter().copied().collect();
        self.snapshot = compute(state, params, &history);
    }

    pub fn snapshot(&self) -> &OddsSnapshot {
        &self.snapshot
    }
}

fn compute(state: &MatchState, params: &RateParameters, history: &[OddsPoint]) -> OddsSnapshot {
    let three_way = three_way_odds(state, params);
    let over_under = over_under_odds(state);
    let btts = btts_odds(state);
    let correct_score = poisson::score_matrix(state);
    let value_bets = value::detect(state, &three_way, &over_under);
    OddsSnapshot { three_way, over_under, btts, correct_score, value_bets, history: history.to_vec() }
}

/// Match-winner probabilities interpolated between a pre-match base (from
/// the xg split) and a scoreline-dictated target, weighted by elapsed
/// time. The leader's odds shorten as the clock runs down; the trailing
/// side lengthens.
fn win_probabilities(state: &MatchState, params: &RateParameters) -> (f32, f32, f32) {
    let xg_home = params.xg_home.max(0.05);
    let xg_away = params.xg_away.max(0.05);
    let share = xg_home / (xg_home + xg_away);
    let base = (share * 0.75, 0.25, (1.0 - share) * 0.75);

    let diff = state.score.home as i32 - state.score.away as i32;
    let target = match diff {
        0 => (0.30, 0.40, 0.30),
        1 => (0.78, 0.16, 0.06),
        2 => (0.92, 0.06, 0.02),
        d if d >= 3 => (0.97, 0.025, 0.005),
        -1 => (0.06, 0.16, 0.78),
        -2 => (0.02, 0.06, 0.92),
        _ => (0.005, 0.025, 0.97),
    };

    // Quadratic ramp: the scoreline barely matters early, dominates late.
    let t = {
        let elapsed = (state.minute / 90.0).clamp(0.0, 1.0);
        elapsed * elapsed
    };
    let home = base.0 * (1.0 - t) + target.0 * t;
    let draw = base.1 * (1.0 - t) + target.1 * t;
    let away = base.2 * (1.0 - t) + target.2 * t;
    let total = home + draw + away;
    (home / total, draw / total, away / total)
}

fn three_way_odds(state: &MatchState, params: &RateParameters) -> ThreeWayOdds {
    let (home, draw, away) = win_probabilities(state, params);
    ThreeWayOdds { home: to_odds(home), draw: to_odds(draw), away: to_odds(away) }
}

fn over_under_odds(state: &MatchState) -> OverUnderOdds {
    let remaining_ratio = ((90.0 - state.minute) / 90.0).clamp(0.0, 1.0);
    let projected_total = state.score.total() as f32
        + (state.effective_xg.home + state.effective_xg.away) * remaining_ratio;
    let (over, under) = if projected_total >= 4.0 {
        (1.22, 4.20)
    } else if projected_total >= 3.25 {
        (1.45, 2.75)
    } else if projected_total >= 2.5 {
        (1.80, 2.00)
    } else if projected_total >= 1.75 {
        (2.50, 1.52)
    } else {
        (3.40, 1.30)
    };
    OverUnderOdds { line: tuning::TOTAL_LINE, over, under, projected_total }
}

fn btts_odds(state: &MatchState) -> BttsOdds {
    let remaining_ratio = ((90.0 - state.minute) / 90.0).clamp(0.0, 1.0);
    let p_side = |scored: u8, xg: f32| -> f32 {
        if scored > 0 {
            1.0
        } else {
            // P(at least one goal) under the remaining Poisson mass.
            1.0 - (-xg * remaining_ratio).exp()
        }
    };
    let p_yes = (p_side(state.score.home, state.effective_xg.home)
        * p_side(state.score.away, state.effective_xg.away))
    .clamp(0.02, 0.98);
    BttsOdds { yes: to_odds(p_yes), no: to_odds(1.0 - p_yes) }
}

fn to_odds(probability: f32) -> f32 {
    if probability <= 0.0 {
        return tuning::MAX_ODDS;
    }
    (1.0 / probability).clamp(tuning::MIN_ODDS, tuning::MAX_ODDS)
}
