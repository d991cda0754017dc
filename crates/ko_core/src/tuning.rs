//! Calibration constants for the simulation and odds layers.
//!
//! These are empirically tuned values, not derived from a deeper model.
//! Keep them named here so recalibration never means hunting through the
//! engine for magic numbers.

/// Tick cadence and clock scaling.
pub mod clock {
    /// Real-time interval between scheduler ticks (one per rendering frame).
    pub const MS_PER_TICK: u64 = 250;
    /// Simulated minutes one tick represents at speed 1.
    pub const MINUTES_PER_TICK: f32 = 0.05;
    /// Speed multiplier bounds for `set_speed`.
    pub const SPEED_MIN: f32 = 1.0;
    pub const SPEED_MAX: f32 = 20.0;
    /// Regulation length in simulated minutes.
    pub const FULL_TIME_MINUTE: f32 = 90.0;
    pub const HALF_TIME_MINUTE: f32 = 45.0;
}

/// Momentum deltas applied by the transition processor. All values are
/// points on the conserved 0-100 scale.
pub mod momentum {
    pub const GOAL_DELTA: f32 = 12.0;
    pub const WONDER_GOAL_DELTA: f32 = 15.0;
    pub const DISALLOWED_PENALTY: f32 = 8.0;
    pub const YELLOW_PENALTY: f32 = 4.0;
    pub const RED_PENALTY: f32 = 10.0;
    pub const INJURY_PENALTY: f32 = 5.0;
    pub const MANAGER_PENALTY: f32 = 6.0;
    pub const PENALTY_SCORED_DELTA: f32 = 10.0;
    pub const PENALTY_MISSED_PENALTY: f32 = 7.0;
}

/// Goal-review (VAR) behavior.
pub mod review {
    /// Probability a reviewed goal is disallowed.
    pub const DISALLOW_PCT: f32 = 0.35;
    /// Multiplicative decay applied to a side's effective xg per
    /// disallowed goal (finishing-inefficiency correction).
    pub const XG_DECAY: f32 = 0.9;
}

/// Penalty award and resolution.
pub mod penalty {
    /// Penalties awarded per 90 minutes.
    pub const AWARD_PER_90: f32 = 0.3;
    /// Probability the taker converts, decided at enqueue time.
    pub const SCORED_PCT: f32 = 0.76;
    /// Real-time delay before the outcome is revealed.
    pub const RESOLUTION_DELAY_MS: u64 = 4_000;
}

/// Card frequency calibration.
pub mod cards {
    /// Multiplier applied to foul and yellow rates to hit realistic
    /// per-match card counts.
    pub const CALIBRATION: f32 = 1.4;
    /// A yellow requires more than this many prior fouls on the side.
    pub const YELLOW_FOUL_THRESHOLD: u16 = 2;
}

/// Shot volume and quality.
pub mod shots {
    /// Shots per 90 are derived from xg: `xg * SHOTS_PER_XG`.
    pub const SHOTS_PER_XG: f32 = 7.5;
    /// Secondary probability a generated shot is on target.
    pub const ON_TARGET_PCT: f32 = 0.45;
}

/// Real-time pause durations per review reason.
pub mod pause {
    pub const VAR_MS: u64 = 3_000;
    pub const PENALTY_MS: u64 = 3_500;
    pub const INJURY_MS: u64 = 4_000;
    pub const RED_CARD_MS: u64 = 2_500;
    pub const MANAGER_MS: u64 = 3_000;
}

/// Odds board calibration.
pub mod odds {
    /// Rolling history bound (one point per simulated minute, so the
    /// chart window covers the last hour of play).
    pub const HISTORY_LIMIT: usize = 60;
    /// Displayed odds bounds.
    pub const MIN_ODDS: f32 = 1.01;
    pub const MAX_ODDS: f32 = 50.0;
    /// Correct-score cells run 0..=MAX_GOALS per side.
    pub const MAX_GOALS: usize = 4;
    /// Live-score cell boost at full time (scales linearly with elapsed
    /// ratio, 1.0 at kick-off).
    pub const LIVE_CELL_BOOST: f32 = 4.0;
    /// Over/under line.
    pub const TOTAL_LINE: f32 = 2.5;
    /// Minimum model-vs-implied edge before a market is flagged.
    pub const VALUE_MARGIN: f32 = 0.10;
}
