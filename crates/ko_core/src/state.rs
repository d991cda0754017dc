//! The single mutable aggregate for one match.
//!
//! MatchState is owned exclusively by the session; every mutation goes
//! through the transition processor or the resolution queue's apply path.
//! Invariants (momentum conservation, monotone counters) hold by
//! construction: writes clamp before committing.

use serde::{Deserialize, Serialize};

use crate::config::RateParameters;
use crate::models::events::MatchEvent;
use crate::models::{SidePair, TeamSide};
use crate::tuning::clock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn total(self) -> u8 {
        self.home + self.away
    }

    pub fn get(self, side: TeamSide) -> u8 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    /// Goals are only ever added, never removed.
    pub fn add(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home = self.home.saturating_add(1),
            TeamSide::Away => self.away = self.away.saturating_add(1),
        }
    }
}

/// Conserved dominance pair: `home + away == 100` always. Fields stay
/// private so every write goes through the clamp-then-rederive path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    home: f32,
    away: f32,
}

impl Momentum {
    pub fn new(home_share: f32) -> Self {
        let home = home_share.clamp(0.0, 100.0);
        Self { home, away: 100.0 - home }
    }

    pub fn home(self) -> f32 {
        self.home
    }

    pub fn away(self) -> f32 {
        self.away
    }

    pub fn get(self, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    /// Moves momentum toward `side` by `delta` points (negative deltas move
    /// it away). Clamps to [0, 100] first, then re-derives the complement,
    /// so the sum is exactly 100 after every call.
    pub fn shift(&mut self, side: TeamSide, delta: f32) {
        let home = match side {
            TeamSide::Home => self.home + delta,
            TeamSide::Away => self.home - delta,
        };
        if !(0.0..=100.0).contains(&home) {
            tracing::debug!(requested = home, "momentum clamped to range");
        }
        self.home = home.clamp(0.0, 100.0);
        self.away = 100.0 - self.home;
    }
}

/// Per-side monotone counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub shots: u16,
    pub shots_on_target: u16,
    pub fouls: u16,
    pub corners: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
}

/// Captured exactly once, the first time the clock reaches 45.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfTimeSnapshot {
    pub score: Score,
    pub momentum: Momentum,
    pub stats: SidePair<TeamStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Simulated minute, monotone, capped at 90.
    pub minute: f32,
    pub score: Score,
    pub momentum: Momentum,
    /// Derived from momentum each tick: `round(momentum.home)` and its
    /// complement.
    pub possession: SidePair<u8>,
    pub stats: SidePair<TeamStats>,
    /// Append-only, in generation order.
    pub events: Vec<MatchEvent>,
    pub half_time: Option<HalfTimeSnapshot>,
    /// Working copy of the per-90 xg rates; decays when a goal is
    /// disallowed on review. RateParameters itself stays immutable.
    pub effective_xg: SidePair<f32>,
}

impl MatchState {
    pub fn new(params: &RateParameters) -> Self {
        let momentum = Momentum::new(params.home_possession);
        let mut state = Self {
            minute: 0.0,
            score: Score::default(),
            momentum,
            possession: SidePair::uniform(50),
            stats: SidePair::default(),
            events: Vec::new(),
            half_time: None,
            effective_xg: SidePair::new(params.xg_home, params.xg_away),
        };
        state.refresh_possession();
        state
    }

    /// Advances the clock, capping at full time. Returns the tick's
    /// simulated duration actually applied.
    pub fn advance_clock(&mut self, minutes: f32) -> f32 {
        let before = self.minute;
        self.minute = (self.minute + minutes.max(0.0)).min(clock::FULL_TIME_MINUTE);
        self.minute - before
    }

    pub fn is_full_time(&self) -> bool {
        self.minute >= clock::FULL_TIME_MINUTE
    }

    /// Current minute for event stamping.
    pub fn display_minute(&self) -> u8 {
        self.minute.min(clock::FULL_TIME_MINUTE) as u8
    }

    pub fn refresh_possession(&mut self) {
        let home = self.momentum.home().round().clamp(0.0, 100.0) as u8;
        self.possession = SidePair::new(home, 100 - home);
    }

    /// Captures the half-time snapshot on the first call at minute >= 45.
    /// Returns true only on that first capture.
    pub fn capture_half_time(&mut self) -> bool {
        if self.half_time.is_some() || self.minute < clock::HALF_TIME_MINUTE {
            return false;
        }
        self.half_time = Some(HalfTimeSnapshot {
            score: self.score,
            momentum: self.momentum,
            stats: self.stats,
        });
        true
    }

    pub fn push_event(&mut self, event: MatchEvent) {
        self.events.push(event);
    }
}
