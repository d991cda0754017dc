//! # ko_core - Tick-Driven Football Match Simulation Engine
//!
//! Simulates a football match as a stream of probabilistically generated
//! events (goals, cards, fouls, penalties, reviews) driving an evolving
//! match state, with a derived betting-odds analytics layer on top.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same event log)
//! - Conserved two-sided momentum feeding back into event probabilities
//! - VAR-style pause/review interruptions and delayed penalty resolutions
//! - Live three-way / over-under / correct-score odds with value-bet flags

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod odds;
pub mod state;
pub mod tuning;

pub use config::RateParameters;
pub use engine::pause::{MatchPhase, PauseReason, PauseRequest};
pub use engine::resolution::{PendingResolution, ResolutionKind};
pub use engine::session::{MatchSession, MatchSnapshot};
pub use error::{ConfigError, Result};
pub use models::events::{EventKind, MatchEvent, ReviewDecision};
pub use models::squad::{Player, Squad};
pub use models::{SidePair, TeamSide};
pub use odds::{OddsSnapshot, ThreeWayOdds};
pub use state::{MatchState, Momentum, Score, TeamStats};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
