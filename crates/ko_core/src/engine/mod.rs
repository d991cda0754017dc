//! Simulation engine: per-tick event generation, state transitions,
//! pause/review handling, delayed resolutions and the session scheduler.

pub mod commentary;
pub mod generator;
pub mod pause;
pub mod resolution;
pub mod session;
pub mod transition;
