use thiserror::Error;

/// Errors surfaced by the session API.
///
/// Internal inconsistencies (momentum drift, negative counters) never reach
/// the caller: every mutation clamps before committing, so those states are
/// unrepresentable rather than checked at runtime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rate `{field}` must be non-negative, got {value}")]
    NegativeRate { field: &'static str, value: f32 },

    #[error("`{field}` must be within {min}..={max}, got {value}")]
    OutOfRange { field: &'static str, value: f32, min: f32, max: f32 },

    #[error("parameters can only be changed before kick-off")]
    MatchInProgress,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
