//! Per-match rate configuration.
//!
//! Immutable once the match has kicked off; the session rejects
//! reconfiguration after minute 0.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Expected event rates for one match, expressed per 90 minutes unless
/// noted. Validated on `configure`; a rejected set leaves the previous
/// configuration intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    /// Expected goals per 90 for the home side.
    pub xg_home: f32,
    /// Expected goals per 90 for the away side.
    pub xg_away: f32,
    pub fouls_per_90: f32,
    pub yellows_per_90: f32,
    pub reds_per_90: f32,
    pub corners_per_90: f32,
    /// Home possession share at kick-off, 0-100. Seeds momentum.
    pub home_possession: f32,
    /// Probability (0-100) a goal is routed through a VAR review.
    pub review_pct: f32,
    /// Probability weight (0-50) that an unexpected event (wonder goal,
    /// own goal, straight red, injury...) fires in a given simulated
    /// minute.
    pub chaos_pct: f32,
}

impl Default for RateParameters {
    fn default() -> Self {
        Self {
            xg_home: 1.5,
            xg_away: 1.2,
            fouls_per_90: 22.0,
            yellows_per_90: 3.5,
            reds_per_90: 0.08,
            corners_per_90: 10.0,
            home_possession: 50.0,
            review_pct: 25.0,
            chaos_pct: 3.0,
        }
    }
}

impl RateParameters {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("xg_home", self.xg_home),
            ("xg_away", self.xg_away),
            ("fouls_per_90", self.fouls_per_90),
            ("yellows_per_90", self.yellows_per_90),
            ("reds_per_90", self.reds_per_90),
            ("corners_per_90", self.corners_per_90),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeRate { field, value });
            }
        }
        Self::check_range("home_possession", self.home_possession, 0.0, 100.0)?;
        Self::check_range("review_pct", self.review_pct, 0.0, 100.0)?;
        Self::check_range("chaos_pct", self.chaos_pct, 0.0, 50.0)?;
        Ok(())
    }

    fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::OutOfRange { field, value, min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RateParameters::default().validate().is_ok());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let params = RateParameters { xg_away: -0.1, ..Default::default() };
        assert_eq!(
            params.validate(),
            Err(ConfigError::NegativeRate { field: "xg_away", value: -0.1 })
        );
    }

    #[test]
    fn test_possession_out_of_range_rejected() {
        let params = RateParameters { home_possession: 120.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::OutOfRange { field: "home_possession", .. })
        ));
    }

    #[test]
    fn test_chaos_capped_at_fifty() {
        let params = RateParameters { chaos_pct: 50.0, ..Default::default() };
        assert!(params.validate().is_ok());
        let params = RateParameters { chaos_pct: 50.1, ..Default::default() };
        assert!(params.validate().is_err());
    }
}
