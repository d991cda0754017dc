//! Pause-for-review state machine.
//!
//! Running -> Paused on any pause request; Paused -> Running automatically
//! once the request's real-time duration elapses (the match clock does not
//! advance while paused); Running -> FullTime at minute 90, terminal.
//! A request arriving while already paused replaces the current one.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    VarReview,
    PenaltyCheck,
    Injury,
    RedCard,
    ManagerDismissed,
}

/// Emitted by the transition processor; consumed by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseRequest {
    pub reason: PauseReason,
    /// Display payload (ticker line shown while play is held up).
    pub detail: String,
    pub duration_ms: u64,
}

impl PauseRequest {
    pub fn new(reason: PauseReason, detail: impl Into<String>, duration_ms: u64) -> Self {
        Self { reason, detail: detail.into(), duration_ms }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum MatchPhase {
    Running,
    Paused { reason: PauseReason, detail: String, until_ms: u64 },
    FullTime,
}

#[derive(Debug, Clone)]
pub struct PauseController {
    phase: MatchPhase,
}

impl Default for PauseController {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseController {
    pub fn new() -> Self {
        Self { phase: MatchPhase::Running }
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, MatchPhase::Paused { .. })
    }

    pub fn is_full_time(&self) -> bool {
        self.phase == MatchPhase::FullTime
    }

    /// Enters (or replaces, no stacking) the paused phase. Ignored after
    /// full time.
    pub fn request(&mut self, req: PauseRequest, now_ms: u64) {
        if self.is_full_time() {
            return;
        }
        debug!(reason = ?req.reason, duration_ms = req.duration_ms, "pausing for review");
        self.phase = MatchPhase::Paused {
            reason: req.reason,
            detail: req.detail,
            until_ms: now_ms.saturating_add(req.duration_ms),
        };
    }

    /// Auto-resumes once the pause window has elapsed. Returns true if a
    /// resume happened on this call.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if let MatchPhase::Paused { until_ms, .. } = self.phase {
            if now_ms >= until_ms {
                debug!("review complete, resuming play");
                self.phase = MatchPhase::Running;
                return true;
            }
        }
        false
    }

    /// Terminal transition; no further pause or resume is possible.
    pub fn finish(&mut self) {
        self.phase = MatchPhase::FullTime;
    }

    pub fn reset(&mut self) {
        self.phase = MatchPhase::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(reason: PauseReason, duration_ms: u64) -> PauseRequest {
        PauseRequest::new(reason, "check in progress", duration_ms)
    }

    #[test]
    fn test_pause_then_auto_resume() {
        let mut pc = PauseController::new();
        pc.request(req(PauseReason::VarReview, 3_000), 1_000);
        assert!(pc.is_paused());
        assert!(!pc.poll(3_999));
        assert!(pc.is_paused());
        assert!(pc.poll(4_000));
        assert_eq!(*pc.phase(), MatchPhase::Running);
    }

    #[test]
    fn test_new_request_replaces_current_pause() {
        let mut pc = PauseController::new();
        pc.request(req(PauseReason::Injury, 10_000), 0);
        pc.request(req(PauseReason::RedCard, 1_000), 500);
        // The injury window no longer applies; the replacement expires first.
        assert!(pc.poll(1_500));
    }

    #[test]
    fn test_full_time_is_terminal() {
        let mut pc = PauseController::new();
        pc.finish();
        assert!(pc.is_full_time());
        pc.request(req(PauseReason::VarReview, 1_000), 0);
        assert!(pc.is_full_time());
        assert!(!pc.poll(u64::MAX));
        assert!(pc.is_full_time());
    }

    #[test]
    fn test_reset_returns_to_running() {
        let mut pc = PauseController::new();
        pc.finish();
        pc.reset();
        assert_eq!(*pc.phase(), MatchPhase::Running);
    }
}
