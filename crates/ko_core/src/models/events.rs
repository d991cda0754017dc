//! Match events: immutable once created, appended to the log in
//! generation order.

use serde::{Deserialize, Serialize};

use super::TeamSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    KickOff,
    Goal,
    /// Long-range strike from the chaos category; never reviewed.
    WonderGoal,
    /// Credited to the benefiting side; the actor is from the conceding
    /// squad.
    OwnGoal,
    /// A goal overturned on review.
    GoalDisallowed,
    Shot,
    Foul,
    YellowCard,
    RedCard,
    Corner,
    /// First phase of the two-phase penalty; the outcome follows as a
    /// delayed resolution.
    PenaltyAwarded,
    PenaltyScored,
    PenaltyMissed,
    Injury,
    ManagerDismissed,
    HalfTime,
    FullTime,
}

impl EventKind {
    /// Scoring-type kinds use weighted actor selection.
    pub fn is_scoring_type(self) -> bool {
        matches!(
            self,
            EventKind::Goal
                | EventKind::WonderGoal
                | EventKind::Shot
                | EventKind::PenaltyAwarded
                | EventKind::PenaltyScored
                | EventKind::PenaltyMissed
        )
    }
}

/// VAR verdict attached to reviewed goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Allowed,
    Disallowed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u8,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub side: TeamSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    /// Ticker line shown to the viewer.
    pub narrative: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewDecision>,
}

impl MatchEvent {
    pub fn new(
        minute: u8,
        kind: EventKind,
        side: TeamSide,
        player: Option<String>,
        narrative: impl Into<String>,
    ) -> Self {
        Self { minute, kind, side, player, narrative: narrative.into(), review: None }
    }
}
