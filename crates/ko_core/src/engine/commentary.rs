//! Ticker lines for generated events.
//!
//! Purely cosmetic; drawn from the session rng so the full event log stays
//! reproducible under a fixed seed.

use rand::Rng;

use crate::models::events::EventKind;

/// Picks a narrative line for an event. `team` is the event's credited
/// side's name; `player` the actor if one was selected.
pub fn line<R: Rng>(kind: EventKind, team: &str, player: Option<&str>, rng: &mut R) -> String {
    let who = player.unwrap_or(team);
    let templates: &[&str] = match kind {
        EventKind::KickOff => &["The referee blows the whistle and we are underway."],
        EventKind::Goal => &[
            "GOAL! {who} finds the net for {team}!",
            "{who} slots it home. {team} strike!",
            "It's in! {who} scores for {team}!",
        ],
        EventKind::WonderGoal => &[
            "UNBELIEVABLE! {who} smashes one in from thirty yards!",
            "A strike for the ages from {who}!",
        ],
        EventKind::OwnGoal => &[
            "Disaster! {who} turns it into his own net. {team} profit!",
            "An own goal! {who} will want to forget that one.",
        ],
        EventKind::GoalDisallowed => &[
            "NO GOAL! The review rules it out. {team} are denied!",
            "The video official overturns it. No goal for {team}.",
        ],
        EventKind::Shot => &[
            "{who} lets fly from distance.",
            "{who} tries his luck for {team}.",
            "Effort from {who}, dealt with.",
        ],
        EventKind::Foul => &[
            "{who} is penalized for a late challenge.",
            "Free kick given against {who}.",
        ],
        EventKind::YellowCard => &[
            "{who} goes into the book.",
            "Yellow card shown to {who}.",
        ],
        EventKind::RedCard => &[
            "RED CARD! {who} is off! {team} down to ten!",
            "{who} sees red. A huge moment in this match.",
        ],
        EventKind::Corner => &["Corner to {team}.", "{team} win a corner."],
        EventKind::PenaltyAwarded => &[
            "PENALTY to {team}! {who} stands over the ball...",
            "The referee points to the spot! {who} will take it for {team}.",
        ],
        EventKind::PenaltyScored => &[
            "{who} buries the penalty! {team} score!",
            "Cool as you like. {who} converts from the spot.",
        ],
        EventKind::PenaltyMissed => &[
            "SAVED! {who} is denied from the spot!",
            "{who} blazes the penalty over! A let-off!",
        ],
        EventKind::Injury => &[
            "{who} is down and needs treatment.",
            "Play stops; {who} can't continue without the physio.",
        ],
        EventKind::ManagerDismissed => &[
            "The {team} manager is sent to the stands after furious protests!",
        ],
        EventKind::HalfTime => &["The referee brings the first half to a close."],
        EventKind::FullTime => &["Full time. That's all from this one."],
    };
    let template = templates[rng.gen_range(0..templates.len())];
    template.replace("{who}", who).replace("{team}", team)
}
