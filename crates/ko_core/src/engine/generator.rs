//! Per-tick stochastic event generation.
//!
//! One independent Bernoulli trial per phenomenon per side, with
//! `p = (rate_per_90 / 90) * tick_minutes * modifiers`. Trials are
//! independent, so several events can fire in the same tick. The draw
//! order is fixed (home before away, phenomena in a fixed sequence) to
//! keep a seeded run byte-identical.

use rand::Rng;

use crate::config::RateParameters;
use crate::models::events::{EventKind, MatchEvent};
use crate::models::squad::Squad;
use crate::models::{SidePair, TeamSide};
use crate::state::MatchState;
use crate::tuning::{cards, penalty, shots};

use super::commentary;

/// Chaos category picks uniformly among these.
const CHAOS_KINDS: [EventKind; 6] = [
    EventKind::RedCard,
    EventKind::WonderGoal,
    EventKind::OwnGoal,
    EventKind::PenaltyMissed,
    EventKind::Injury,
    EventKind::ManagerDismissed,
];

/// Samples this tick's candidate events. `tick_minutes` is the simulated
/// duration of the tick as a fraction of a minute. Returns nothing at or
/// past full time; the session additionally never calls this while paused.
pub fn generate<R: Rng>(
    state: &MatchState,
    params: &RateParameters,
    squads: &SidePair<Squad>,
    tick_minutes: f32,
    rng: &mut R,
) -> Vec<MatchEvent> {
    if state.is_full_time() || tick_minutes <= 0.0 {
        return Vec::new();
    }

    let minute = state.display_minute();
    let mut events = Vec::new();

    for side in TeamSide::BOTH {
        let squad = squads.get(side);
        let stats = state.stats.get(side);

        // Goals feed on momentum: a dominant side converts at a higher
        // rate, using the review-decayed effective xg.
        let momentum_factor = state.momentum.get(side) / 100.0;
        let p_goal = per_tick(*state.effective_xg.get(side), tick_minutes) * momentum_factor;
        if rng.gen::<f32>() < p_goal {
            events.push(scoring_event(EventKind::Goal, side, minute, squad, rng));
        }

        let shot_rate = *state.effective_xg.get(side) * shots::SHOTS_PER_XG;
        if rng.gen::<f32>() < per_tick(shot_rate, tick_minutes) {
            events.push(scoring_event(EventKind::Shot, side, minute, squad, rng));
        }

        let p_foul = per_tick(params.fouls_per_90, tick_minutes) * cards::CALIBRATION;
        if rng.gen::<f32>() < p_foul {
            events.push(uniform_event(EventKind::Foul, side, minute, squad, rng));
        }

        // Yellow needs a foul history on the side; red needs a prior
        // yellow. Keeps early-minute cards out without touching the rates.
        let p_yellow = per_tick(params.yellows_per_90, tick_minutes) * cards::CALIBRATION;
        if stats.fouls > cards::YELLOW_FOUL_THRESHOLD && rng.gen::<f32>() < p_yellow {
            events.push(uniform_event(EventKind::YellowCard, side, minute, squad, rng));
        }

        if stats.yellow_cards >= 1 && rng.gen::<f32>() < per_tick(params.reds_per_90, tick_minutes)
        {
            events.push(uniform_event(EventKind::RedCard, side, minute, squad, rng));
        }

        if rng.gen::<f32>() < per_tick(params.corners_per_90, tick_minutes) {
            events.push(uniform_event(EventKind::Corner, side, minute, squad, rng));
        }

        if rng.gen::<f32>() < per_tick(penalty::AWARD_PER_90, tick_minutes) {
            events.push(scoring_event(EventKind::PenaltyAwarded, side, minute, squad, rng));
        }
    }

    // One extra trial for the unexpected. Scaled by tick length so the
    // chaos frequency is invariant under speed changes.
    if rng.gen::<f32>() < (params.chaos_pct / 100.0) * tick_minutes {
        events.push(chaos_event(squads, minute, rng));
    }

    events
}

fn per_tick(rate_per_90: f32, tick_minutes: f32) -> f32 {
    (rate_per_90 / 90.0) * tick_minutes
}

fn scoring_event<R: Rng>(
    kind: EventKind,
    side: TeamSide,
    minute: u8,
    squad: &Squad,
    rng: &mut R,
) -> MatchEvent {
    let player = squad.weighted_scorer(rng).name.clone();
    let narrative = commentary::line(kind, &squad.name, Some(&player), rng);
    MatchEvent::new(minute, kind, side, Some(player), narrative)
}

fn uniform_event<R: Rng>(
    kind: EventKind,
    side: TeamSide,
    minute: u8,
    squad: &Squad,
    rng: &mut R,
) -> MatchEvent {
    let player = squad.any_player(rng).name.clone();
    let narrative = commentary::line(kind, &squad.name, Some(&player), rng);
    MatchEvent::new(minute, kind, side, Some(player), narrative)
}

fn chaos_event<R: Rng>(squads: &SidePair<Squad>, minute: u8, rng: &mut R) -> MatchEvent {
    let kind = CHAOS_KINDS[rng.gen_range(0..CHAOS_KINDS.len())];
    let side = if rng.gen::<bool>() { TeamSide::Home } else { TeamSide::Away };
    match kind {
        // Own goal: the unlucky defender belongs to `side`, the goal is
        // credited to the opponent.
        EventKind::OwnGoal => {
            let credited = side.opponent();
            let player = squads.get(side).any_player(rng).name.clone();
            let narrative =
                commentary::line(kind, &squads.get(credited).name, Some(&player), rng);
            MatchEvent::new(minute, kind, credited, Some(player), narrative)
        }
        EventKind::RedCard | EventKind::Injury => {
            uniform_event(kind, side, minute, squads.get(side), rng)
        }
        // The manager has no squad entry.
        EventKind::ManagerDismissed => {
            let narrative = commentary::line(kind, &squads.get(side).name, None, rng);
            MatchEvent::new(minute, kind, side, None, narrative)
        }
        // Wonder goal / missed penalty take a weighted scorer.
        _ => scoring_event(kind, side, minute, squads.get(side), rng),
    }
}
