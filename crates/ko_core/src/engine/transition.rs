//! State transition processor.
//!
//! Applies an ordered batch of candidate events to MatchState and collects
//! the side effects (pause requests, delayed resolutions) for the session
//! to route. Every momentum write clamps to [0, 100] and re-derives its
//! complement, so the conservation invariant holds after every event, not
//! just at batch end.

use rand::Rng;

use crate::config::RateParameters;
use crate::models::events::{EventKind, MatchEvent, ReviewDecision};
use crate::models::squad::Squad;
use crate::models::{SidePair, TeamSide};
use crate::state::MatchState;
use crate::tuning::{momentum, pause as pause_ms, penalty, review, shots};

use super::pause::{PauseReason, PauseRequest};
use super::resolution::{PendingResolution, ResolutionKind};

/// Work the session must carry out after the batch is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Pause(PauseRequest),
    Schedule(PendingResolution),
}

/// Applies `events` in order, appending each (possibly rewritten by a
/// review) to the log. Possession is re-derived once after the batch.
pub fn apply_events<R: Rng>(
    state: &mut MatchState,
    params: &RateParameters,
    events: Vec<MatchEvent>,
    now_ms: u64,
    generation: u64,
    rng: &mut R,
) -> Vec<SideEffect> {
    let mut effects = Vec::new();
    for event in events {
        apply_event(state, params, event, now_ms, generation, rng, &mut effects);
    }
    state.refresh_possession();
    effects
}

fn apply_event<R: Rng>(
    state: &mut MatchState,
    params: &RateParameters,
    mut event: MatchEvent,
    now_ms: u64,
    generation: u64,
    rng: &mut R,
    effects: &mut Vec<SideEffect>,
) {
    let side = event.side;
    match event.kind {
        EventKind::Goal => {
            if rng.gen::<f32>() * 100.0 < params.review_pct {
                let disallowed = rng.gen::<f32>() < review::DISALLOW_PCT;
                effects.push(SideEffect::Pause(PauseRequest::new(
                    PauseReason::VarReview,
                    format!("VAR check: possible goal for {:?}", side),
                    pause_ms::VAR_MS,
                )));
                if disallowed {
                    event.kind = EventKind::GoalDisallowed;
                    event.review = Some(ReviewDecision::Disallowed);
                    event.narrative = format!("NO GOAL! The review rules it out. {}", event.narrative);
                    // The attempt still counts as a shot on target.
                    record_shot(state, side, true);
                    state.momentum.shift(side, -momentum::DISALLOWED_PENALTY);
                    // Finishing-inefficiency correction.
                    let xg = state.effective_xg.get_mut(side);
                    *xg *= review::XG_DECAY;
                } else {
                    event.review = Some(ReviewDecision::Allowed);
                    apply_goal(state, side, momentum::GOAL_DELTA);
                }
            } else {
                apply_goal(state, side, momentum::GOAL_DELTA);
            }
        }
        EventKind::WonderGoal => {
            apply_goal(state, side, momentum::WONDER_GOAL_DELTA);
        }
        EventKind::OwnGoal => {
            // `side` is already the credited side; no shot is recorded.
            state.score.add(side);
            state.momentum.shift(side, momentum::GOAL_DELTA);
        }
        EventKind::Foul => {
            state.stats.get_mut(side).fouls += 1;
        }
        EventKind::YellowCard => {
            state.stats.get_mut(side).yellow_cards += 1;
            state.momentum.shift(side, -momentum::YELLOW_PENALTY);
        }
        EventKind::RedCard => {
            state.stats.get_mut(side).red_cards += 1;
            state.momentum.shift(side, -momentum::RED_PENALTY);
            effects.push(SideEffect::Pause(PauseRequest::new(
                PauseReason::RedCard,
                event.narrative.clone(),
                pause_ms::RED_CARD_MS,
            )));
        }
        EventKind::Shot => {
            let on_target = rng.gen::<f32>() < shots::ON_TARGET_PCT;
            record_shot(state, side, on_target);
        }
        EventKind::Corner => {
            state.stats.get_mut(side).corners += 1;
        }
        EventKind::PenaltyAwarded => {
            // Outcome decided now, revealed after the real-time delay.
            let scored = rng.gen::<f32>() < penalty::SCORED_PCT;
            let player = event.player.clone().unwrap_or_default();
            effects.push(SideEffect::Pause(PauseRequest::new(
                PauseReason::PenaltyCheck,
                event.narrative.clone(),
                pause_ms::PENALTY_MS,
            )));
            effects.push(SideEffect::Schedule(PendingResolution {
                kind: ResolutionKind::Penalty { scored },
                side,
                player,
                fire_at_ms: now_ms.saturating_add(penalty::RESOLUTION_DELAY_MS),
                generation,
            }));
        }
        EventKind::PenaltyMissed => {
            // Chaos-category miss, revealed immediately.
            record_shot(state, side, true);
            state.momentum.shift(side, -momentum::PENALTY_MISSED_PENALTY);
        }
        EventKind::Injury => {
            state.momentum.shift(side, -momentum::INJURY_PENALTY);
            effects.push(SideEffect::Pause(PauseRequest::new(
                PauseReason::Injury,
                event.narrative.clone(),
                pause_ms::INJURY_MS,
            )));
        }
        EventKind::ManagerDismissed => {
            state.momentum.shift(side, -momentum::MANAGER_PENALTY);
            effects.push(SideEffect::Pause(PauseRequest::new(
                PauseReason::ManagerDismissed,
                event.narrative.clone(),
                pause_ms::MANAGER_MS,
            )));
        }
        // Bookkeeping kinds carry no state mutation.
        EventKind::KickOff
        | EventKind::GoalDisallowed
        | EventKind::PenaltyScored
        | EventKind::HalfTime
        | EventKind::FullTime => {}
    }
    state.push_event(event);
}

/// Applies a fired delayed resolution directly, bypassing the per-tick
/// generator: the outcome was fixed at schedule time and is not subject to
/// momentum-based probability.
pub fn apply_resolution<R: Rng>(
    state: &mut MatchState,
    squads: &SidePair<Squad>,
    res: PendingResolution,
    rng: &mut R,
) {
    let minute = state.display_minute();
    match res.kind {
        ResolutionKind::Penalty { scored } => {
            let kind = if scored { EventKind::PenaltyScored } else { EventKind::PenaltyMissed };
            record_shot(state, res.side, true);
            if scored {
                state.score.add(res.side);
                state.momentum.shift(res.side, momentum::PENALTY_SCORED_DELTA);
            } else {
                state.momentum.shift(res.side, -momentum::PENALTY_MISSED_PENALTY);
            }
            let team = &squads.get(res.side).name;
            let narrative = super::commentary::line(kind, team, Some(&res.player), rng);
            state.push_event(MatchEvent::new(minute, kind, res.side, Some(res.player), narrative));
        }
    }
    state.refresh_possession();
}

fn apply_goal(state: &mut MatchState, side: TeamSide, delta: f32) {
    record_shot(state, side, true);
    state.score.add(side);
    state.momentum.shift(side, delta);
}

fn record_shot(state: &mut MatchState, side: TeamSide, on_target: bool) {
    let stats = state.stats.get_mut(side);
    stats.shots += 1;
    if on_target {
        stats.shots_on_target += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::momentum as m;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixtures() -> (MatchState, RateParameters, ChaCha8Rng) {
        let params = RateParameters::default();
        (MatchState::new(&params), params, ChaCha8Rng::seed_from_u64(99))
    }

    fn event(kind: EventKind, side: TeamSide) -> MatchEvent {
        MatchEvent::new(10, kind, side, Some("Okafor".to_string()), "...")
    }

    #[test]
    fn test_red_card_applies_exact_momentum_penalty() {
        let (mut state, params, mut rng) = fixtures();
        let home_before = state.momentum.home();
        let effects = apply_events(
            &mut state,
            &params,
            vec![event(EventKind::RedCard, TeamSide::Home)],
            0,
            0,
            &mut rng,
        );
        assert!((state.momentum.home() - (home_before - m::RED_PENALTY)).abs() < 1e-4);
        assert!((state.momentum.away() - (100.0 - state.momentum.home())).abs() < 1e-4);
        assert_eq!(state.stats.home.red_cards, 1);
        assert!(effects
            .iter()
            .any(|e| matches!(e, SideEffect::Pause(p) if p.reason == PauseReason::RedCard)));
    }

    #[test]
    fn test_unreviewed_goal_increments_score_and_shots() {
        let (mut state, mut params, mut rng) = fixtures();
        params.review_pct = 0.0;
        apply_events(
            &mut state,
            &params,
            vec![event(EventKind::Goal, TeamSide::Away)],
            0,
            0,
            &mut rng,
        );
        assert_eq!(state.score.away, 1);
        assert_eq!(state.stats.away.shots, 1);
        assert_eq!(state.stats.away.shots_on_target, 1);
        assert!((state.momentum.away() - (50.0 + m::GOAL_DELTA)).abs() < 1e-4);
        assert_eq!(state.events.len(), 1);
        assert!(state.events[0].review.is_none());
    }

    #[test]
    fn test_reviewed_goals_pause_and_sometimes_disallow() {
        let (_, mut params, mut rng) = fixtures();
        params.review_pct = 100.0;
        let mut allowed = 0;
        let mut disallowed = 0;
        for _ in 0..400 {
            let mut state = MatchState::new(&params);
            let effects = apply_events(
                &mut state,
                &params,
                vec![event(EventKind::Goal, TeamSide::Home)],
                0,
                0,
                &mut rng,
            );
            assert!(effects
                .iter()
                .any(|e| matches!(e, SideEffect::Pause(p) if p.reason == PauseReason::VarReview)));
            match state.events[0].review {
                Some(ReviewDecision::Allowed) => {
                    allowed += 1;
                    assert_eq!(state.score.home, 1);
                    assert_eq!(state.events[0].kind, EventKind::Goal);
                }
                Some(ReviewDecision::Disallowed) => {
                    disallowed += 1;
                    assert_eq!(state.score.home, 0);
                    assert_eq!(state.events[0].kind, EventKind::GoalDisallowed);
                    assert!(state.effective_xg.home < params.xg_home);
                    assert!(
                        (state.momentum.home() - (50.0 - m::DISALLOWED_PENALTY)).abs() < 1e-4
                    );
                }
                None => panic!("reviewed goal without a decision"),
            }
        }
        assert!(allowed > 0 && disallowed > 0, "{allowed} allowed / {disallowed} disallowed");
    }

    #[test]
    fn test_penalty_schedules_resolution_with_delay() {
        let (mut state, params, mut rng) = fixtures();
        let now_ms = 12_345;
        let effects = apply_events(
            &mut state,
            &params,
            vec![event(EventKind::PenaltyAwarded, TeamSide::Home)],
            now_ms,
            3,
            &mut rng,
        );
        // Score untouched until the resolution fires.
        assert_eq!(state.score.home, 0);
        let scheduled = effects.iter().find_map(|e| match e {
            SideEffect::Schedule(res) => Some(res.clone()),
            _ => None,
        });
        let res = scheduled.expect("penalty must schedule a resolution");
        assert_eq!(res.fire_at_ms, now_ms + crate::tuning::penalty::RESOLUTION_DELAY_MS);
        assert_eq!(res.generation, 3);
        assert_eq!(res.side, TeamSide::Home);
        assert!(effects
            .iter()
            .any(|e| matches!(e, SideEffect::Pause(p) if p.reason == PauseReason::PenaltyCheck)));
    }

    #[test]
    fn test_penalty_resolution_scored_and_missed() {
        let (mut state, _, mut rng) = fixtures();
        let squads = crate::models::squad::default_squads();
        apply_resolution(
            &mut state,
            &squads,
            PendingResolution {
                kind: ResolutionKind::Penalty { scored: true },
                side: TeamSide::Away,
                player: "Kovacs".to_string(),
                fire_at_ms: 0,
                generation: 0,
            },
            &mut rng,
        );
        assert_eq!(state.score.away, 1);
        assert_eq!(state.events.last().unwrap().kind, EventKind::PenaltyScored);

        let momentum_before = state.momentum.home();
        apply_resolution(
            &mut state,
            &squads,
            PendingResolution {
                kind: ResolutionKind::Penalty { scored: false },
                side: TeamSide::Home,
                player: "Okafor".to_string(),
                fire_at_ms: 0,
                generation: 0,
            },
            &mut rng,
        );
        assert_eq!(state.score.home, 0);
        assert_eq!(state.events.last().unwrap().kind, EventKind::PenaltyMissed);
        assert!(state.momentum.home() < momentum_before);
    }

    #[test]
    fn test_counters_are_monotone_across_batches() {
        let (mut state, mut params, mut rng) = fixtures();
        params.review_pct = 50.0;
        let mut last_stats = state.stats;
        let mut last_score = state.score;
        for i in 0..200 {
            let side = if i % 2 == 0 { TeamSide::Home } else { TeamSide::Away };
            let kinds = [
                EventKind::Foul,
                EventKind::Shot,
                EventKind::Corner,
                EventKind::Goal,
                EventKind::YellowCard,
            ];
            let batch = vec![event(kinds[i % kinds.len()], side)];
            apply_events(&mut state, &params, batch, i as u64 * 100, 0, &mut rng);
            for side in TeamSide::BOTH {
                let now = state.stats.get(side);
                let was = last_stats.get(side);
                assert!(now.shots >= was.shots);
                assert!(now.fouls >= was.fouls);
                assert!(now.corners >= was.corners);
                assert!(now.yellow_cards >= was.yellow_cards);
                assert!(state.score.get(side) >= last_score.get(side));
            }
            assert!((state.momentum.home() + state.momentum.away() - 100.0).abs() < 1e-3);
            assert_eq!(state.possession.home + state.possession.away, 100);
            last_stats = state.stats;
            last_score = state.score;
        }
    }
}
