mod common;

use common::{assert_close, keys, started_engine, FRAME};
use kickoff_core::{
    engine::SimEngine,
    event::SimEvent,
    snapshot::SimSnapshot,
    state::PlayerId,
};

fn give_ball(engine: &mut SimEngine, owner: PlayerId) {
    engine.state_mut().ball.owner = Some(owner);
}

#[test]
fn holding_shoot_for_three_frames_fires_once() {
    let mut engine = started_engine("shoot", 11);
    give_ball(&mut engine, PlayerId::One);
    let held = keys(&["KeyF"]);

    let first = engine.tick(0.016, &held).unwrap();
    let shots = first.iter().filter(|e| matches!(e, SimEvent::ShotFired { .. })).count();
    assert_eq!(shots, 1);
    assert_eq!(engine.state().ball.owner, None);
    assert_eq!(engine.state().players[0].shoot_cooldown, 2.0);
    assert!(engine.state().ball.vx > 0.0, "Player 1 shoots toward the right goal");

    engine.run_ticks(2, 0.016, &held).unwrap();

    assert_eq!(engine.event_log().count_of("shot_fired"), 1);
    assert_close(engine.state().players[0].shoot_cooldown, 2.0 - 2.0 * 0.016, "cooldown");
}

#[test]
fn kickoff_layout_is_exact_and_owner_is_drawn() {
    let mut owners = Vec::new();
    for seed in 0..32 {
        let engine = started_engine("kickoff", seed);
        let state = engine.state();

        assert_eq!((state.players[0].x, state.players[0].y), (240.0, 270.0));
        assert_eq!((state.players[1].x, state.players[1].y), (720.0, 270.0));
        assert_eq!((state.ball.x, state.ball.y), (480.0, 270.0));
        assert_eq!((state.ball.vx, state.ball.vy), (0.0, 0.0));
        owners.push(state.ball.owner.expect("kickoff always has an owner"));
    }

    assert!(owners.contains(&PlayerId::One));
    assert!(owners.contains(&PlayerId::Two));
}

#[test]
fn owner_carries_the_ball_in_front() {
    let mut engine = started_engine("carry", 12);
    give_ball(&mut engine, PlayerId::Two);

    engine.run_ticks(10, FRAME, &keys(&["ArrowUp"])).unwrap();

    let state = engine.state();
    let p2 = &state.players[1];
    assert_eq!(state.ball.owner, Some(PlayerId::Two));
    assert_close(state.ball.x, p2.x - 24.0, "ball x");
    assert_close(state.ball.y, p2.y, "ball y");
    assert!(p2.y < 270.0);
}

#[test]
fn tackles_through_the_engine_either_win_or_stun() {
    let mut won = 0;
    let mut missed = 0;

    for seed in 0..40 {
        let mut engine = started_engine("tackle", seed);
        {
            let state = engine.state_mut();
            state.players[0].x = 400.0;
            state.players[0].y = 270.0;
            state.players[1].x = 440.0;
            state.players[1].y = 270.0;
            state.ball.owner = Some(PlayerId::Two);
        }

        let events = engine.tick(FRAME, &keys(&["KeyG"])).unwrap();
        let state = engine.state();
        let p1 = &state.players[0];
        assert_eq!(p1.tackle_cooldown, 1.5);

        if events.iter().any(|e| matches!(e, SimEvent::TackleWon { .. })) {
            won += 1;
            assert_eq!(state.ball.owner, Some(PlayerId::One));
            assert!(!p1.is_stunned());
            assert_eq!(engine.hud().status.as_deref(), Some("Player 1 won a tackle!"));
        } else {
            missed += 1;
            assert!(events.iter().any(|e| matches!(e, SimEvent::TackleMissed { .. })));
            assert_eq!(state.ball.owner, Some(PlayerId::Two));
            assert_eq!(p1.stunned_for, 0.5);
            assert_eq!(
                engine.hud().status.as_deref(),
                Some("Player 1 missed tackle and is stunned.")
            );
        }
    }

    assert!(won > 0 && missed > 0, "won {won}, missed {missed}");
}

#[test]
fn stunned_player_does_not_move() {
    let mut engine = started_engine("stun", 13);
    engine.state_mut().players[0].stunned_for = 0.5;

    engine.tick(FRAME, &keys(&["KeyD"])).unwrap();

    assert_eq!(engine.state().players[0].x, 240.0);
    assert!(engine.state().players[0].stunned_for < 0.5);
}

#[test]
fn snapshot_round_trips_and_resumes_identically() {
    let mut original = started_engine("snap", 21);
    original.run_ticks(45, FRAME, &keys(&["KeyD", "ArrowLeft"])).unwrap();

    let snapshot = original.snapshot();
    let json = snapshot.to_json().unwrap();
    let parsed = SimSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed, snapshot);
    assert_eq!(parsed.tick, 45);

    let mut resumed = common::build_engine("other", 21);
    resumed.restore(parsed);
    assert_eq!(resumed.match_id, "snap");
    assert_eq!(resumed.state(), original.state());

    let script = keys(&["KeyS", "KeyF", "ArrowUp", "KeyL"]);
    original.run_ticks(30, FRAME, &script).unwrap();
    resumed.run_ticks(30, FRAME, &script).unwrap();
    assert_eq!(resumed.state(), original.state());
    assert_eq!(resumed.clock.current_tick, original.clock.current_tick);
}

#[test]
fn malformed_snapshot_is_a_serialization_error() {
    let err = SimSnapshot::from_json("{\"tick\": \"soon\"}").unwrap_err();
    assert!(matches!(err, kickoff_core::error::SimError::Serialization(_)));
}

#[test]
fn restore_keeps_the_configured_frame_clamp() {
    let mut original = started_engine("clamp-restore", 31);
    original.run_ticks(5, FRAME, &keys(&[])).unwrap();

    let mut snapshot = original.snapshot();
    snapshot.clock.max_frame_dt = 5.0;

    let mut resumed = common::build_engine("clamp-restore", 31);
    resumed.restore(snapshot);
    assert_eq!(resumed.clock.max_frame_dt, resumed.config().max_frame_dt);

    let before = resumed.state().elapsed;
    resumed.tick(2.0, &keys(&[])).unwrap();
    assert_close(resumed.state().elapsed - before, 0.033, "elapsed after an oversized frame");
    assert_eq!(resumed.clock.last_dt, 0.033);
}

fn shot_angle(events: &[SimEvent]) -> f64 {
    events
        .iter()
        .find_map(|e| match e {
            SimEvent::ShotFired { angle, .. } => Some(*angle),
            _ => None,
        })
        .expect("a shot was fired")
}

#[test]
fn restored_match_draws_from_the_snapshot_seed() {
    for seed in 0..20u64 {
        let mut original = started_engine("seeded", seed);
        original.run_ticks(3, FRAME, &keys(&[])).unwrap();
        give_ball(&mut original, PlayerId::One);
        let snapshot = original.snapshot();
        assert_eq!(snapshot.seed, seed);

        let mut resumed = common::build_engine("seeded", seed + 1000);
        resumed.restore(snapshot);
        assert_eq!(resumed.rng_bank.master_seed(), seed);

        let expected = shot_angle(&original.tick(FRAME, &keys(&["KeyF"])).unwrap());
        let actual = shot_angle(&resumed.tick(FRAME, &keys(&["KeyF"])).unwrap());
        assert_eq!(actual, expected, "seed {seed}: resumed shot diverged");
        assert_eq!(resumed.state(), original.state());
    }
}
