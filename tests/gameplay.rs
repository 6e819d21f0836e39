//! Whole games driven through the public API

use palm_breaker::consts::*;
use palm_breaker::sim::{self, GameConfig, GameEvent, GamePhase, GameState, TickInput, tick};
use palm_breaker::{FrameScheduler, RenderFrame, TrackingFrame, TrackingSlot, Variant};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn test_perfect_paddle_never_loses() {
    let mut state = GameState::new(GameConfig::hand_tracked(), 7);
    sim::restart(&mut state);
    let mut aim = Pcg32::seed_from_u64(11);
    let mut all_events = Vec::new();

    for step in 0..20_000 {
        // Keep the ball over the middle of the paddle, off-centre enough to
        // vary the bounce angle
        let offset = aim.random_range(0.3..0.7);
        state.paddle.x = state.ball.pos.x - state.paddle.width * offset;

        let events = tick(
            &mut state,
            &TickInput {
                now_ms: step as f64 * FRAME_DELAY_MS,
                tracking: None,
            },
        );
        all_events.extend(events);

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.ball.active);
    }

    let destroyed = count(&all_events, |e| matches!(e, GameEvent::BrickDestroyed { .. }));
    let level_ups = count(&all_events, |e| matches!(e, GameEvent::LevelUp { .. }));
    let paddle_hits = count(&all_events, |e| matches!(e, GameEvent::PaddleHit));

    assert_eq!(state.lives, 3);
    assert!(state.stats.score > 0);
    assert_eq!(state.stats.score as usize, destroyed);
    assert_eq!(state.stats.hits as usize, paddle_hits);
    assert_eq!(level_ups, state.level as usize - 1);
}

#[test]
fn test_classic_miss_ends_game() {
    let mut state = GameState::new(GameConfig::classic(), 3);
    sim::restart(&mut state);
    state.paddle.x = 0.0;
    state.ball.pos = Vec2::new(600.0, 495.0);
    state.ball.vel = Vec2::new(0.0, 7.0);

    let mut over = None;
    for n in 1..=3 {
        let events = tick(&mut state, &TickInput::default());
        if let Some(GameEvent::GameOver { score, level, hits }) = events.last() {
            over = Some((n, *score, *level, *hits));
            break;
        }
    }

    assert_eq!(over, Some((3, 0, 1, 0)));
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(!state.ball.active);
    assert!(RenderFrame::capture(&state, 0.0).ball.is_none());
}

#[test]
fn test_tracker_starts_and_steers() {
    let mut state = GameState::new(GameConfig::hand_tracked(), 5);
    let slot = TrackingSlot::new();
    let mut sender = slot.sender();

    sim::start_game(&mut state);
    assert_eq!(state.phase, GamePhase::AwaitingHand);

    // Several frames land between ticks; only the newest is applied
    assert!(sender.offer(100.0, TrackingFrame::NoHand));
    assert!(!sender.offer(110.0, TrackingFrame::Hand(0.9)));
    assert!(sender.offer(140.0, TrackingFrame::Hand(0.3)));

    let before = state.paddle.center_x();
    let events = tick(
        &mut state,
        &TickInput {
            now_ms: 150.0,
            tracking: slot.take(),
        },
    );

    assert_eq!(events.first(), Some(&GameEvent::Started));
    assert_eq!(state.phase, GamePhase::Playing);
    // Camera is mirrored: a hand on the camera's left moves the paddle right
    assert!(state.paddle.center_x() > before);
    assert!(slot.take().is_none());
}

#[test]
fn test_switching_variant_mid_game_resumes_on_hand() {
    let mut state = GameState::new(Variant::HandTracked.config(), 2);
    sim::start_game(&mut state);
    let hand = TickInput {
        now_ms: 0.0,
        tracking: Some(TrackingFrame::Hand(0.4)),
    };
    tick(&mut state, &hand);
    assert_eq!(state.phase, GamePhase::Playing);

    // The start modal is already gone, so the new game must wait for a hand
    sim::reconfigure(&mut state, Variant::Classic.config());
    assert!(!state.config.has_lives);
    assert_eq!(state.phase, GamePhase::AwaitingHand);

    let mut started = 0;
    for _ in 0..300 {
        let events = tick(&mut state, &hand);
        started += count(&events, |e| *e == GameEvent::Started);
    }
    assert_eq!(started, 1);
    assert!(matches!(state.phase, GamePhase::Playing | GamePhase::GameOver));
}

#[test]
fn test_scheduled_game_keeps_books() {
    // A 144 Hz display feeding a scripted tracker that chases the ball
    let mut state = GameState::new(GameConfig::hand_tracked(), 21);
    sim::start_game(&mut state);
    let slot = TrackingSlot::new();
    let mut sender = slot.sender();
    let mut scheduler = FrameScheduler::default();
    let tuning = state.input.tuning.clone();

    let mut lives_lost = 0;
    let mut steps = 0u64;
    let mut now = 0.0;
    while now < 120_000.0 && !state.phase.is_game_over() {
        now += 1000.0 / 144.0;
        let target = state.ball.pos.x / CANVAS_WIDTH;
        sender.offer(now, TrackingFrame::Hand((target - tuning.bias) / tuning.scale));

        if !scheduler.should_step(now) {
            continue;
        }
        steps += 1;
        let events = tick(
            &mut state,
            &TickInput {
                now_ms: now,
                tracking: slot.take(),
            },
        );
        lives_lost += count(&events, |e| matches!(e, GameEvent::LifeLost { .. }));

        let (min_x, max_x) = state.paddle.x_range(CANVAS_WIDTH);
        assert!(state.paddle.x >= min_x && state.paddle.x <= max_x);
        assert!(state.bricks_remaining() <= 24);
    }

    assert_eq!(state.time_ticks, steps);
    // Never more steps than the frame rate allows
    assert!(steps as f64 <= now / FRAME_DELAY_MS + 1.0);
    if !state.phase.is_game_over() {
        assert_eq!(state.lives as usize, 3 - lives_lost);
    }
}
