//! Level, life and phase transitions
//!
//! Level-ups and life losses happen inside a tick and return straight to
//! `Playing`; only game over and the intro are lasting phases.

use glam::Vec2;
use rand::Rng;

use super::config::GameConfig;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Level up if the wall is cleared. Returns true when it fired.
pub fn check_win(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.bricks.remaining() == 0 {
        level_up(state, events);
        true
    } else {
        false
    }
}

/// Advance to the next level: faster ball, narrower paddle, fresh wall
pub fn level_up(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.level += 1;

    let ball = &mut state.ball;
    ball.speed *= LEVEL_SPEED_INCREASE;
    ball.vel = Vec2::new(
        ball.speed * direction_of(ball.vel.x),
        ball.speed * direction_of(ball.vel.y),
    );

    state.paddle.width *= LEVEL_WIDTH_DECREASE;

    state.ball.active = true;
    state.ball.park(&state.paddle);

    state.bricks.reset(state.level, state.config.row_policy);

    log::info!(
        "Level {} (ball speed {:.2}, paddle width {:.1})",
        state.level,
        state.ball.speed,
        state.paddle.width
    );
    events.push(GameEvent::LevelUp { level: state.level });
}

/// The ball fell past the paddle
pub fn handle_miss(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    if !state.config.has_lives {
        game_over(state, events);
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        game_over(state, events);
        return;
    }

    let noun = if state.lives == 1 { "life" } else { "lives" };
    state
        .notification
        .show(format!("{} {} remaining", state.lives, noun), now_ms);

    let speed = state.ball.speed;
    relaunch(state, speed);

    log::info!("Ball lost, {} {} left", state.lives, noun);
    events.push(GameEvent::LifeLost { lives: state.lives });
}

/// End the run. The ball stops and the front end takes over.
pub fn game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.ball.active = false;
    state.phase = GamePhase::GameOver;

    log::info!(
        "Game over: score {}, level {}, hits {}",
        state.stats.score,
        state.level,
        state.stats.hits
    );
    events.push(GameEvent::GameOver {
        score: state.stats.score,
        level: state.level,
        hits: state.stats.hits,
    });
}

/// Dismiss the start modal. Play begins once a hand is seen.
pub fn start_game(state: &mut GameState) {
    if state.phase == GamePhase::Intro {
        state.phase = GamePhase::AwaitingHand;
        log::info!("Waiting for hand");
    }
}

/// A tracked hand arrived; start play if we were waiting for one
pub fn hand_detected(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase == GamePhase::AwaitingHand {
        state.phase = GamePhase::Playing;
        log::info!("Hand found, game started");
        events.push(GameEvent::Started);
    }
}

/// Back to level 1 with initial tuning and play immediately
pub fn restart(state: &mut GameState) {
    let config = &state.config;
    state.level = 1;
    state.lives = config.initial_lives;
    state.paddle.width = config.initial_paddle_width;
    state.ball.speed = config.initial_ball_speed;
    state.stats = Default::default();
    state.notification.clear();
    state.bricks.reset(1, config.row_policy);
    state.phase = GamePhase::Playing;

    let speed = state.config.initial_ball_speed;
    relaunch(state, speed);

    log::info!("Game restarted");
}

/// Start a fresh game under `config`, e.g. after switching variant.
///
/// The hand smoothing state carries over. Once the intro has been dismissed
/// it stays dismissed: the new game waits for a hand instead.
pub fn reconfigure(state: &mut GameState, config: GameConfig) {
    let dismissed = state.phase.modal_dismissed();
    let input = std::mem::take(&mut state.input);
    let seed = state.rng.random();

    *state = GameState::new(config, seed);
    state.input = input;
    if dismissed {
        start_game(state);
    }
}

/// Park the ball on the paddle and send it up at `speed` per axis in a
/// random horizontal direction
fn relaunch(state: &mut GameState, speed: f32) {
    let horizontal = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let ball = &mut state.ball;
    ball.active = true;
    ball.park(&state.paddle);
    ball.vel = Vec2::new(speed * horizontal, -speed);
}

/// Unit direction of a velocity component; zero counts as negative
fn direction_of(v: f32) -> f32 {
    if v > 0.0 { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state(config: GameConfig) -> GameState {
        let mut state = GameState::new(config, 42);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_level_up_scales_difficulty() {
        let mut state = playing_state(GameConfig::hand_tracked());
        state.ball.vel = Vec2::new(-3.0, 6.0);
        let mut events = Vec::new();

        level_up(&mut state, &mut events);

        assert_eq!(state.level, 2);
        assert!((state.ball.speed - 7.0 * 1.1).abs() < 1e-5);
        assert!((state.paddle.width - 150.0 * 0.9).abs() < 1e-4);
        assert!(state.ball.vel.x < 0.0 && state.ball.vel.y > 0.0);
        assert!((state.ball.vel.x.abs() - state.ball.speed).abs() < 1e-5);
        assert!(state.ball.active);
        assert_eq!(
            state.ball.pos,
            Vec2::new(state.paddle.center_x(), state.paddle.y - BALL_RADIUS)
        );
        assert_eq!(state.bricks_remaining(), 16);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 2 }]);
    }

    #[test]
    fn test_check_win_only_when_cleared() {
        let mut state = playing_state(GameConfig::hand_tracked());
        let mut events = Vec::new();
        assert!(!check_win(&mut state, &mut events));
        assert_eq!(state.level, 1);

        for column in 0..8 {
            state.bricks.destroy(column, 0);
        }
        assert!(check_win(&mut state, &mut events));
        assert_eq!(state.level, 2);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_miss_with_one_life_ends_game() {
        let mut state = playing_state(GameConfig::hand_tracked());
        state.lives = 1;
        let mut events = Vec::new();

        handle_miss(&mut state, 0.0, &mut events);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.ball.active);
        assert!(matches!(events[0], GameEvent::GameOver { level: 1, .. }));
    }

    #[test]
    fn test_miss_with_two_lives_relaunches() {
        let mut state = playing_state(GameConfig::hand_tracked());
        state.lives = 2;
        state.ball.pos = Vec2::new(10.0, 600.0);
        let mut events = Vec::new();

        handle_miss(&mut state, 5000.0, &mut events);

        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.notification.text, "1 life remaining");
        assert_eq!(state.notification.opacity(5000.0), 1.0);
        assert!(state.ball.active);
        assert_eq!(
            state.ball.pos,
            Vec2::new(state.paddle.center_x(), state.paddle.y - BALL_RADIUS)
        );
        assert_eq!(state.ball.vel.x.abs(), 7.0);
        assert_eq!(state.ball.vel.y, -7.0);
        assert_eq!(events, vec![GameEvent::LifeLost { lives: 1 }]);
    }

    #[test]
    fn test_miss_plural_notification() {
        let mut state = playing_state(GameConfig::hand_tracked());
        let mut events = Vec::new();
        handle_miss(&mut state, 0.0, &mut events);
        assert_eq!(state.notification.text, "2 lives remaining");
    }

    #[test]
    fn test_classic_miss_is_game_over() {
        let mut state = playing_state(GameConfig::classic());
        let mut events = Vec::new();
        handle_miss(&mut state, 0.0, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.ball.active);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = playing_state(GameConfig::hand_tracked());
        let mut events = Vec::new();
        level_up(&mut state, &mut events);
        level_up(&mut state, &mut events);
        state.stats.score = 40;
        state.stats.hits = 12;
        state.lives = 1;
        state.notification.show("1 life remaining", 0.0);
        state.bricks.destroy(0, 0);
        game_over(&mut state, &mut events);

        restart(&mut state);

        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.paddle.width, 150.0);
        assert_eq!(state.ball.speed, 7.0);
        assert_eq!(state.ball.vel.x.abs(), 7.0);
        assert_eq!(state.ball.vel.y, -7.0);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.hits, 0);
        assert!(state.notification.text.is_empty());
        assert_eq!(state.bricks_remaining(), 8);
        assert_eq!(state.bricks.present().count(), 8);
        assert!(state.ball.active);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_relaunch_direction_is_random_both_ways() {
        let mut state = playing_state(GameConfig::hand_tracked());
        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..64 {
            restart(&mut state);
            if state.ball.vel.x < 0.0 {
                saw_left = true;
            } else {
                saw_right = true;
            }
        }
        assert!(saw_left && saw_right);
    }

    #[test]
    fn test_start_then_hand_begins_play() {
        let mut state = GameState::new(GameConfig::hand_tracked(), 1);
        let mut events = Vec::new();

        hand_detected(&mut state, &mut events);
        assert_eq!(state.phase, GamePhase::Intro);

        start_game(&mut state);
        assert_eq!(state.phase, GamePhase::AwaitingHand);

        hand_detected(&mut state, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(events, vec![GameEvent::Started]);

        // Further samples don't re-announce
        hand_detected(&mut state, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_reconfigure_mid_game_waits_for_hand() {
        let mut state = playing_state(GameConfig::hand_tracked());
        state.level = 4;
        state.stats.score = 30;
        state.input.tuning.alpha = 0.8;

        reconfigure(&mut state, GameConfig::classic());
        assert_eq!(state.phase, GamePhase::AwaitingHand);
        assert_eq!(state.config, GameConfig::classic());
        assert_eq!(state.level, 1);
        assert_eq!(state.stats, Default::default());
        assert_eq!(state.bricks_remaining(), 24);
        assert_eq!(state.input.tuning.alpha, 0.8);

        let mut events = Vec::new();
        hand_detected(&mut state, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reconfigure_after_game_over_waits_for_hand() {
        let mut state = playing_state(GameConfig::classic());
        game_over(&mut state, &mut Vec::new());

        reconfigure(&mut state, GameConfig::hand_tracked());
        assert_eq!(state.phase, GamePhase::AwaitingHand);
        assert!(state.ball.active);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_reconfigure_keeps_intro() {
        let mut state = GameState::new(GameConfig::hand_tracked(), 1);
        reconfigure(&mut state, GameConfig::classic());
        assert_eq!(state.phase, GamePhase::Intro);
    }
}
