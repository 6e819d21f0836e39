//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context. Every core function takes it
//! explicitly; nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bricks::BrickGrid;
use super::config::GameConfig;
use crate::consts::*;
use crate::input::HandInput;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start modal still showing
    Intro,
    /// Modal dismissed, waiting for the first tracked hand
    AwaitingHand,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn modal_dismissed(self) -> bool {
        self != GamePhase::Intro
    }

    pub fn game_started(self) -> bool {
        self == GamePhase::Playing
    }

    pub fn is_game_over(self) -> bool {
        self == GamePhase::GameOver
    }
}

/// Something the front end may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First hand sample after the modal was dismissed
    Started,
    PaddleHit,
    BrickDestroyed { column: usize, row: usize },
    LevelUp { level: u32 },
    LifeLost { lives: u32 },
    GameOver { score: u32, level: u32, hits: u32 },
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.canvas_width / 2.0 - config.initial_paddle_width / 2.0,
            y: config.paddle_y(),
            width: config.initial_paddle_width,
            height: PADDLE_HEIGHT,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Allowed range for `x`, letting the paddle hang off either edge
    pub fn x_range(&self, canvas_width: f32) -> (f32, f32) {
        (-PADDLE_OVERSHOOT, canvas_width - self.width + PADDLE_OVERSHOOT)
    }

    /// Move the left edge, clamped to the overshoot range
    pub fn set_x_clamped(&mut self, x: f32, canvas_width: f32) {
        let (min, max) = self.x_range(canvas_width);
        self.x = x.max(min).min(max);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Per-axis launch speed; grows with each level
    pub speed: f32,
    pub radius: f32,
    /// When false the ball rides on top of the paddle
    pub active: bool,
}

impl Ball {
    pub fn new(paddle: &Paddle, speed: f32) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(speed, -speed),
            speed,
            radius: BALL_RADIUS,
            active: true,
        };
        ball.park(paddle);
        ball
    }

    /// Sit the ball on top of the paddle's centre
    pub fn park(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius);
    }
}

/// Score counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// One point per destroyed brick
    pub score: u32,
    /// Paddle bounces
    pub hits: u32,
}

/// Transient message that fades out over `NOTIFICATION_FADE_MS`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    /// Timestamp the fade started at; None when nothing is showing
    pub fade_start_ms: Option<f64>,
}

impl Notification {
    pub fn show(&mut self, text: impl Into<String>, now_ms: f64) {
        self.text = text.into();
        self.fade_start_ms = Some(now_ms);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.fade_start_ms = None;
    }

    /// Current opacity in [0, 1]
    pub fn opacity(&self, now_ms: f64) -> f32 {
        match self.fade_start_ms {
            Some(start) => (1.0 - (now_ms - start) / NOTIFICATION_FADE_MS).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }

    pub fn is_visible(&self, now_ms: f64) -> bool {
        self.opacity(now_ms) > 0.0
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Current level (1-based)
    pub level: u32,
    /// Lives left; only meaningful when the variant has lives
    pub lives: u32,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickGrid,
    pub stats: Stats,
    pub notification: Notification,
    /// Hand-tracking smoothing state
    pub input: HandInput,
    /// Relaunch direction source
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game, waiting behind the start modal
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let paddle = Paddle::new(&config);
        let ball = Ball::new(&paddle, config.initial_ball_speed);
        let mut bricks = BrickGrid::new(config.bricks);
        bricks.reset(1, config.row_policy);

        Self {
            level: 1,
            lives: config.initial_lives,
            phase: GamePhase::Intro,
            paddle,
            ball,
            bricks,
            stats: Stats::default(),
            notification: Notification::default(),
            input: HandInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            config,
        }
    }

    pub fn bricks_remaining(&self) -> u32 {
        self.bricks.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(GameConfig::hand_tracked(), 7);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.bricks_remaining(), 8);
        assert_eq!(state.paddle.y, CANVAS_HEIGHT - 30.0);
        assert_eq!(state.paddle.center_x(), CANVAS_WIDTH / 2.0);
        assert_eq!(state.ball.pos, Vec2::new(CANVAS_WIDTH / 2.0, state.paddle.y - BALL_RADIUS));
        assert_eq!(state.ball.vel, Vec2::new(7.0, -7.0));
    }

    #[test]
    fn test_classic_starts_full() {
        let state = GameState::new(GameConfig::classic(), 7);
        assert_eq!(state.bricks_remaining(), 24);
    }

    #[test]
    fn test_phase_flags() {
        assert!(!GamePhase::Intro.modal_dismissed());
        assert!(GamePhase::AwaitingHand.modal_dismissed());
        assert!(!GamePhase::AwaitingHand.game_started());
        assert!(GamePhase::Playing.game_started());
        assert!(GamePhase::GameOver.is_game_over());
        assert!(!GamePhase::GameOver.game_started());
    }

    #[test]
    fn test_paddle_clamp_overshoot() {
        let config = GameConfig::hand_tracked();
        let mut paddle = Paddle::new(&config);
        paddle.set_x_clamped(-500.0, config.canvas_width);
        assert_eq!(paddle.x, -PADDLE_OVERSHOOT);
        paddle.set_x_clamped(5000.0, config.canvas_width);
        assert_eq!(paddle.x, config.canvas_width - paddle.width + PADDLE_OVERSHOOT);
        paddle.set_x_clamped(100.0, config.canvas_width);
        assert_eq!(paddle.x, 100.0);
    }

    #[test]
    fn test_notification_fades() {
        let mut note = Notification::default();
        assert_eq!(note.opacity(0.0), 0.0);

        note.show("2 lives remaining", 1000.0);
        assert_eq!(note.opacity(1000.0), 1.0);
        assert!((note.opacity(2000.0) - 0.5).abs() < 1e-6);
        assert_eq!(note.opacity(3000.0), 0.0);
        assert!(!note.is_visible(3500.0));

        note.clear();
        assert!(note.text.is_empty());
        assert_eq!(note.opacity(1000.0), 0.0);
    }
}
