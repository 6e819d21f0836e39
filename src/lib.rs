//! Palm Breaker - brick breaker steered by a tracked hand
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, bricks, progression)
//! - `input`: Hand-tracking signal to paddle position
//! - `scheduler`: Fixed-rate frame throttling
//! - `render`: Per-frame snapshot handed to the canvas painter
//! - `highscores`: Remote leaderboard client
//! - `settings`: Persisted player preferences

pub mod highscores;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use highscores::{HighScoreEntry, Leaderboard, ScoreClient, ScoreRow, ScoreServiceError};
pub use input::{HandInput, InputTuning, TrackingFrame, TrackingSlot};
pub use render::RenderFrame;
pub use scheduler::FrameScheduler;
pub use settings::{Settings, Variant};

/// Game configuration constants
pub mod consts {
    /// Simulation and render rate
    pub const FPS: u32 = 60;
    /// Minimum time between two simulation steps (ms)
    pub const FRAME_DELAY_MS: f64 = 1000.0 / FPS as f64;

    /// Playfield dimensions (canvas pixels)
    pub const CANVAS_WIDTH: f32 = 692.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Paddle geometry
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance from the canvas bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;
    /// How far the paddle may slide past either canvas edge
    pub const PADDLE_OVERSHOOT: f32 = 50.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Steepest paddle deflection from vertical (60°)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Per-level difficulty scaling
    pub const LEVEL_SPEED_INCREASE: f32 = 1.1;
    pub const LEVEL_WIDTH_DECREASE: f32 = 0.9;

    /// Notification fade-out duration (ms)
    pub const NOTIFICATION_FADE_MS: f64 = 2000.0;
    /// How long the UI shows the level-up banner (ms)
    pub const LEVEL_UP_DISPLAY_MS: f64 = 2000.0;

    /// Upstream tracking rate cap (ms between accepted samples)
    pub const TRACKING_INTERVAL_MS: f64 = 1000.0 / 30.0;
    /// Consecutive empty tracking frames before the hand counts as lost
    pub const NO_HAND_THRESHOLD: u32 = 30;
}
