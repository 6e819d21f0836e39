//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed-size step per tick
//! - Seeded RNG only
//! - No rendering, DOM or network dependencies

pub mod bricks;
pub mod config;
pub mod physics;
pub mod progression;
pub mod state;
pub mod tick;

pub use bricks::{Brick, BrickGrid, BrickStatus, PlacedBrick};
pub use config::{BrickLayout, GameConfig, RowPolicy};
pub use physics::{PaddleContact, paddle_bounce_velocity};
pub use progression::{game_over, level_up, reconfigure, restart, start_game};
pub use state::{Ball, GameEvent, GamePhase, GameState, Notification, Paddle, Stats};
pub use tick::{TickInput, tick};
