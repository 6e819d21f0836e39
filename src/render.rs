//! Per-frame snapshot for drawing
//!
//! The simulation never touches the canvas. Each frame the front end
//! captures a [`RenderFrame`] and paints it.

use crate::sim::GameState;

/// Canvas palette
pub mod palette {
    pub const BACKGROUND: &str = "#141D22";
    pub const PADDLE: &str = "#3399CC";
    pub const BALL: &str = "#33FF99";
    pub const BRICK: &str = "#FF3333";
    pub const TEXT: &str = "#FFFFFF";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Fading centre-screen message
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    pub opacity: f32,
}

/// Numbers shown in the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub hits: u32,
    pub level: u32,
    /// None when the variant has no lives
    pub lives: Option<u32>,
}

impl Hud {
    /// One heart per remaining life
    pub fn lives_text(&self) -> String {
        self.lives.map(|n| "💛".repeat(n as usize)).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    pub paddle: Rect,
    /// Only drawn while the ball is active
    pub ball: Option<Circle>,
    pub bricks: Vec<Rect>,
    pub banner: Option<Banner>,
    pub hud: Hud,
    /// Drives the red camera border
    pub tracking_lost: bool,
}

impl RenderFrame {
    pub fn capture(state: &GameState, now_ms: f64) -> Self {
        let layout = state.bricks.layout();
        let bricks = state
            .bricks
            .present()
            .map(|b| Rect {
                x: b.pos.x,
                y: b.pos.y,
                width: layout.width,
                height: layout.height,
            })
            .collect();

        let ball = state.ball.active.then(|| Circle {
            x: state.ball.pos.x,
            y: state.ball.pos.y,
            radius: state.ball.radius,
        });

        let notification = &state.notification;
        let banner = notification.is_visible(now_ms).then(|| Banner {
            text: notification.text.clone(),
            opacity: notification.opacity(now_ms),
        });

        Self {
            width: state.config.canvas_width,
            height: state.config.canvas_height,
            paddle: Rect {
                x: state.paddle.x,
                y: state.paddle.y,
                width: state.paddle.width,
                height: state.paddle.height,
            },
            ball,
            bricks,
            banner,
            hud: Hud {
                score: state.stats.score,
                hits: state.stats.hits,
                level: state.level,
                lives: state.config.has_lives.then_some(state.lives),
            },
            tracking_lost: state.input.tracking_lost(),
        }
    }
}
