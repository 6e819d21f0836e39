//! Fixed-rate simulation tick
//!
//! One call runs a whole frame: tracking input, ball physics, the brick
//! pass and any progression that follows from them.

use super::physics;
use super::progression;
use super::state::{GameEvent, GameState};
use crate::input::TrackingFrame;

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Timestamp of this step (ms); drives notification fades
    pub now_ms: f64,
    /// Newest tracker frame since the previous tick, if one arrived
    pub tracking: Option<TrackingFrame>,
}

/// Advance the game by one tick, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if let Some(frame) = input.tracking {
        let canvas_width = state.config.canvas_width;
        if state.input.apply(frame, &mut state.paddle, canvas_width) {
            progression::hand_detected(state, &mut events);
        }
    }

    if state.phase.game_started() && state.ball.active {
        physics::advance_ball(state, input.now_ms, &mut events);
    } else {
        // Ride on the paddle until play starts
        state.ball.park(&state.paddle);
    }

    physics::resolve_brick_collisions(state, &mut events);

    events
}
