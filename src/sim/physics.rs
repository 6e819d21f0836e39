//! Ball motion and collision response
//!
//! Wall and paddle tests look at the ball's *projected* position (current
//! position plus one tick of velocity) and only change the velocity. The
//! position update always follows, so a correction made this tick takes
//! effect on this tick's movement.

use glam::Vec2;

use super::progression;
use super::state::{Ball, GameEvent, GameState, Paddle};
use crate::consts::MAX_BOUNCE_ANGLE;

/// Outcome of the paddle test for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    /// Ball not at the paddle line (or moving up)
    None,
    /// Bounced off the paddle
    Hit,
    /// Fell past the paddle and out of the playfield
    Miss,
}

/// Flip velocity components whose projected position leaves the playfield.
/// The bottom edge is handled by the paddle/miss logic.
pub fn reflect_walls(ball: &mut Ball, canvas_width: f32) {
    let next = ball.pos + ball.vel;
    if next.x > canvas_width - ball.radius || next.x < ball.radius {
        ball.vel.x = -ball.vel.x;
    }
    if next.y < ball.radius {
        ball.vel.y = -ball.vel.y;
    }
}

/// Velocity after a paddle bounce.
///
/// `hit_point` is where the ball struck, 0 = left edge, 1 = right edge. The
/// ball leaves at up to ±60° from vertical, always upward, at its incoming
/// speed. The incoming angle is ignored.
pub fn paddle_bounce_velocity(vel: Vec2, hit_point: f32) -> Vec2 {
    let angle = (hit_point * 2.0 - 1.0) * MAX_BOUNCE_ANGLE;
    let speed = vel.length();
    Vec2::new(angle.sin() * speed, -angle.cos() * speed)
}

/// Test the ball against the paddle line, bouncing it on a hit
pub fn check_paddle(ball: &mut Ball, paddle: &Paddle, canvas_height: f32) -> PaddleContact {
    if ball.vel.y <= 0.0 || ball.pos.y + ball.vel.y <= paddle.y - ball.radius {
        return PaddleContact::None;
    }

    if ball.pos.x > paddle.x && ball.pos.x < paddle.x + paddle.width {
        let hit_point = (ball.pos.x - paddle.x) / paddle.width;
        ball.vel = paddle_bounce_velocity(ball.vel, hit_point);
        PaddleContact::Hit
    } else if ball.pos.y > canvas_height + ball.radius {
        PaddleContact::Miss
    } else {
        PaddleContact::None
    }
}

/// Euler step
pub fn integrate(ball: &mut Ball) {
    ball.pos += ball.vel;
}

/// Walls, paddle, miss, then movement for an active ball in play
pub fn advance_ball(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    reflect_walls(&mut state.ball, state.config.canvas_width);

    match check_paddle(&mut state.ball, &state.paddle, state.config.canvas_height) {
        PaddleContact::Hit => {
            state.stats.hits += 1;
            events.push(GameEvent::PaddleHit);
        }
        PaddleContact::Miss => progression::handle_miss(state, now_ms, events),
        PaddleContact::None => {}
    }

    integrate(&mut state.ball);
}

/// Knock out every present brick around the ball whose rectangle holds the
/// ball's centre. Each hit flips the vertical velocity; several bricks can
/// go in the same pass. Returns the number of bricks destroyed.
pub fn resolve_brick_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) -> u32 {
    if !state.ball.active {
        return 0;
    }

    let mut destroyed = 0;
    let layout = *state.bricks.layout();
    let cell = state.bricks.cell_of(state.ball.pos);
    for (column, row) in state.bricks.neighborhood(cell) {
        let hit = state
            .bricks
            .get(column, row)
            .is_some_and(|brick| brick.is_present() && brick.contains(state.ball.pos, &layout));
        if !hit {
            continue;
        }

        state.ball.vel.y = -state.ball.vel.y;
        if state.bricks.destroy(column, row) {
            destroyed += 1;
            state.stats.score += 1;
            events.push(GameEvent::BrickDestroyed { column, row });
        }

        if progression::check_win(state, events) {
            // Ball is back on the paddle and the wall is new
            break;
        }
    }
    destroyed
}
