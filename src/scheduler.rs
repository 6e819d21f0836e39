//! Frame throttling
//!
//! `requestAnimationFrame` fires at the display's refresh rate, which may be
//! 120 Hz or more. The simulation is tuned in pixels per tick, so steps are
//! only admitted once the minimum interval has passed.

use crate::consts::FRAME_DELAY_MS;

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    min_interval_ms: f64,
    last_step_ms: f64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::with_interval(FRAME_DELAY_MS)
    }
}

impl FrameScheduler {
    /// Scheduler admitting at most `fps` steps per second
    pub fn new(fps: u32) -> Self {
        Self::with_interval(1000.0 / fps.max(1) as f64)
    }

    pub fn with_interval(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_step_ms: 0.0,
        }
    }

    /// Whether a step should run for the callback at `timestamp_ms`.
    /// Records the timestamp when it does; the caller requests the next
    /// frame either way.
    pub fn should_step(&mut self, timestamp_ms: f64) -> bool {
        if timestamp_ms - self.last_step_ms >= self.min_interval_ms {
            self.last_step_ms = timestamp_ms;
            true
        } else {
            false
        }
    }
}
