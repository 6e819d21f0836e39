//! Hand-tracking input
//!
//! The tracker (JavaScript, outside this crate) reports the wrist's
//! horizontal position in camera space, 0 = left edge of the frame. Samples
//! travel through a [`TrackingSlot`], a single-slot mailbox where the newest
//! sample overwrites any unread one, and are applied to the paddle at the
//! start of the next tick by [`HandInput`].

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{NO_HAND_THRESHOLD, TRACKING_INTERVAL_MS};
use crate::sim::Paddle;

/// One result from the hand tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingFrame {
    /// Normalized horizontal position, 0 = left of the camera frame
    Hand(f32),
    /// Tracker ran but found no hand
    NoHand,
}

/// Remap and smoothing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTuning {
    /// `palm = bias + raw * scale`; a negative scale mirrors the camera
    pub bias: f32,
    pub scale: f32,
    /// Weights for the sample history, oldest first
    pub weights: [f32; HISTORY_LEN],
    /// Blend factor toward the new position (1 = no lag)
    pub alpha: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            bias: 1.4,
            scale: -1.8,
            weights: [0.1, 0.15, 0.2, 0.25, 0.3],
            alpha: 0.5,
        }
    }
}

/// Number of samples averaged
pub const HISTORY_LEN: usize = 5;

/// Turns tracking samples into paddle positions
#[derive(Debug, Clone, Default)]
pub struct HandInput {
    pub tuning: InputTuning,
    /// Remapped positions, oldest first
    history: [Option<f32>; HISTORY_LEN],
    /// Consecutive frames without a hand
    missed_frames: u32,
}

impl HandInput {
    pub fn with_tuning(tuning: InputTuning) -> Self {
        Self {
            tuning,
            ..Default::default()
        }
    }

    /// Feed one tracker frame. Moves the paddle and returns true when the
    /// frame carried a hand; otherwise the paddle keeps its position.
    pub fn apply(&mut self, frame: TrackingFrame, paddle: &mut Paddle, canvas_width: f32) -> bool {
        let raw = match frame {
            TrackingFrame::Hand(raw) => raw,
            TrackingFrame::NoHand => {
                self.missed_frames = self.missed_frames.saturating_add(1);
                if self.missed_frames == NO_HAND_THRESHOLD + 1 {
                    log::warn!("Hand tracking lost");
                }
                return false;
            }
        };
        self.missed_frames = 0;

        self.history.rotate_left(1);
        self.history[HISTORY_LEN - 1] = Some(self.tuning.bias + raw * self.tuning.scale);

        let Some(averaged) = self.weighted_average() else {
            return false;
        };

        let alpha = self.tuning.alpha;
        let current = paddle.center_x() / canvas_width;
        let smoothed = alpha * averaged + (1.0 - alpha) * current;

        let target = smoothed * canvas_width - paddle.width / 2.0;
        paddle.set_x_clamped(target, canvas_width);
        true
    }

    /// Tracker has seen no hand for a while
    pub fn tracking_lost(&self) -> bool {
        self.missed_frames > NO_HAND_THRESHOLD
    }

    fn weighted_average(&self) -> Option<f32> {
        let (sum, total) = self
            .history
            .iter()
            .zip(self.tuning.weights)
            .filter_map(|(&sample, weight)| sample.map(|s| (s * weight, weight)))
            .fold((0.0, 0.0), |(sum, total), (s, w)| (sum + s, total + w));
        (total > 0.0).then(|| sum / total)
    }
}

/// Latest-wins mailbox shared by the tracker callback and the game loop
#[derive(Debug, Clone, Default)]
pub struct TrackingSlot {
    latest: Rc<Cell<Option<TrackingFrame>>>,
}

impl TrackingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer handle, throttled to the tracking rate
    pub fn sender(&self) -> TrackingSender {
        TrackingSender {
            latest: self.latest.clone(),
            last_accepted_ms: 0.0,
            interval_ms: TRACKING_INTERVAL_MS,
        }
    }

    /// Take the newest unread frame, if any. Never blocks.
    pub fn take(&self) -> Option<TrackingFrame> {
        self.latest.take()
    }
}

/// Writes tracker frames into a [`TrackingSlot`]
#[derive(Debug)]
pub struct TrackingSender {
    latest: Rc<Cell<Option<TrackingFrame>>>,
    last_accepted_ms: f64,
    interval_ms: f64,
}

impl TrackingSender {
    /// Offer a frame captured at `now_ms`. Frames arriving faster than the
    /// tracking rate are dropped; returns whether this one was kept.
    pub fn offer(&mut self, now_ms: f64, frame: TrackingFrame) -> bool {
        if now_ms - self.last_accepted_ms < self.interval_ms {
            return false;
        }
        self.last_accepted_ms = now_ms;
        self.latest.set(Some(frame));
        true
    }
}
