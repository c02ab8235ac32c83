//! Fast-click acceleration

use super::events::Button;
use crate::config::MAX_STEP;

/// Tracks repeated presses of one button
///
/// Each repeat inside the window doubles the step, up to [`MAX_STEP`].
/// A different button or a slow repeat starts over at 1.
#[derive(Debug, Clone)]
pub struct FastClick {
    last: Option<(Button, u32)>,
    step: u8,
    window_ms: u32,
}

impl FastClick {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            last: None,
            step: 1,
            window_ms,
        }
    }

    /// Record a press and return the step it should move by
    pub fn register(&mut self, button: Button, now_ms: u32) -> u8 {
        let repeat = match self.last {
            Some((prev, at)) => prev == button && now_ms.wrapping_sub(at) <= self.window_ms,
            None => false,
        };

        self.step = if repeat {
            self.step.saturating_mul(2).min(MAX_STEP)
        } else {
            1
        };
        self.last = Some((button, now_ms));
        self.step
    }

    /// Forget history, next press is step 1
    pub fn reset(&mut self) {
        self.last = None;
        self.step = 1;
    }

    pub fn step(&self) -> u8 {
        self.step
    }
}
