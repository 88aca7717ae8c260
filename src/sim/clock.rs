//! Fixed-interval gate between frame time and discrete steps

use serde::{Deserialize, Serialize};

/// Accumulates frame time and fires at most one discrete step per frame.
///
/// Time beyond one crossing is dropped rather than replayed, so a long frame
/// never turns into a burst of steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    move_delay: f32,
    accumulator: f32,
}

impl SimulationClock {
    pub fn new(move_delay: f32) -> Self {
        Self {
            move_delay,
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns true if a discrete step is due.
    pub fn advance(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }
        if self.accumulator >= self.move_delay {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn move_delay(&self) -> f32 {
        self.move_delay
    }
}
