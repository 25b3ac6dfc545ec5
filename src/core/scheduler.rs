//! Fixed-timestep scheduler.
//!
//! Accumulates wall-clock time and converts it into whole simulation
//! steps of a constant duration. A single frame's contribution is capped
//! so a stall never triggers a catch-up spiral, and the fractional
//! remainder is exposed for rendering interpolation.

use crate::core::constants::{MAX_FRAME_MS, TICK_STEP_MS};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f64,
    accumulator_ms: f64,
    last_now_ms: Option<f64>,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::with_step(TICK_STEP_MS)
    }

    pub fn with_step(step_ms: f64) -> Self {
        Self {
            step_ms,
            accumulator_ms: 0.0,
            last_now_ms: None,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Feed the current wall-clock time and get back the number of whole
    /// steps to simulate. The first call only establishes the baseline.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_now_ms else {
            self.last_now_ms = Some(now_ms);
            return 0;
        };

        let frame_ms = (now_ms - last).clamp(0.0, MAX_FRAME_MS);
        self.last_now_ms = Some(now_ms);
        self.accumulator_ms += frame_ms;

        let steps = (self.accumulator_ms / self.step_ms).floor() as u32;
        self.accumulator_ms -= steps as f64 * self.step_ms;
        steps
    }

    /// Fraction of a step left in the accumulator, in [0, 1). Renderers
    /// interpolate between the last two simulated states with this.
    pub fn alpha(&self) -> f64 {
        self.accumulator_ms / self.step_ms
    }

    /// Drop any partial progress and re-baseline on the next `advance`.
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
        self.last_now_ms = None;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}
