//! Fixed-step scheduler.
//!
//! Decouples the variable-rate presentation clock from the 60 Hz logic
//! rate: elapsed wall time accumulates (clamped per frame so a stall never
//! triggers runaway catch-up), whole steps are consumed, and the remainder
//! carries forward.

use crate::consts::{MAX_FRAME_MS, STEP_MS};

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    acc_ms: f64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed wall time; returns the number of whole
    /// simulation steps to run.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.acc_ms += elapsed_ms.clamp(0.0, MAX_FRAME_MS);
        let mut steps = 0;
        while self.acc_ms >= STEP_MS {
            self.acc_ms -= STEP_MS;
            steps += 1;
        }
        steps
    }

    /// Fraction of the next step already accumulated, for render
    /// interpolation.
    pub fn alpha(&self) -> f64 {
        self.acc_ms / STEP_MS
    }
}
