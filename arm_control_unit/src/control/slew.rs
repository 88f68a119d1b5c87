//! Slew-rate limiter on the commanded velocity.
//!
//! Bounds the per-tick *change* of a joint's command, with separate limits
//! for increasing and decreasing values. Memory starts at zero and is reset
//! to zero whenever the joint is held by its guard, so a guard that newly
//! opens ramps the joint from rest.

use arm_common::config::SlewConfig;

#[derive(Debug, Clone, Copy)]
pub struct SlewLimiter {
    /// Max increase per tick.
    rise_step: f64,
    /// Max decrease per tick (positive number).
    fall_step: f64,
    prev: f64,
}

impl SlewLimiter {
    /// Build from per-second rates at the given tick period [s].
    pub fn new(config: &SlewConfig, dt: f64) -> Self {
        Self {
            rise_step: config.rising * dt,
            fall_step: config.falling * dt,
            prev: 0.0,
        }
    }

    /// Largest single-tick change in either direction.
    pub fn max_step(&self) -> f64 {
        self.rise_step.max(self.fall_step)
    }

    #[inline]
    pub fn reset(&mut self, value: f64) {
        self.prev = value;
    }

    /// Move toward `input` by at most one step.
    #[inline]
    pub fn apply(&mut self, input: f64) -> f64 {
        let out = input.clamp(self.prev - self.fall_step, self.prev + self.rise_step);
        self.prev = out;
        out
    }
}
