//! Global speed scale applied to every joint's final command.

use arm_common::error::CommandError;

/// Multiplier in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedScale(f64);

impl SpeedScale {
    pub const FULL: Self = Self(1.0);
    pub const ZERO: Self = Self(0.0);

    /// Clamp into `[0, 1]`. Non-finite input is rejected.
    pub fn new(value: f64) -> Result<Self, CommandError> {
        if !value.is_finite() {
            return Err(CommandError::InvalidSpeedScale(value));
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for SpeedScale {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<f64> for SpeedScale {
    type Error = CommandError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
