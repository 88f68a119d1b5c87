//! Closed numeric ranges and affine remapping between them.
//!
//! Remapping is used at configuration-load time to carry positions measured
//! against one sensor range onto a recalibrated range, so that guard
//! thresholds survive a sensor swap or re-zeroing.
//!
//! Both endpoints map exactly (bit-for-bit) and a range remapped onto itself
//! is the identity.

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// A closed interval `[start, end]` in device units.
///
/// `start` may be greater than `end` for a reversed calibration pair;
/// [`Range::contains`] and [`Range::clamp`] use the ordered bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Signed length (`end - start`).
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.start.min(self.end)
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.start.max(self.end)
    }

    /// Inclusive membership test.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min() <= value && value <= self.max()
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }

    /// Same interval with `start <= end`.
    pub fn normalized(&self) -> Self {
        Self::new(self.min(), self.max())
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    fn check_source(&self) -> Result<(), RangeError> {
        if !self.is_finite() {
            return Err(RangeError::NonFinite);
        }
        if self.length() == 0.0 {
            return Err(RangeError::Degenerate {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Remap `value` from `old` onto `new`.
///
/// `value' = (value - old.start) * (new.length / old.length) + new.start`
///
/// # Errors
/// - [`RangeError::Degenerate`] if `old` has zero length.
/// - [`RangeError::NonFinite`] if any bound or `value` is NaN/infinite.
pub fn remap(value: f64, old: Range, new: Range) -> Result<f64, RangeError> {
    RangeConverter::new(old, new)?.convert(value)
}

/// A validated (input, output) range pair.
///
/// Construct once, then convert any number of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConverter {
    input: Range,
    output: Range,
    scale_factor: f64,
}

impl RangeConverter {
    pub fn new(input: Range, output: Range) -> Result<Self, RangeError> {
        input.check_source()?;
        if !output.is_finite() {
            return Err(RangeError::NonFinite);
        }
        Ok(Self {
            input,
            output,
            scale_factor: output.length() / input.length(),
        })
    }

    #[inline]
    pub fn input(&self) -> Range {
        self.input
    }

    #[inline]
    pub fn output(&self) -> Range {
        self.output
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Convert a value measured against the input range.
    pub fn convert(&self, value: f64) -> Result<f64, RangeError> {
        if !value.is_finite() {
            return Err(RangeError::NonFinite);
        }
        if self.input == self.output {
            return Ok(value);
        }
        // Endpoints are pinned; the plain affine form can be off by one ulp there.
        if value == self.input.start {
            return Ok(self.output.start);
        }
        if value == self.input.end {
            return Ok(self.output.end);
        }
        Ok((value - self.input.start) * self.scale_factor + self.output.start)
    }
}
