//! Error types shared by the arm crates.
//!
//! Two error kinds belong to the coordinator itself:
//! - [`RangeError`]: configuration-time, fatal.
//! - [`InvalidSensorReading`]: runtime, recovered per joint by commanding
//!   zero velocity for that joint only.
//!
//! Guard-blocked joints and unreachable poses are normal control states and
//! have no error type.

use bitflags::bitflags;
use thiserror::Error;

use crate::joint::Joint;

/// Calibration remap failure.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    /// Source range has zero length, the scale factor would be infinite.
    #[error("degenerate range [{start}, {end}]: zero length")]
    Degenerate { start: f64, end: f64 },

    /// A range bound or the value itself is NaN or infinite.
    #[error("non-finite range bound or value")]
    NonFinite,
}

bitflags! {
    /// Why a position reading was rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SensorFault: u8 {
        /// Reading equals the joint's disconnect sentinel.
        const DISCONNECTED = 0x01;
        /// NaN or infinite.
        const NOT_FINITE   = 0x02;
        /// Outside the joint's declared operating range.
        const OUT_OF_RANGE = 0x04;
    }
}

impl Default for SensorFault {
    fn default() -> Self {
        Self::empty()
    }
}

/// A joint position that must not be fed to a controller.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid {joint} reading {value}: {reason:?}")]
pub struct InvalidSensorReading {
    pub joint: Joint,
    pub value: f64,
    pub reason: SensorFault,
}

/// Rejected external command.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    #[error("speed scale must be finite, got {0}")]
    InvalidSpeedScale(f64),
}
