//! Prelude module for common re-exports.
//!
//! ```rust
//! use arm_common::prelude::*;
//! ```

// ─── Identities ─────────────────────────────────────────────────────
pub use crate::joint::{Joint, JointMap};
pub use crate::pose::Pose;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ArmConfig, ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{CommandError, InvalidSensorReading, RangeError, SensorFault};

// ─── Ranges ─────────────────────────────────────────────────────────
pub use crate::range::{Range, RangeConverter, remap};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_PERIOD_MS, JOINT_COUNT, POSE_COUNT};
