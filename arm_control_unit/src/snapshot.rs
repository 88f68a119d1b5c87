//! One consistent set of joint readings per tick.
//!
//! Every raw reading is classified once, when the snapshot is taken. An
//! invalid reading is kept only as an error and is never handed to a
//! controller or a guard comparison.

use arm_common::error::{InvalidSensorReading, SensorFault};
use arm_common::joint::{Joint, JointMap};
use arm_common::range::Range;

use crate::config::ResolvedConfig;

/// Classify one raw reading against a joint's range and disconnect sentinel.
pub fn validate_reading(
    joint: Joint,
    value: f64,
    range: Range,
    disconnect_sentinel: Option<f64>,
) -> Result<f64, InvalidSensorReading> {
    let mut reason = SensorFault::empty();
    if disconnect_sentinel == Some(value) {
        reason |= SensorFault::DISCONNECTED;
    }
    if !value.is_finite() {
        reason |= SensorFault::NOT_FINITE;
    } else if !range.contains(value) {
        reason |= SensorFault::OUT_OF_RANGE;
    }

    if reason.is_empty() {
        Ok(value)
    } else {
        Err(InvalidSensorReading {
            joint,
            value,
            reason,
        })
    }
}

/// Validated positions of all four joints at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSnapshot {
    readings: JointMap<Result<f64, InvalidSensorReading>>,
}

impl PositionSnapshot {
    pub fn new(readings: JointMap<Result<f64, InvalidSensorReading>>) -> Self {
        Self { readings }
    }

    /// Validate four raw readings against the configured joint limits.
    pub fn from_raw(raw: &JointMap<f64>, config: &ResolvedConfig) -> Self {
        Self::new(JointMap::from_fn(|joint| {
            let limits = config.joint(joint);
            validate_reading(joint, raw[joint], limits.range, limits.disconnect_sentinel)
        }))
    }

    /// Snapshot with all four readings trusted as-is.
    pub fn valid(elevator: f64, carriage: f64, elbow: f64, wrist: f64) -> Self {
        Self::new(JointMap::new([Ok(elevator), Ok(carriage), Ok(elbow), Ok(wrist)]))
    }

    /// The position if the reading is valid.
    #[inline]
    pub fn get(&self, joint: Joint) -> Option<f64> {
        self.readings[joint].ok()
    }

    /// Replace one joint's reading with a fault.
    pub fn with_fault(mut self, joint: Joint, value: f64, reason: SensorFault) -> Self {
        self.readings[joint] = Err(InvalidSensorReading {
            joint,
            value,
            reason,
        });
        self
    }

    pub fn faults(&self) -> JointMap<SensorFault> {
        JointMap::from_fn(|joint| match &self.readings[joint] {
            Ok(_) => SensorFault::empty(),
            Err(e) => e.reason,
        })
    }

    /// Iterate over rejected readings.
    pub fn invalid(&self) -> impl Iterator<Item = &InvalidSensorReading> {
        self.readings.iter().filter_map(|(_, r)| r.as_ref().err())
    }
}
