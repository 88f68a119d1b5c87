//! Simulated joints for bench runs and tests.
//!
//! Each joint is a first-order plant: full command moves it at its maximum
//! speed, and the position is clamped to the joint's range. A shared
//! [`SimHandle`] lets the caller observe the last command, force a position
//! or make the sensor report its disconnect sentinel.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use arm_common::joint::{Joint, JointMap};
use arm_common::pose::Pose;
use arm_common::range::Range;
use thiserror::Error;
use tracing::{trace, warn};

use crate::config::ResolvedConfig;
use crate::driver::{JointBank, JointDriver};

/// Travel at full command [units/s].
pub const ELEVATOR_MAX_SPEED: f64 = 1200.0;
pub const CARRIAGE_MAX_SPEED: f64 = 2000.0;
pub const ELBOW_MAX_SPEED: f64 = 180.0;
pub const WRIST_MAX_SPEED: f64 = 180.0;

pub fn max_speed(joint: Joint) -> f64 {
    match joint {
        Joint::Elevator => ELEVATOR_MAX_SPEED,
        Joint::Carriage => CARRIAGE_MAX_SPEED,
        Joint::Elbow => ELBOW_MAX_SPEED,
        Joint::Wrist => WRIST_MAX_SPEED,
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulated joint state poisoned by a panicking writer")]
    PoisonError,
}

impl<G> From<PoisonError<G>> for SimError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

#[derive(Debug, Clone)]
struct SimState {
    position: f64,
    velocity: f64,
    max_speed: f64,
    range: Range,
    sentinel: f64,
    /// Reported instead of `position` when set.
    reading_override: Option<f64>,
    disconnected: bool,
}

/// Shared view of one simulated joint.
#[derive(Debug, Clone)]
pub struct SimHandle(Arc<RwLock<SimState>>);

impl SimHandle {
    fn new(position: f64, max_speed: f64, range: Range, sentinel: f64) -> Self {
        Self(Arc::new(RwLock::new(SimState {
            position,
            velocity: 0.0,
            max_speed,
            range,
            sentinel,
            reading_override: None,
            disconnected: false,
        })))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SimState>, SimError> {
        Ok(self.0.read()?)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SimState>, SimError> {
        Ok(self.0.write()?)
    }

    /// True position of the plant.
    pub fn position(&self) -> Result<f64, SimError> {
        Ok(self.read()?.position)
    }

    /// What the sensor reports.
    pub fn reading(&self) -> Result<f64, SimError> {
        let s = self.read()?;
        Ok(if s.disconnected {
            s.sentinel
        } else {
            s.reading_override.unwrap_or(s.position)
        })
    }

    /// Last commanded velocity fraction.
    pub fn velocity(&self) -> Result<f64, SimError> {
        Ok(self.read()?.velocity)
    }

    pub fn set_velocity(&self, velocity: f64) -> Result<(), SimError> {
        self.write()?.velocity = velocity;
        Ok(())
    }

    pub fn set_position(&self, position: f64) -> Result<(), SimError> {
        let mut s = self.write()?;
        s.position = s.range.clamp(position);
        Ok(())
    }

    /// Report `value` instead of the true position (`None` to clear).
    pub fn override_reading(&self, value: Option<f64>) -> Result<(), SimError> {
        self.write()?.reading_override = value;
        Ok(())
    }

    pub fn disconnect(&self, disconnected: bool) -> Result<(), SimError> {
        self.write()?.disconnected = disconnected;
        Ok(())
    }

    /// Advance the plant by `dt` seconds.
    pub fn step(&self, dt: f64) -> Result<(), SimError> {
        let mut s = self.write()?;
        let v = s.velocity.clamp(-1.0, 1.0);
        s.position = s.range.clamp(s.position + v * s.max_speed * dt);
        Ok(())
    }
}

/// [`JointDriver`] backed by a [`SimHandle`].
///
/// A poisoned handle reads as NaN, which the snapshot rejects, and drops
/// commands.
#[derive(Debug, Clone)]
pub struct SimJoint {
    joint: Joint,
    handle: SimHandle,
}

impl SimJoint {
    pub fn new(joint: Joint, handle: SimHandle) -> Self {
        Self { joint, handle }
    }
}

impl JointDriver for SimJoint {
    fn position(&self) -> f64 {
        self.handle.reading().unwrap_or(f64::NAN)
    }

    fn set_velocity(&mut self, velocity: f64) {
        if let Err(e) = self.handle.set_velocity(velocity) {
            warn!(joint = %self.joint, error = %e, "Simulated command dropped");
        }
    }
}

/// Four simulated joints.
#[derive(Debug, Clone)]
pub struct SimRig {
    handles: JointMap<SimHandle>,
}

impl SimRig {
    /// Build a rig with joints at `positions`, using each joint's configured
    /// range and disconnect sentinel.
    pub fn from_config(config: &ResolvedConfig, positions: JointMap<f64>) -> Self {
        let handles = JointMap::from_fn(|joint| {
            let limits = config.joint(joint);
            let range = limits.range;
            let sentinel = limits
                .disconnect_sentinel
                .unwrap_or(range.max() + range.length().abs() * 0.1);
            SimHandle::new(range.clamp(positions[joint]), max_speed(joint), range, sentinel)
        });
        Self { handles }
    }

    /// Rig resting at the `Start` targets.
    pub fn stowed(config: &ResolvedConfig) -> Self {
        Self::from_config(config, config.targets(Pose::Start))
    }

    /// Joint handles wired to this rig.
    pub fn bank(&self) -> JointBank {
        let joint = |j: Joint| -> Box<dyn JointDriver> {
            Box::new(SimJoint::new(j, self.handles[j].clone()))
        };
        JointBank::new(
            joint(Joint::Elevator),
            joint(Joint::Carriage),
            joint(Joint::Elbow),
            joint(Joint::Wrist),
        )
    }

    pub fn handle(&self, joint: Joint) -> &SimHandle {
        &self.handles[joint]
    }

    pub fn positions(&self) -> Result<JointMap<f64>, SimError> {
        JointMap::try_from_fn(|joint| self.handles[joint].position())
    }

    /// Advance every joint by `dt` seconds.
    pub fn step(&self, dt: f64) -> Result<(), SimError> {
        for (joint, handle) in self.handles.iter() {
            handle.step(dt)?;
            let position = handle.position()?;
            trace!(joint = %joint, position, "sim step");
        }
        Ok(())
    }
}
