//! Joint driver trait and the bank of four joint handles.
//!
//! The motor controller and absolute-position sensor for each joint live
//! outside this crate. The coordinator only needs to read a position and
//! write a signed velocity fraction.

use std::fmt;

use arm_common::joint::{Joint, JointMap};

/// Interface to one joint's motor and position sensor.
///
/// # Contract
///
/// | Method           | Called                     | Units                   |
/// |------------------|----------------------------|-------------------------|
/// | `position()`     | once per tick, before eval | device units            |
/// | `set_velocity()` | once per tick, after eval  | signed fraction `[-1,1]`|
///
/// A disconnected sensor must still return a number (its sentinel); the
/// coordinator decides whether the value is trustworthy.
pub trait JointDriver {
    fn position(&self) -> f64;

    fn set_velocity(&mut self, velocity: f64);
}

/// The four joint handles, owned for the robot's lifetime.
pub struct JointBank {
    drivers: JointMap<Box<dyn JointDriver>>,
}

impl JointBank {
    pub fn new(
        elevator: Box<dyn JointDriver>,
        carriage: Box<dyn JointDriver>,
        elbow: Box<dyn JointDriver>,
        wrist: Box<dyn JointDriver>,
    ) -> Self {
        Self {
            drivers: JointMap::new([elevator, carriage, elbow, wrist]),
        }
    }

    #[inline]
    pub fn position(&self, joint: Joint) -> f64 {
        self.drivers[joint].position()
    }

    #[inline]
    pub fn set_velocity(&mut self, joint: Joint, velocity: f64) {
        self.drivers[joint].set_velocity(velocity);
    }

    /// Read all four positions, in [`Joint::ALL`] order.
    pub fn sample(&self) -> JointMap<f64> {
        JointMap::from_fn(|joint| self.position(joint))
    }

    /// Command all four joints.
    pub fn command(&mut self, velocities: &JointMap<f64>) {
        for (joint, v) in velocities.iter() {
            self.drivers[joint].set_velocity(*v);
        }
    }
}

impl fmt::Debug for JointBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JointBank").finish_non_exhaustive()
    }
}
