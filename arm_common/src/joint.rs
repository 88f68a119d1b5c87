//! Joint identities and a fixed per-joint map.

use core::fmt;
use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::consts::JOINT_COUNT;

/// One independently actuated degree of freedom.
///
/// The set is fixed for the lifetime of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joint {
    /// Vertical lift.
    Elevator,
    /// Second vertical carriage riding on the lift.
    Carriage,
    /// Rotating elbow.
    Elbow,
    /// Rotating wrist on the elbow.
    Wrist,
}

const_assert_eq!(Joint::ALL.len(), JOINT_COUNT);

impl Joint {
    pub const ALL: [Joint; 4] = [Joint::Elevator, Joint::Carriage, Joint::Elbow, Joint::Wrist];

    /// Stable index in `0..JOINT_COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Joint::Elevator => 0,
            Joint::Carriage => 1,
            Joint::Elbow => 2,
            Joint::Wrist => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Joint::Elevator => "elevator",
            Joint::Carriage => "carriage",
            Joint::Elbow => "elbow",
            Joint::Wrist => "wrist",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value per joint, stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointMap<T>([T; JOINT_COUNT]);

impl<T> JointMap<T> {
    pub const fn new(values: [T; JOINT_COUNT]) -> Self {
        Self(values)
    }

    /// Build a map by calling `f` once per joint, in [`Joint::ALL`] order.
    pub fn from_fn(mut f: impl FnMut(Joint) -> T) -> Self {
        Self(Joint::ALL.map(&mut f))
    }

    /// Like [`JointMap::from_fn`], returning the first error in [`Joint::ALL`] order.
    pub fn try_from_fn<E>(f: impl FnMut(Joint) -> Result<T, E>) -> Result<Self, E> {
        let [elevator, carriage, elbow, wrist] = Joint::ALL.map(f);
        Ok(Self([elevator?, carriage?, elbow?, wrist?]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &T)> {
        Joint::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T; JOINT_COUNT] {
        &self.0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> JointMap<U> {
        JointMap(self.0.map(f))
    }
}

impl<T> Index<Joint> for JointMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, joint: Joint) -> &T {
        &self.0[joint.index()]
    }
}

impl<T> IndexMut<Joint> for JointMap<T> {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        &mut self.0[joint.index()]
    }
}
