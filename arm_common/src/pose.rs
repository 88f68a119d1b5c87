//! Named target configurations.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::consts::POSE_COUNT;

/// One of the five configurations all four joints move toward together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pose {
    Start,
    Low,
    Mid,
    Loading,
    High,
}

const_assert_eq!(Pose::ALL.len(), POSE_COUNT);

impl Pose {
    pub const ALL: [Pose; 5] = [Pose::Start, Pose::Low, Pose::Mid, Pose::Loading, Pose::High];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Pose::Start => 0,
            Pose::Low => 1,
            Pose::Mid => 2,
            Pose::Loading => 3,
            Pose::High => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Pose::Start => "start",
            Pose::Low => "low",
            Pose::Mid => "mid",
            Pose::Loading => "loading",
            Pose::High => "high",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`Pose::from_str`] for an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pose '{0}' (expected one of: start, low, mid, loading, high)")]
pub struct UnknownPose(pub String);

impl FromStr for Pose {
    type Err = UnknownPose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pose::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPose(s.to_string()))
    }
}
