//! Per-(Joint, Pose) safety guards.
//!
//! A guard decides, every tick, whether its joint may move toward the
//! active pose's target. It reads the other joints' positions; two rules
//! also look at the joint itself (the elbow may keep retracting toward
//! `High`, and the wrist may always move toward its tucked side).
//!
//! ## Guard Table
//!
//! ```text
//! Joint     Pose                       Moves when
//! ───────── ────────────────────────── ──────────────────────────────────────────
//! Elbow     Start, Low, Mid, Loading   carriage > carriage_min ∧ wrist > wrist_min
//! Elbow     High                       elevator < elevator_max ∨ elbow < target
//! Elevator  Start, Mid                 elbow > elbow_min ∧ wrist > wrist_min
//! Elevator  Low                        elbow > elbow_min ∧ wrist > wrist_min ∧ carriage > carriage_min
//! Elevator  High                       elbow > elbow_min ∧ wrist < wrist_max
//! Elevator  Loading                    always
//! Carriage  any                        elbow > elbow_min
//! Wrist     any                        elbow > elbow_min ∨ demand > 0
//! ```
//!
//! A comparison against a sibling whose reading is invalid is false.

use arm_common::config::{ConfigError, GuardThresholds};
use arm_common::joint::Joint;
use arm_common::pose::Pose;

use crate::snapshot::PositionSnapshot;

/// Resolved guard predicate with its thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardRule {
    /// Elbow toward Start/Low/Mid/Loading.
    ElbowClearance { carriage_min: f64, wrist_min: f64 },
    /// Elbow toward High.
    ElbowHigh { elevator_max: f64 },
    /// Elevator toward Start/Mid.
    LiftClearance { elbow_min: f64, wrist_min: f64 },
    /// Elevator toward Low.
    LiftLow {
        elbow_min: f64,
        wrist_min: f64,
        carriage_min: f64,
    },
    /// Elevator toward High. Note the wrist comparison is inverted.
    LiftHigh { elbow_min: f64, wrist_max: f64 },
    /// Elevator toward Loading.
    Unconditional,
    /// Carriage, every pose.
    CarriageClearance { elbow_min: f64 },
    /// Wrist, every pose.
    WristClearance { elbow_min: f64 },
}

/// Everything a guard may look at for one joint on one tick.
#[derive(Debug, Clone, Copy)]
pub struct GuardInput<'a> {
    pub snapshot: &'a PositionSnapshot,
    /// The guarded joint's own (valid) position.
    pub position: f64,
    pub target: f64,
    /// Controller demand before clipping; positive means increasing position.
    pub demand: f64,
}

impl GuardRule {
    /// Pick the rule for (joint, pose) and pull its thresholds.
    ///
    /// # Errors
    /// [`ConfigError::MissingThreshold`] if a threshold the rule needs is absent.
    pub fn resolve(joint: Joint, pose: Pose, t: &GuardThresholds) -> Result<Self, ConfigError> {
        let need = |value: Option<f64>, threshold: &'static str| {
            value.ok_or(ConfigError::MissingThreshold {
                joint,
                pose,
                threshold,
            })
        };

        let rule = match (joint, pose) {
            (Joint::Elbow, Pose::Start | Pose::Low | Pose::Mid | Pose::Loading) => {
                GuardRule::ElbowClearance {
                    carriage_min: need(t.carriage_min, "carriage_min")?,
                    wrist_min: need(t.wrist_min, "wrist_min")?,
                }
            }
            (Joint::Elbow, Pose::High) => GuardRule::ElbowHigh {
                elevator_max: need(t.elevator_max, "elevator_max")?,
            },
            (Joint::Elevator, Pose::Start | Pose::Mid) => GuardRule::LiftClearance {
                elbow_min: need(t.elbow_min, "elbow_min")?,
                wrist_min: need(t.wrist_min, "wrist_min")?,
            },
            (Joint::Elevator, Pose::Low) => GuardRule::LiftLow {
                elbow_min: need(t.elbow_min, "elbow_min")?,
                wrist_min: need(t.wrist_min, "wrist_min")?,
                carriage_min: need(t.carriage_min, "carriage_min")?,
            },
            (Joint::Elevator, Pose::High) => GuardRule::LiftHigh {
                elbow_min: need(t.elbow_min, "elbow_min")?,
                wrist_max: need(t.wrist_max, "wrist_max")?,
            },
            (Joint::Elevator, Pose::Loading) => GuardRule::Unconditional,
            (Joint::Carriage, _) => GuardRule::CarriageClearance {
                elbow_min: need(t.elbow_min, "elbow_min")?,
            },
            (Joint::Wrist, _) => GuardRule::WristClearance {
                elbow_min: need(t.elbow_min, "elbow_min")?,
            },
        };
        Ok(rule)
    }

    /// Sibling joints whose readings this rule consults.
    pub fn depends_on(&self) -> &'static [Joint] {
        match self {
            GuardRule::ElbowClearance { .. } => &[Joint::Carriage, Joint::Wrist],
            GuardRule::ElbowHigh { .. } => &[Joint::Elevator],
            GuardRule::LiftClearance { .. } | GuardRule::LiftHigh { .. } => {
                &[Joint::Elbow, Joint::Wrist]
            }
            GuardRule::LiftLow { .. } => &[Joint::Elbow, Joint::Wrist, Joint::Carriage],
            GuardRule::Unconditional => &[],
            GuardRule::CarriageClearance { .. } | GuardRule::WristClearance { .. } => {
                &[Joint::Elbow]
            }
        }
    }

    /// Evaluate the predicate.
    pub fn permits(&self, input: &GuardInput<'_>) -> bool {
        let s = input.snapshot;
        match *self {
            GuardRule::ElbowClearance {
                carriage_min,
                wrist_min,
            } => above(s, Joint::Carriage, carriage_min) && above(s, Joint::Wrist, wrist_min),
            GuardRule::ElbowHigh { elevator_max } => {
                below(s, Joint::Elevator, elevator_max) || input.position < input.target
            }
            GuardRule::LiftClearance {
                elbow_min,
                wrist_min,
            } => above(s, Joint::Elbow, elbow_min) && above(s, Joint::Wrist, wrist_min),
            GuardRule::LiftLow {
                elbow_min,
                wrist_min,
                carriage_min,
            } => {
                above(s, Joint::Elbow, elbow_min)
                    && above(s, Joint::Wrist, wrist_min)
                    && above(s, Joint::Carriage, carriage_min)
            }
            GuardRule::LiftHigh {
                elbow_min,
                wrist_max,
            } => above(s, Joint::Elbow, elbow_min) && below(s, Joint::Wrist, wrist_max),
            GuardRule::Unconditional => true,
            GuardRule::CarriageClearance { elbow_min } => above(s, Joint::Elbow, elbow_min),
            GuardRule::WristClearance { elbow_min } => {
                above(s, Joint::Elbow, elbow_min) || input.demand > 0.0
            }
        }
    }
}

/// `joint` has a valid reading strictly above `min`.
#[inline]
fn above(snapshot: &PositionSnapshot, joint: Joint, min: f64) -> bool {
    snapshot.get(joint).is_some_and(|p| p > min)
}

/// `joint` has a valid reading strictly below `max`.
#[inline]
fn below(snapshot: &PositionSnapshot, joint: Joint, max: f64) -> bool {
    snapshot.get(joint).is_some_and(|p| p < max)
}
