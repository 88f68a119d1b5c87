//! Configuration loading traits and the arm configuration schema.
//!
//! The whole table is loaded once at startup and is immutable afterwards:
//! per-joint limits and controller gains, per-(Joint, Pose) targets and guard
//! thresholds, and optional calibration pairs.
//!
//! # Usage
//!
//! ```rust,no_run
//! use arm_common::config::{ArmConfig, ConfigError, ConfigLoader};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = ArmConfig::load(Path::new("arm.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```
//!
//! # TOML layout
//!
//! ```toml
//! [shared]
//! service_name = "arm-cu"
//!
//! [cycle]
//! period_ms = 20
//!
//! [joints.elevator]
//! range = { start = 0.0, end = 2400.0 }
//! disconnect_sentinel = 2500.0
//! gains = { kp = 0.01 }
//! max_output = 1.0
//! slew = { rising = 2.0, falling = 2.0 }
//! calibration = { measured = { start = 0.0, end = 2400.0 }, installed = { start = 40.0, end = 2440.0 } }
//!
//! [poses.high.elbow]
//! target = 240.0
//! guard = { elevator_max = 1500.0 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::*;
use crate::error::RangeError;
use crate::joint::Joint;
use crate::pose::Pose;
use crate::range::Range;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A calibration pair could not be applied.
    #[error("Calibration of {joint} failed: {source}")]
    Calibration {
        joint: Joint,
        #[source]
        source: RangeError,
    },

    /// A calibration pair flips the joint's direction; threshold guards
    /// would compare against the opposite physical side.
    #[error("Calibration of {joint} reverses its direction")]
    ReversedCalibration { joint: Joint },

    /// A (Joint, Pose) entry is absent from the pose table.
    #[error("No {joint} entry for pose '{pose}'")]
    MissingEntry { joint: Joint, pose: Pose },

    /// The guard for (Joint, Pose) needs a threshold that is not configured.
    #[error("Guard for {joint} in pose '{pose}' requires threshold '{threshold}'")]
    MissingThreshold {
        joint: Joint,
        pose: Pose,
        threshold: &'static str,
    },
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Common configuration fields.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "arm-cu"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Arm Schema ─────────────────────────────────────────────────────

/// Top-level arm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmConfig {
    pub shared: SharedConfig,

    #[serde(default)]
    pub cycle: CycleConfig,

    pub joints: JointsConfig,

    #[serde(default)]
    pub poses: PosesConfig,
}

/// Control tick timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Tick period in milliseconds (default: 20 = 50 Hz).
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,
}

fn default_period_ms() -> u64 {
    CYCLE_PERIOD_MS
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_ms: CYCLE_PERIOD_MS,
        }
    }
}

impl CycleConfig {
    /// Tick period in seconds.
    pub fn dt(&self) -> f64 {
        self.period_ms as f64 / 1000.0
    }
}

/// Per-joint limits and controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Valid operating range in device units.
    pub range: Range,

    /// Value the sensor reports when disconnected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disconnect_sentinel: Option<f64>,

    pub gains: PdGains,

    /// Magnitude cap on the commanded velocity fraction.
    pub max_output: f64,

    /// Per-second limits on the change of commanded velocity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slew: Option<SlewConfig>,

    /// Distance from target reported as "at target".
    #[serde(default)]
    pub tolerance: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,
}

/// Proportional-derivative gains. `kd = 0` disables the derivative term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    pub kp: f64,
    #[serde(default)]
    pub kd: f64,
    /// Derivative filter time constant [s] (0 = unfiltered).
    #[serde(default)]
    pub tf: f64,
}

/// Asymmetric slew-rate limits [output units / s], both positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlewConfig {
    pub rising: f64,
    pub falling: f64,
}

/// A recalibration pair: values were tuned against `measured` and the sensor
/// now reports over `installed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub measured: Range,
    pub installed: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointsConfig {
    pub elevator: JointConfig,
    pub carriage: JointConfig,
    pub elbow: JointConfig,
    pub wrist: JointConfig,
}

impl JointsConfig {
    pub fn get(&self, joint: Joint) -> &JointConfig {
        match joint {
            Joint::Elevator => &self.elevator,
            Joint::Carriage => &self.carriage,
            Joint::Elbow => &self.elbow,
            Joint::Wrist => &self.wrist,
        }
    }

    pub fn get_mut(&mut self, joint: Joint) -> &mut JointConfig {
        match joint {
            Joint::Elevator => &mut self.elevator,
            Joint::Carriage => &mut self.carriage,
            Joint::Elbow => &mut self.elbow,
            Joint::Wrist => &mut self.wrist,
        }
    }
}

/// Guard thresholds for one (Joint, Pose) entry.
///
/// Each threshold is expressed in the units of the joint it names. Which
/// thresholds are required depends on the joint and pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuardThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevator_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carriage_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elbow_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist_max: Option<f64>,
}

impl GuardThresholds {
    /// Visit every configured threshold with the joint whose units it uses.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(Joint, &mut f64)) {
        let slots: [(Joint, &mut Option<f64>); 5] = [
            (Joint::Elevator, &mut self.elevator_max),
            (Joint::Carriage, &mut self.carriage_min),
            (Joint::Elbow, &mut self.elbow_min),
            (Joint::Wrist, &mut self.wrist_min),
            (Joint::Wrist, &mut self.wrist_max),
        ];
        for (joint, slot) in slots {
            if let Some(v) = slot.as_mut() {
                f(joint, v);
            }
        }
    }
}

/// Target position and guard data for one joint in one pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEntry {
    pub target: f64,
    #[serde(default)]
    pub guard: GuardThresholds,
}

/// The four joint entries of one pose. Absent entries are a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseJoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevator: Option<PoseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carriage: Option<PoseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elbow: Option<PoseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist: Option<PoseEntry>,
}

impl PoseJoints {
    pub fn get(&self, joint: Joint) -> Option<&PoseEntry> {
        match joint {
            Joint::Elevator => self.elevator.as_ref(),
            Joint::Carriage => self.carriage.as_ref(),
            Joint::Elbow => self.elbow.as_ref(),
            Joint::Wrist => self.wrist.as_ref(),
        }
    }

    pub fn get_mut(&mut self, joint: Joint) -> Option<&mut PoseEntry> {
        match joint {
            Joint::Elevator => self.elevator.as_mut(),
            Joint::Carriage => self.carriage.as_mut(),
            Joint::Elbow => self.elbow.as_mut(),
            Joint::Wrist => self.wrist.as_mut(),
        }
    }

    fn slot_mut(&mut self, joint: Joint) -> &mut Option<PoseEntry> {
        match joint {
            Joint::Elevator => &mut self.elevator,
            Joint::Carriage => &mut self.carriage,
            Joint::Elbow => &mut self.elbow,
            Joint::Wrist => &mut self.wrist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PosesConfig {
    #[serde(default)]
    pub start: PoseJoints,
    #[serde(default)]
    pub low: PoseJoints,
    #[serde(default)]
    pub mid: PoseJoints,
    #[serde(default)]
    pub loading: PoseJoints,
    #[serde(default)]
    pub high: PoseJoints,
}

impl PosesConfig {
    pub fn pose(&self, pose: Pose) -> &PoseJoints {
        match pose {
            Pose::Start => &self.start,
            Pose::Low => &self.low,
            Pose::Mid => &self.mid,
            Pose::Loading => &self.loading,
            Pose::High => &self.high,
        }
    }

    pub fn pose_mut(&mut self, pose: Pose) -> &mut PoseJoints {
        match pose {
            Pose::Start => &mut self.start,
            Pose::Low => &mut self.low,
            Pose::Mid => &mut self.mid,
            Pose::Loading => &mut self.loading,
            Pose::High => &mut self.high,
        }
    }

    pub fn entry(&self, joint: Joint, pose: Pose) -> Option<&PoseEntry> {
        self.pose(pose).get(joint)
    }

    pub fn entry_mut(&mut self, joint: Joint, pose: Pose) -> Option<&mut PoseEntry> {
        self.pose_mut(pose).get_mut(joint)
    }

    pub fn set(&mut self, joint: Joint, pose: Pose, entry: PoseEntry) {
        *self.pose_mut(pose).slot_mut(joint) = Some(entry);
    }

    pub fn remove(&mut self, joint: Joint, pose: Pose) -> Option<PoseEntry> {
        self.pose_mut(pose).slot_mut(joint).take()
    }
}

impl ArmConfig {
    /// Validate bounds and completeness.
    ///
    /// Guard-specific threshold requirements are checked when the table is
    /// resolved into guard rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if !(CYCLE_PERIOD_MS_MIN..=CYCLE_PERIOD_MS_MAX).contains(&self.cycle.period_ms) {
            return Err(ConfigError::ValidationError(format!(
                "cycle.period_ms {} outside [{CYCLE_PERIOD_MS_MIN}, {CYCLE_PERIOD_MS_MAX}]",
                self.cycle.period_ms
            )));
        }

        for joint in Joint::ALL {
            validate_joint(joint, self.joints.get(joint))?;
        }

        for pose in Pose::ALL {
            for joint in Joint::ALL {
                let entry = self
                    .poses
                    .entry(joint, pose)
                    .ok_or(ConfigError::MissingEntry { joint, pose })?;
                if !entry.target.is_finite() {
                    return Err(ConfigError::ValidationError(format!(
                        "{joint} target for pose '{pose}' is not finite"
                    )));
                }
                let mut thresholds = entry.guard;
                let mut bad = None;
                thresholds.for_each_mut(|_, v| {
                    if !v.is_finite() {
                        bad = Some(*v);
                    }
                });
                if let Some(v) = bad {
                    return Err(ConfigError::ValidationError(format!(
                        "{joint} guard threshold {v} for pose '{pose}' is not finite"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize back to TOML (used to dump the compiled-in table).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

fn validate_joint(joint: Joint, cfg: &JointConfig) -> Result<(), ConfigError> {
    let invalid = |what: String| Err(ConfigError::ValidationError(format!("{joint}: {what}")));

    if !cfg.range.is_finite() || cfg.range.length() == 0.0 {
        return invalid(format!(
            "range [{}, {}] must be finite and non-empty",
            cfg.range.start, cfg.range.end
        ));
    }
    if !(cfg.max_output.is_finite() && cfg.max_output > 0.0 && cfg.max_output <= 1.0) {
        return invalid(format!("max_output {} must be in (0, 1]", cfg.max_output));
    }
    let g = cfg.gains;
    if !(g.kp.is_finite() && g.kd.is_finite() && g.tf.is_finite()) || g.kp < 0.0 || g.kd < 0.0 || g.tf < 0.0 {
        return invalid("gains must be finite and non-negative".to_string());
    }
    if let Some(slew) = cfg.slew {
        if !(slew.rising.is_finite() && slew.rising > 0.0 && slew.falling.is_finite() && slew.falling > 0.0) {
            return invalid("slew rates must be finite and positive".to_string());
        }
    }
    if !(cfg.tolerance.is_finite() && cfg.tolerance >= 0.0) {
        return invalid(format!("tolerance {} must be finite and non-negative", cfg.tolerance));
    }
    if let Some(s) = cfg.disconnect_sentinel {
        if s.is_nan() {
            return invalid("disconnect_sentinel cannot be NaN".to_string());
        }
    }
    Ok(())
}

// ─── Compiled-in Table ──────────────────────────────────────────────

impl Default for ArmConfig {
    /// The tuned table for the competition robot.
    fn default() -> Self {
        let joint = |range: (f64, f64), sentinel, kp, max_output, tolerance| JointConfig {
            range: Range::new(range.0, range.1),
            disconnect_sentinel: Some(sentinel),
            gains: PdGains { kp, kd: 0.0, tf: 0.0 },
            max_output,
            slew: None,
            tolerance,
            calibration: None,
        };

        let mut elevator = joint(
            ELEVATOR_RANGE,
            ELEVATOR_DISCONNECT,
            ELEVATOR_KP,
            ELEVATOR_MAX_OUTPUT,
            ELEVATOR_TOLERANCE,
        );
        elevator.slew = Some(SlewConfig {
            rising: ELEVATOR_SLEW_RISING,
            falling: ELEVATOR_SLEW_FALLING,
        });

        let joints = JointsConfig {
            elevator,
            carriage: joint(
                CARRIAGE_RANGE,
                CARRIAGE_DISCONNECT,
                CARRIAGE_KP,
                CARRIAGE_MAX_OUTPUT,
                CARRIAGE_TOLERANCE,
            ),
            elbow: joint(ELBOW_RANGE, ELBOW_DISCONNECT, ELBOW_KP, ELBOW_MAX_OUTPUT, ELBOW_TOLERANCE),
            wrist: joint(WRIST_RANGE, WRIST_DISCONNECT, WRIST_KP, WRIST_MAX_OUTPUT, WRIST_TOLERANCE),
        };

        let mut poses = PosesConfig::default();
        for pose in Pose::ALL {
            let i = pose.index();

            let elevator_guard = match pose {
                Pose::Start | Pose::Mid => GuardThresholds {
                    elbow_min: Some(ELEVATOR_START_MID_ELBOW_MIN),
                    wrist_min: Some(ELEVATOR_START_MID_WRIST_MIN),
                    ..Default::default()
                },
                Pose::Low => GuardThresholds {
                    elbow_min: Some(ELEVATOR_LOW_ELBOW_MIN),
                    wrist_min: Some(ELEVATOR_LOW_WRIST_MIN),
                    carriage_min: Some(ELEVATOR_LOW_CARRIAGE_MIN),
                    ..Default::default()
                },
                Pose::High => GuardThresholds {
                    elbow_min: Some(ELEVATOR_HIGH_ELBOW_MIN),
                    wrist_max: Some(ELEVATOR_HIGH_WRIST_MAX),
                    ..Default::default()
                },
                Pose::Loading => GuardThresholds::default(),
            };
            poses.set(
                Joint::Elevator,
                pose,
                PoseEntry {
                    target: ELEVATOR_TARGETS[i],
                    guard: elevator_guard,
                },
            );

            poses.set(
                Joint::Carriage,
                pose,
                PoseEntry {
                    target: CARRIAGE_TARGETS[i],
                    guard: GuardThresholds {
                        elbow_min: Some(CARRIAGE_ELBOW_MIN[i]),
                        ..Default::default()
                    },
                },
            );

            let elbow_guard = match pose {
                Pose::High => GuardThresholds {
                    elevator_max: Some(ELBOW_HIGH_ELEVATOR_MAX),
                    ..Default::default()
                },
                _ => GuardThresholds {
                    carriage_min: Some(ELBOW_CARRIAGE_MIN[i]),
                    wrist_min: Some(ELBOW_WRIST_MIN[i]),
                    ..Default::default()
                },
            };
            poses.set(
                Joint::Elbow,
                pose,
                PoseEntry {
                    target: ELBOW_TARGETS[i],
                    guard: elbow_guard,
                },
            );

            poses.set(
                Joint::Wrist,
                pose,
                PoseEntry {
                    target: WRIST_TARGETS[i],
                    guard: GuardThresholds {
                        elbow_min: Some(WRIST_ELBOW_MIN[i]),
                        ..Default::default()
                    },
                },
            );
        }

        Self {
            shared: SharedConfig {
                log_level: LogLevel::Info,
                service_name: "arm-cu".to_string(),
            },
            cycle: CycleConfig::default(),
            joints,
            poses,
        }
    }
}
