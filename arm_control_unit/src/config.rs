//! Configuration resolution for the arm control unit.
//!
//! Turns a parsed [`ArmConfig`] into the immutable runtime table:
//! calibration applied, guard thresholds bound into typed [`GuardRule`]s,
//! every (Joint, Pose) pair present.

use std::path::Path;
use std::time::Duration;

use arm_common::config::{
    ArmConfig, ConfigError, ConfigLoader, CycleConfig, JointConfig, PdGains, SharedConfig,
    SlewConfig,
};
use arm_common::consts::POSE_COUNT;
use arm_common::error::RangeError;
use arm_common::joint::{Joint, JointMap};
use arm_common::pose::Pose;
use arm_common::range::{Range, RangeConverter};
use tracing::info;

use crate::guard::GuardRule;

// ─── Resolved Table ─────────────────────────────────────────────────

/// Per-joint limits after calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedJoint {
    /// Valid reading range, `start <= end`.
    pub range: Range,
    pub disconnect_sentinel: Option<f64>,
    pub gains: PdGains,
    pub max_output: f64,
    pub slew: Option<SlewConfig>,
    pub tolerance: f64,
}

/// Target and guard for one (Joint, Pose).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTarget {
    pub target: f64,
    pub guard: GuardRule,
}

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub shared: SharedConfig,
    pub cycle: CycleConfig,
    joints: JointMap<ResolvedJoint>,
    table: [JointMap<PoseTarget>; POSE_COUNT],
}

impl ResolvedConfig {
    #[inline]
    pub fn joint(&self, joint: Joint) -> &ResolvedJoint {
        &self.joints[joint]
    }

    #[inline]
    pub fn entry(&self, joint: Joint, pose: Pose) -> &PoseTarget {
        &self.table[pose.index()][joint]
    }

    /// Targets of every joint for one pose.
    pub fn targets(&self, pose: Pose) -> JointMap<f64> {
        self.table[pose.index()].map(|e| e.target)
    }

    /// Tick period [s].
    #[inline]
    pub fn dt(&self) -> f64 {
        self.cycle.dt()
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.cycle.period_ms)
    }
}

impl Default for ResolvedConfig {
    /// The compiled-in table, which always resolves.
    fn default() -> Self {
        match resolve(ArmConfig::default()) {
            Ok(config) => config,
            Err(e) => unreachable!("compiled-in arm table is invalid: {e}"),
        }
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load, validate and resolve an arm configuration file.
pub fn load_config(path: &Path) -> Result<ResolvedConfig, ConfigError> {
    let raw = ArmConfig::load(path)?;
    let config = resolve(raw)?;
    info!(
        path = %path.display(),
        service = %config.shared.service_name,
        period_ms = config.cycle.period_ms,
        "Arm configuration loaded"
    );
    Ok(config)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(text: &str) -> Result<ResolvedConfig, ConfigError> {
    resolve(ArmConfig::from_toml(text)?)
}

/// Validate, apply calibration and bind guard rules.
///
/// Calibration of joint `j` remaps `j`'s range bounds, its targets in every
/// pose, its tolerance (by the scale factor) and every guard threshold
/// expressed in `j`'s units. Disconnect sentinels are raw sensor values and
/// are left alone.
///
/// A pair with a negative scale factor is rejected: guards compare with a
/// fixed `>` or `<`, which a reversed mapping would point at the wrong side.
pub fn resolve(mut config: ArmConfig) -> Result<ResolvedConfig, ConfigError> {
    config.validate()?;

    for joint in Joint::ALL {
        if let Some(cal) = config.joints.get(joint).calibration {
            let conv = RangeConverter::new(cal.measured, cal.installed)
                .map_err(|source| ConfigError::Calibration { joint, source })?;
            if conv.scale_factor() < 0.0 {
                return Err(ConfigError::ReversedCalibration { joint });
            }
            calibrate(&mut config, joint, &conv)
                .map_err(|source| ConfigError::Calibration { joint, source })?;
            info!(
                joint = %joint,
                from = ?cal.measured,
                to = ?cal.installed,
                "Calibration applied"
            );
        }
    }

    let joints = JointMap::from_fn(|joint| resolve_joint(config.joints.get(joint)));

    let mut table = Vec::with_capacity(POSE_COUNT);
    for pose in Pose::ALL {
        table.push(JointMap::try_from_fn(|joint| {
            let entry = config
                .poses
                .entry(joint, pose)
                .ok_or(ConfigError::MissingEntry { joint, pose })?;
            let range = joints[joint].range;
            if !range.contains(entry.target) {
                return Err(ConfigError::ValidationError(format!(
                    "{joint} target {} for pose '{pose}' outside [{}, {}]",
                    entry.target, range.start, range.end
                )));
            }
            Ok(PoseTarget {
                target: entry.target,
                guard: GuardRule::resolve(joint, pose, &entry.guard)?,
            })
        })?);
    }
    let table: [JointMap<PoseTarget>; POSE_COUNT] = table
        .try_into()
        .map_err(|_| ConfigError::ValidationError("pose table size mismatch".to_string()))?;

    Ok(ResolvedConfig {
        shared: config.shared,
        cycle: config.cycle,
        joints,
        table,
    })
}

fn resolve_joint(cfg: &JointConfig) -> ResolvedJoint {
    ResolvedJoint {
        range: cfg.range.normalized(),
        disconnect_sentinel: cfg.disconnect_sentinel,
        gains: cfg.gains,
        max_output: cfg.max_output,
        slew: cfg.slew,
        tolerance: cfg.tolerance,
    }
}

fn calibrate(
    config: &mut ArmConfig,
    joint: Joint,
    conv: &RangeConverter,
) -> Result<(), RangeError> {
    let cfg = config.joints.get_mut(joint);
    cfg.range = Range::new(conv.convert(cfg.range.start)?, conv.convert(cfg.range.end)?);
    cfg.tolerance *= conv.scale_factor();

    for pose in Pose::ALL {
        for owner in Joint::ALL {
            let Some(entry) = config.poses.entry_mut(owner, pose) else {
                continue;
            };
            if owner == joint {
                entry.target = conv.convert(entry.target)?;
            }
            let mut result = Ok(());
            entry.guard.for_each_mut(|unit, v| {
                if unit == joint && result.is_ok() {
                    match conv.convert(*v) {
                        Ok(mapped) => *v = mapped,
                        Err(e) => result = Err(e),
                    }
                }
            });
            result?;
        }
    }
    Ok(())
}
