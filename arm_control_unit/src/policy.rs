//! Per-joint policy for one pose activation.
//!
//! A [`JointPolicy`] is created when a pose is requested and dropped when the
//! next one is. It owns its controller memory, so nothing carries over from a
//! previous pose.
//!
//! ## Evaluation order
//!
//! ```text
//! own reading invalid ────────── PD + slew reset ──▶ 0   Faulted
//! demand = PD(target − position)
//! guard fails ─────────────────────── slew reset ──▶ 0   Blocked
//! v = slew(clamp(demand, ±max_output))
//! v points away from target ──────── slew reset ──▶ 0
//! v × speed_scale ─────────────────────────────────▶ v   Moving | AtTarget
//! ```

use arm_common::config::PdGains;
use arm_common::joint::Joint;
use arm_common::pose::Pose;
use tracing::trace;

use crate::config::ResolvedConfig;
use crate::control::pd::{PdState, pd_compute};
use crate::control::slew::SlewLimiter;
use crate::guard::{GuardInput, GuardRule};
use crate::snapshot::PositionSnapshot;
use crate::speed::SpeedScale;

/// Outcome of one joint on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointStatus {
    /// No pose active.
    #[default]
    Idle,
    /// Guard satisfied and outside tolerance.
    Moving,
    /// Guard not satisfied; held at zero.
    Blocked,
    /// Within tolerance of the target.
    AtTarget,
    /// Own sensor reading invalid; held at zero.
    Faulted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOutput {
    pub velocity: f64,
    pub status: JointStatus,
}

impl PolicyOutput {
    const fn hold(status: JointStatus) -> Self {
        Self {
            velocity: 0.0,
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JointPolicy {
    joint: Joint,
    pose: Pose,
    target: f64,
    guard: GuardRule,
    max_output: f64,
    tolerance: f64,
    gains: PdGains,
    dt: f64,
    pd: PdState,
    slew: Option<SlewLimiter>,
}

impl JointPolicy {
    pub fn new(joint: Joint, pose: Pose, config: &ResolvedConfig) -> Self {
        let limits = config.joint(joint);
        let entry = config.entry(joint, pose);
        let dt = config.dt();
        Self {
            joint,
            pose,
            target: entry.target,
            guard: entry.guard,
            max_output: limits.max_output,
            tolerance: limits.tolerance,
            gains: limits.gains,
            dt,
            pd: PdState::default(),
            slew: limits.slew.as_ref().map(|s| SlewLimiter::new(s, dt)),
        }
    }

    #[inline]
    pub fn joint(&self) -> Joint {
        self.joint
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn guard(&self) -> &GuardRule {
        &self.guard
    }

    /// Largest per-tick change the slew limiter allows, if the joint has one.
    pub fn slew_step(&self) -> Option<f64> {
        self.slew.as_ref().map(SlewLimiter::max_step)
    }

    /// Compute this tick's velocity command.
    pub fn evaluate(&mut self, speed: SpeedScale, snapshot: &PositionSnapshot) -> PolicyOutput {
        let Some(position) = snapshot.get(self.joint) else {
            // A stale error would kick the derivative on recovery.
            self.pd.reset();
            self.reset_slew();
            return PolicyOutput::hold(JointStatus::Faulted);
        };

        let error = self.target - position;
        let demand = pd_compute(&mut self.pd, &self.gains, error, self.dt);

        let permitted = self.guard.permits(&GuardInput {
            snapshot,
            position,
            target: self.target,
            demand,
        });
        if !permitted {
            trace!(joint = %self.joint, position, demand, "guard holds joint");
            self.reset_slew();
            return PolicyOutput::hold(JointStatus::Blocked);
        }

        let mut v = demand.clamp(-self.max_output, self.max_output);
        if let Some(slew) = self.slew.as_mut() {
            v = slew.apply(v);
        }
        if v * error < 0.0 {
            v = 0.0;
            self.reset_slew();
        }

        let status = if error.abs() <= self.tolerance {
            JointStatus::AtTarget
        } else {
            JointStatus::Moving
        };

        PolicyOutput {
            velocity: v * speed.get(),
            status,
        }
    }

    fn reset_slew(&mut self) {
        if let Some(slew) = self.slew.as_mut() {
            slew.reset(0.0);
        }
    }
}
