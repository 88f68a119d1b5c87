//! Pose coordinator: the per-tick entry point.
//!
//! Owns the joint handles and the active pose's four policies. Each tick
//! samples all four positions exactly once, evaluates every policy against
//! that one snapshot, then commands all four joints.
//!
//! ```text
//!            request_pose(p, s)                    stop_all()
//!   Idle ─────────────────────────▶ Active(p) ─────────────────▶ Idle
//!                                    │    ▲
//!                                    └────┘ request_pose(q, s)
//!                                   (q ≠ p: fresh policies,
//!                                    q = p: speed only)
//! ```

use arm_common::error::SensorFault;
use arm_common::joint::{Joint, JointMap};
use arm_common::pose::Pose;
use tracing::{debug, info, warn};

use crate::config::ResolvedConfig;
use crate::driver::JointBank;
use crate::policy::{JointPolicy, JointStatus};
use crate::snapshot::PositionSnapshot;
use crate::speed::SpeedScale;

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// 1-based tick number; 0 before the first tick.
    pub tick: u64,
    pub pose: Option<Pose>,
    pub velocities: JointMap<f64>,
    pub statuses: JointMap<JointStatus>,
    pub faults: JointMap<SensorFault>,
}

impl TickReport {
    /// True when a pose is active and every joint is within tolerance.
    pub fn all_at_target(&self) -> bool {
        self.pose.is_some()
            && self
                .statuses
                .values()
                .iter()
                .all(|s| *s == JointStatus::AtTarget)
    }

    pub fn count(&self, status: JointStatus) -> usize {
        self.statuses.values().iter().filter(|s| **s == status).count()
    }
}

#[derive(Debug, Clone)]
struct ActivePose {
    pose: Pose,
    speed: SpeedScale,
    policies: JointMap<JointPolicy>,
}

#[derive(Debug)]
pub struct Coordinator {
    joints: JointBank,
    config: ResolvedConfig,
    active: Option<ActivePose>,
    last_report: TickReport,
    tick_count: u64,
}

impl Coordinator {
    pub fn new(joints: JointBank, config: ResolvedConfig) -> Self {
        Self {
            joints,
            config,
            active: None,
            last_report: TickReport::default(),
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Activate `pose`. Re-requesting the active pose only updates the speed.
    pub fn request_pose(&mut self, pose: Pose, speed: SpeedScale) {
        if let Some(active) = self.active.as_mut() {
            if active.pose == pose {
                if active.speed != speed {
                    debug!(pose = %pose, speed = speed.get(), "Speed scale updated");
                }
                active.speed = speed;
                return;
            }
        }

        let previous = self.active.as_ref().map(|a| a.pose);
        let policies = JointMap::from_fn(|joint| JointPolicy::new(joint, pose, &self.config));
        self.active = Some(ActivePose {
            pose,
            speed,
            policies,
        });
        info!(
            pose = %pose,
            previous = ?previous,
            speed = speed.get(),
            "Pose requested"
        );
    }

    /// Run one control tick.
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;

        let raw = self.joints.sample();
        let snapshot = PositionSnapshot::from_raw(&raw, &self.config);
        let faults = snapshot.faults();
        self.log_fault_edges(&snapshot, &raw);

        let mut velocities = JointMap::new([0.0; 4]);
        let mut statuses = JointMap::new([JointStatus::Idle; 4]);

        if let Some(active) = self.active.as_mut() {
            for joint in Joint::ALL {
                let out = active.policies[joint].evaluate(active.speed, &snapshot);
                if out.status == JointStatus::Blocked
                    && self.last_report.statuses[joint] != JointStatus::Blocked
                {
                    debug!(
                        joint = %joint,
                        pose = %active.pose,
                        reads = ?active.policies[joint].guard().depends_on(),
                        "Joint held by guard"
                    );
                }
                velocities[joint] = out.velocity;
                statuses[joint] = out.status;
            }
        }

        self.joints.command(&velocities);

        let report = TickReport {
            tick: self.tick_count,
            pose: self.active.as_ref().map(|a| a.pose),
            velocities,
            statuses,
            faults,
        };
        if report.all_at_target() && !self.last_report.all_at_target() {
            info!(pose = ?report.pose, tick = report.tick, "Pose reached");
        }
        self.last_report = report;
        report
    }

    /// Command zero to every joint and drop the active pose.
    pub fn stop_all(&mut self) {
        if let Some(active) = self.active.take() {
            info!(pose = %active.pose, "All joints stopped");
        }
        let zero = JointMap::new([0.0; 4]);
        self.joints.command(&zero);
        self.last_report.velocities = zero;
        self.last_report.statuses = JointMap::new([JointStatus::Idle; 4]);
        self.last_report.pose = None;
    }

    // ─── Diagnostics ────────────────────────────────────────────────

    pub fn active_pose(&self) -> Option<Pose> {
        self.active.as_ref().map(|a| a.pose)
    }

    pub fn speed_scale(&self) -> Option<SpeedScale> {
        self.active.as_ref().map(|a| a.speed)
    }

    /// Velocity most recently commanded to `joint`.
    pub fn last_velocity(&self, joint: Joint) -> f64 {
        self.last_report.velocities[joint]
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn log_fault_edges(&self, snapshot: &PositionSnapshot, raw: &JointMap<f64>) {
        let before = &self.last_report.faults;
        for bad in snapshot.invalid() {
            if before[bad.joint] != bad.reason {
                warn!(
                    joint = %bad.joint,
                    value = bad.value,
                    reason = ?bad.reason,
                    "Invalid sensor reading"
                );
            }
        }
        for joint in Joint::ALL {
            if !before[joint].is_empty() && snapshot.get(joint).is_some() {
                info!(joint = %joint, value = raw[joint], "Sensor reading recovered");
            }
        }
    }
}
