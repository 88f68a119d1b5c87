//! Guard and control-law properties over every (Joint, Pose) pair.

use arm_common::joint::Joint;
use arm_common::pose::Pose;
use arm_control_unit::config::ResolvedConfig;
use arm_control_unit::guard::GuardRule;
use arm_control_unit::policy::{JointPolicy, JointStatus};
use arm_control_unit::snapshot::PositionSnapshot;
use arm_control_unit::speed::SpeedScale;

use super::PositionGen;

/// Positions that fail every guard of `joint` except the lift's Loading rule.
fn blocking_snapshot(joint: Joint) -> PositionSnapshot {
    match joint {
        // Carriage fully retracted; lift above the High elbow limit and the
        // elbow above its High target.
        Joint::Elbow => PositionSnapshot::valid(2000.0, 0.0, 300.0, 100.0),
        // Elbow at zero fails every elbow_min; the wrist sits above all its
        // targets so its demand is negative.
        _ => PositionSnapshot::valid(1000.0, 500.0, 0.0, 350.0),
    }
}

#[test]
fn failed_guard_commands_exact_zero_for_every_pair() {
    let config = ResolvedConfig::default();
    for joint in Joint::ALL {
        for pose in Pose::ALL {
            let mut policy = JointPolicy::new(joint, pose, &config);
            if *policy.guard() == GuardRule::Unconditional {
                continue;
            }
            let snap = blocking_snapshot(joint);
            for speed in [SpeedScale::FULL, SpeedScale::new(0.3).unwrap()] {
                let out = policy.evaluate(speed, &snap);
                assert_eq!(out.status, JointStatus::Blocked, "{joint} in {pose}");
                assert_eq!(out.velocity, 0.0, "{joint} in {pose}");
            }
        }
    }
}

#[test]
fn loading_lift_is_never_blocked() {
    let config = ResolvedConfig::default();
    let mut policy = JointPolicy::new(Joint::Elevator, Pose::Loading, &config);
    let out = policy.evaluate(SpeedScale::FULL, &blocking_snapshot(Joint::Elevator));
    assert_eq!(out.status, JointStatus::Moving);
    assert!(out.velocity > 0.0);
}

#[test]
fn velocity_never_points_away_and_stays_bounded() {
    let config = ResolvedConfig::default();
    let mut positions = PositionGen::new(0x5eed);
    let speeds = [0.0, 0.25, 1.0];

    for joint in Joint::ALL {
        let max_output = config.joint(joint).max_output;
        for pose in Pose::ALL {
            let mut policy = JointPolicy::new(joint, pose, &config);
            for i in 0..300 {
                let raw = positions.positions(&config);
                let snap = PositionSnapshot::from_raw(&raw, &config);
                let speed = SpeedScale::new(speeds[i % speeds.len()]).unwrap();

                let out = policy.evaluate(speed, &snap);
                let error = policy.target() - raw[joint];

                assert!(
                    out.velocity.abs() <= max_output * speed.get() + 1e-12,
                    "{joint} in {pose}: |{}| exceeds bound",
                    out.velocity
                );
                assert!(
                    out.velocity * error >= 0.0,
                    "{joint} in {pose}: velocity {} moves away (error {error})",
                    out.velocity
                );
                if out.status == JointStatus::Blocked {
                    assert_eq!(out.velocity, 0.0);
                }
            }
        }
    }
}
