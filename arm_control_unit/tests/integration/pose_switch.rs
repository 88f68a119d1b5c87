//! Pose activation: fresh controller memory, same-pose refresh and stop.

use arm_common::joint::Joint;
use arm_common::pose::Pose;
use arm_control_unit::policy::JointStatus;
use arm_control_unit::speed::SpeedScale;

use super::rig_at;

/// Lift below both its Mid and High targets with every guard clear.
const CLEAR: [f64; 4] = [500.0, 2150.0, 240.0, 270.0];

#[test]
fn switch_mid_transition_restarts_lift_ramp() {
    let (mut c, _rig) = rig_at(CLEAR);
    let step = {
        let cfg = c.config().joint(Joint::Elevator);
        let slew = cfg.slew.unwrap();
        slew.rising.max(slew.falling) * c.config().dt()
    };

    c.request_pose(Pose::Mid, SpeedScale::FULL);
    for _ in 0..40 {
        c.tick();
    }
    assert!((c.last_velocity(Joint::Elevator) - 1.0).abs() < 1e-12);

    c.request_pose(Pose::High, SpeedScale::FULL);
    let report = c.tick();
    assert_eq!(report.pose, Some(Pose::High));
    let lift = report.velocities[Joint::Elevator];
    assert!(lift.abs() <= step + 1e-12, "first post-switch lift velocity {lift}");
    assert!(lift > 0.0);
}

#[test]
fn re_requesting_active_pose_keeps_ramp() {
    let (mut c, _rig) = rig_at(CLEAR);
    c.request_pose(Pose::Mid, SpeedScale::FULL);
    for _ in 0..10 {
        c.tick();
    }
    let before = c.last_velocity(Joint::Elevator);
    c.request_pose(Pose::Mid, SpeedScale::FULL);
    c.tick();
    let after = c.last_velocity(Joint::Elevator);
    assert!((after - before - 0.04).abs() < 1e-12);
}

#[test]
fn stop_all_mid_transition_then_idle_ticks() {
    let (mut c, rig) = rig_at(CLEAR);
    c.request_pose(Pose::High, SpeedScale::FULL);
    for _ in 0..5 {
        super::tick_and_step(&mut c, &rig);
    }
    assert!(c.last_velocity(Joint::Elevator) > 0.0);

    c.stop_all();
    c.stop_all();
    assert_eq!(c.active_pose(), None);
    assert_eq!(c.speed_scale(), None);
    for joint in Joint::ALL {
        assert_eq!(rig.handle(joint).velocity().unwrap(), 0.0);
    }

    let report = c.tick();
    assert_eq!(report.count(JointStatus::Idle), 4);
    assert!(report.velocities.values().iter().all(|v| *v == 0.0));
}

#[test]
fn speed_scale_zero_holds_everything() {
    let (mut c, rig) = rig_at(CLEAR);
    c.request_pose(Pose::Loading, SpeedScale::ZERO);
    for _ in 0..20 {
        super::tick_and_step(&mut c, &rig);
    }
    for joint in Joint::ALL {
        assert_eq!(c.last_velocity(joint), 0.0);
    }
    assert_eq!(rig.positions().unwrap().values(), &CLEAR);
}
