//! Full pose sequences on the simulated rig.

use arm_common::joint::Joint;
use arm_common::pose::Pose;
use arm_control_unit::config::ResolvedConfig;
use arm_control_unit::coordinator::Coordinator;
use arm_control_unit::policy::JointStatus;
use arm_control_unit::sim::SimRig;
use arm_control_unit::speed::SpeedScale;

use super::tick_and_step;

const MAX_TICKS: u64 = 3000;

#[test]
fn stowed_rig_visits_every_pose() {
    let config = ResolvedConfig::default();
    let rig = SimRig::stowed(&config);
    let mut c = Coordinator::new(rig.bank(), config.clone());

    for pose in [Pose::Low, Pose::High, Pose::Mid, Pose::Start, Pose::Loading] {
        c.request_pose(pose, SpeedScale::FULL);

        let mut reached = None;
        for n in 1..=MAX_TICKS {
            let report = tick_and_step(&mut c, &rig);
            for joint in Joint::ALL {
                if report.statuses[joint] == JointStatus::Blocked {
                    assert_eq!(report.velocities[joint], 0.0);
                }
                assert_ne!(report.statuses[joint], JointStatus::Faulted);
            }
            if report.all_at_target() {
                reached = Some(n);
                break;
            }
        }
        assert!(reached.is_some(), "{pose} not reached in {MAX_TICKS} ticks");

        let targets = config.targets(pose);
        for joint in Joint::ALL {
            let err = (rig.handle(joint).position().unwrap() - targets[joint]).abs();
            assert!(err <= config.joint(joint).tolerance, "{joint} off by {err} in {pose}");
        }
    }
}

#[test]
fn high_from_low_lifts_only_after_elbow_clears() {
    let config = ResolvedConfig::default();
    let low = config.targets(Pose::Low);
    let rig = SimRig::from_config(&config, low);
    let mut c = Coordinator::new(rig.bank(), config);
    c.request_pose(Pose::High, SpeedScale::FULL);

    for _ in 0..MAX_TICKS {
        let elbow = rig.handle(Joint::Elbow).position().unwrap();
        let report = tick_and_step(&mut c, &rig);
        if elbow <= 200.0 {
            assert_eq!(report.velocities[Joint::Elevator], 0.0);
        }
        if report.all_at_target() {
            return;
        }
    }
    panic!("High not reached");
}

#[test]
fn reduced_speed_still_converges() {
    let (mut c, rig) = super::rig_at([200.0, 1000.0, 320.0, 330.0]);
    c.request_pose(Pose::Loading, SpeedScale::new(0.5).unwrap());
    assert!(super::run_until_reached(&mut c, &rig, 2 * MAX_TICKS).is_some());
}
