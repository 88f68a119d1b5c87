//! Concrete interlock scenarios on the simulated rig.

use arm_common::error::SensorFault;
use arm_common::joint::Joint;
use arm_common::pose::Pose;
use arm_control_unit::policy::JointStatus;
use arm_control_unit::speed::SpeedScale;

use super::{rig_at, tick_and_step};

/// Elbow near its Start target, lift above the High elbow limit (1500).
/// The elbow stays at zero until the lift drops below the limit, then moves
/// toward its High target on the very next tick.
#[test]
fn high_elbow_waits_for_lift_to_drop() {
    let (mut c, rig) = rig_at([1800.0, 1000.0, 320.0, 330.0]);
    c.request_pose(Pose::High, SpeedScale::FULL);

    let mut lift = 1800.0;
    let mut resumed_at = None;
    while lift > 1400.0 {
        rig.handle(Joint::Elevator).set_position(lift).unwrap();
        let report = c.tick();
        let elbow = report.velocities[Joint::Elbow];

        if lift >= 1500.0 {
            assert_eq!(elbow, 0.0, "elbow moved with lift at {lift}");
            assert_eq!(report.statuses[Joint::Elbow], JointStatus::Blocked);
        } else {
            assert!(elbow < 0.0, "elbow should retract toward 240, got {elbow}");
            if resumed_at.is_none() {
                resumed_at = Some(lift);
            }
        }
        lift -= 20.0;
    }
    // First sample below the limit.
    assert_eq!(resumed_at, Some(1480.0));
}

/// A disconnected carriage sensor in Low stops the carriage and the lift.
/// The elbow's Low guard reads the carriage too and fails closed; the wrist
/// keeps converging.
#[test]
fn carriage_fault_in_low() {
    let (mut c, rig) = rig_at([600.0, 2100.0, 250.0, 300.0]);
    c.request_pose(Pose::Low, SpeedScale::FULL);

    let healthy = c.tick();
    assert!(healthy.velocities[Joint::Elevator] < 0.0);
    assert!(healthy.velocities[Joint::Elbow] < 0.0);

    rig.handle(Joint::Carriage).disconnect(true).unwrap();
    for _ in 0..10 {
        let report = tick_and_step(&mut c, &rig);
        assert!(report.faults[Joint::Carriage].contains(SensorFault::DISCONNECTED));
        assert_eq!(report.statuses[Joint::Carriage], JointStatus::Faulted);
        assert_eq!(report.velocities[Joint::Carriage], 0.0);

        assert_eq!(report.statuses[Joint::Elevator], JointStatus::Blocked);
        assert_eq!(report.velocities[Joint::Elevator], 0.0);

        assert_eq!(report.statuses[Joint::Elbow], JointStatus::Blocked);
        assert_eq!(report.velocities[Joint::Elbow], 0.0);

        assert!(report.faults[Joint::Wrist].is_empty());
        assert!(report.velocities[Joint::Wrist] < 0.0);
    }

    rig.handle(Joint::Carriage).disconnect(false).unwrap();
    let report = c.tick();
    assert!(report.faults[Joint::Carriage].is_empty());
    assert_ne!(report.statuses[Joint::Elevator], JointStatus::Blocked);
}

#[test]
fn non_finite_and_out_of_range_readings_fail_closed() {
    let (mut c, rig) = rig_at([600.0, 2150.0, 250.0, 270.0]);
    c.request_pose(Pose::Mid, SpeedScale::FULL);

    rig.handle(Joint::Elbow).override_reading(Some(f64::NAN)).unwrap();
    let report = c.tick();
    assert!(report.faults[Joint::Elbow].contains(SensorFault::NOT_FINITE));
    assert_eq!(report.velocities[Joint::Elbow], 0.0);
    // Lift and carriage depend on the elbow in Mid.
    assert_eq!(report.velocities[Joint::Elevator], 0.0);
    assert_eq!(report.velocities[Joint::Carriage], 0.0);

    rig.handle(Joint::Elbow).override_reading(Some(-12.0)).unwrap();
    let report = c.tick();
    assert_eq!(report.faults[Joint::Elbow], SensorFault::OUT_OF_RANGE);
    assert_eq!(report.statuses[Joint::Elbow], JointStatus::Faulted);

    rig.handle(Joint::Elbow).override_reading(None).unwrap();
    let report = c.tick();
    assert!(report.faults[Joint::Elbow].is_empty());
    assert!(report.velocities[Joint::Elevator] > 0.0);
}

/// Wrist may always move toward its tucked side, even with the elbow low.
#[test]
fn wrist_tucks_with_elbow_below_clearance() {
    let (mut c, rig) = rig_at([200.0, 1000.0, 150.0, 250.0]);
    c.request_pose(Pose::Start, SpeedScale::FULL);
    let report = tick_and_step(&mut c, &rig);
    assert!(report.velocities[Joint::Wrist] > 0.0);
    // Carriage needs the elbow above 244 in Start.
    assert_eq!(report.statuses[Joint::Carriage], JointStatus::Blocked);
}
