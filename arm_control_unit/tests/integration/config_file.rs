//! Loading arm tables from TOML files.

use std::io::Write;
use std::path::Path;

use arm_common::config::{ArmConfig, Calibration, ConfigError};
use arm_common::joint::{Joint, JointMap};
use arm_common::pose::Pose;
use arm_common::range::Range;
use arm_control_unit::config::load_config;
use arm_control_unit::guard::GuardRule;
use arm_control_unit::policy::{JointPolicy, JointStatus};
use arm_control_unit::snapshot::PositionSnapshot;
use arm_control_unit::speed::SpeedScale;
use tempfile::NamedTempFile;

fn write_config(config: &ArmConfig) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn compiled_table_round_trips_through_file() {
    let file = write_config(&ArmConfig::default());
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.entry(Joint::Wrist, Pose::High).target, 280.0);
    assert_eq!(
        config.entry(Joint::Elevator, Pose::High).guard,
        GuardRule::LiftHigh {
            elbow_min: 200.0,
            wrist_max: 300.0
        }
    );
}

#[test]
fn calibrated_wrist_shifts_wrist_thresholds_everywhere() {
    let mut raw = ArmConfig::default();
    raw.joints.wrist.calibration = Some(Calibration {
        measured: Range::new(0.0, 359.0),
        installed: Range::new(20.0, 379.0),
    });
    let file = write_config(&raw);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.joint(Joint::Wrist).range, Range::new(20.0, 379.0));
    assert_eq!(config.entry(Joint::Wrist, Pose::Mid).target, 280.0);
    match config.entry(Joint::Elevator, Pose::High).guard {
        GuardRule::LiftHigh { elbow_min, wrist_max } => {
            assert_eq!(elbow_min, 200.0);
            assert!((wrist_max - 320.0).abs() < 1e-9);
        }
        other => panic!("unexpected rule {other:?}"),
    }
    match config.entry(Joint::Elbow, Pose::Low).guard {
        GuardRule::ElbowClearance { carriage_min, wrist_min } => {
            assert_eq!(carriage_min, 2000.0);
            assert!((wrist_min - 250.0).abs() < 1e-9);
        }
        other => panic!("unexpected rule {other:?}"),
    }
}

#[test]
fn missing_file_and_incomplete_table() {
    assert!(matches!(
        load_config(Path::new("/nonexistent/arm.toml")),
        Err(ConfigError::FileNotFound)
    ));

    let mut raw = ArmConfig::default();
    raw.poses.remove(Joint::Carriage, Pose::High);
    let file = write_config(&raw);
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::MissingEntry {
            joint: Joint::Carriage,
            pose: Pose::High
        })
    ));
}

#[test]
fn guard_without_its_threshold_is_rejected() {
    let mut raw = ArmConfig::default();
    raw.poses
        .entry_mut(Joint::Elbow, Pose::Mid)
        .unwrap()
        .guard
        .carriage_min = None;
    let file = write_config(&raw);
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingThreshold {
            joint: Joint::Elbow,
            pose: Pose::Mid,
            threshold: "carriage_min"
        }
    ));
    assert!(err.to_string().contains("carriage_min"));
}

#[test]
fn reversed_carriage_calibration_is_rejected() {
    let mut raw = ArmConfig::default();
    raw.joints.carriage.calibration = Some(Calibration {
        measured: Range::new(0.0, 3900.0),
        installed: Range::new(3900.0, 0.0),
    });
    let file = write_config(&raw);
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::ReversedCalibration {
            joint: Joint::Carriage
        })
    ));
}

/// Carriage sensor re-zeroed by +100. The elbow's Low guard must still hold
/// the elbow while the carriage is physically retracted and release it once
/// the carriage has physically cleared.
#[test]
fn shifted_carriage_keeps_elbow_clearance_on_the_physical_side() {
    let mut raw = ArmConfig::default();
    raw.joints.carriage.calibration = Some(Calibration {
        measured: Range::new(0.0, 3900.0),
        installed: Range::new(100.0, 4000.0),
    });
    raw.joints.carriage.disconnect_sentinel = Some(4100.0);
    let file = write_config(&raw);
    let config = load_config(file.path()).unwrap();
    let mut elbow = JointPolicy::new(Joint::Elbow, Pose::Low, &config);

    // Physically 100 and 2100, read in installed units.
    let retracted = JointMap::new([600.0, 200.0, 250.0, 300.0]);
    let out = elbow.evaluate(SpeedScale::FULL, &PositionSnapshot::from_raw(&retracted, &config));
    assert_eq!(out.status, JointStatus::Blocked);
    assert_eq!(out.velocity, 0.0);

    let cleared = JointMap::new([600.0, 2200.0, 250.0, 300.0]);
    let out = elbow.evaluate(SpeedScale::FULL, &PositionSnapshot::from_raw(&cleared, &config));
    assert_eq!(out.status, JointStatus::Moving);
    assert!(out.velocity < 0.0);
}
