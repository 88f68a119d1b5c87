//! System-wide constants for the arm workspace.
//!
//! Single source of truth for counts, timing defaults and the tuned
//! per-joint numbers baked into [`crate::config::ArmConfig::default`].
//! Positions are in raw device units: potentiometer counts for the lift and
//! carriage, degrees for the elbow and wrist.

/// Number of actuated joints.
pub const JOINT_COUNT: usize = 4;

/// Number of named poses.
pub const POSE_COUNT: usize = 5;

/// Default control period in milliseconds (50 Hz).
pub const CYCLE_PERIOD_MS: u64 = 20;

pub const CYCLE_PERIOD_MS_MIN: u64 = 1;
pub const CYCLE_PERIOD_MS_MAX: u64 = 1000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/arm/arm.toml";

// ─── Elevator ───────────────────────────────────────────────────────

pub const ELEVATOR_RANGE: (f64, f64) = (0.0, 2400.0);
/// Reading reported when the string potentiometer is unplugged.
pub const ELEVATOR_DISCONNECT: f64 = 2500.0;
pub const ELEVATOR_KP: f64 = 0.01;
pub const ELEVATOR_MAX_OUTPUT: f64 = 1.0;
/// Slew limits [output units / s].
pub const ELEVATOR_SLEW_RISING: f64 = 2.0;
pub const ELEVATOR_SLEW_FALLING: f64 = 2.0;
pub const ELEVATOR_TOLERANCE: f64 = 20.0;

pub const ELEVATOR_TARGETS: [f64; POSE_COUNT] = [200.0, 150.0, 1200.0, 1400.0, 2100.0];

/// Start/Mid share one set of lift clearances.
pub const ELEVATOR_START_MID_ELBOW_MIN: f64 = 200.0;
pub const ELEVATOR_START_MID_WRIST_MIN: f64 = 220.0;
pub const ELEVATOR_LOW_ELBOW_MIN: f64 = 165.0;
pub const ELEVATOR_LOW_WRIST_MIN: f64 = 235.0;
pub const ELEVATOR_LOW_CARRIAGE_MIN: f64 = 2000.0;
pub const ELEVATOR_HIGH_ELBOW_MIN: f64 = 200.0;
/// Wrist must be tucked *below* this before lifting high.
pub const ELEVATOR_HIGH_WRIST_MAX: f64 = 300.0;

// ─── Carriage ───────────────────────────────────────────────────────

pub const CARRIAGE_RANGE: (f64, f64) = (0.0, 3900.0);
pub const CARRIAGE_DISCONNECT: f64 = 4000.0;
pub const CARRIAGE_KP: f64 = 0.01;
pub const CARRIAGE_MAX_OUTPUT: f64 = 1.0;
pub const CARRIAGE_TOLERANCE: f64 = 20.0;

pub const CARRIAGE_TARGETS: [f64; POSE_COUNT] = [1000.0, 2150.0, 2150.0, 2150.0, 2150.0];
pub const CARRIAGE_ELBOW_MIN: [f64; POSE_COUNT] = [244.0, 155.0, 215.0, 215.0, 215.0];

// ─── Elbow ──────────────────────────────────────────────────────────

pub const ELBOW_RANGE: (f64, f64) = (0.0, 359.0);
/// Absolute encoder with no pulse period reads a full turn.
pub const ELBOW_DISCONNECT: f64 = 360.0;
pub const ELBOW_KP: f64 = 0.03;
pub const ELBOW_MAX_OUTPUT: f64 = 0.75;
pub const ELBOW_TOLERANCE: f64 = 2.0;

pub const ELBOW_TARGETS: [f64; POSE_COUNT] = [320.0, 170.0, 230.0, 250.0, 240.0];
/// Carriage/wrist clearances for the non-high poses (High entry unused).
pub const ELBOW_CARRIAGE_MIN: [f64; POSE_COUNT] = [900.0, 2000.0, 2000.0, 2000.0, 0.0];
pub const ELBOW_WRIST_MIN: [f64; POSE_COUNT] = [200.0, 230.0, 230.0, 230.0, 0.0];
/// Above this lift height the elbow may only keep retracting toward High.
pub const ELBOW_HIGH_ELEVATOR_MAX: f64 = 1500.0;

// ─── Wrist ──────────────────────────────────────────────────────────

pub const WRIST_RANGE: (f64, f64) = (0.0, 359.0);
pub const WRIST_DISCONNECT: f64 = 360.0;
pub const WRIST_KP: f64 = 0.01;
pub const WRIST_MAX_OUTPUT: f64 = 1.0;
pub const WRIST_TOLERANCE: f64 = 2.0;

pub const WRIST_TARGETS: [f64; POSE_COUNT] = [330.0, 240.0, 260.0, 250.0, 280.0];
pub const WRIST_ELBOW_MIN: [f64; POSE_COUNT] = [160.0, 160.0, 200.0, 200.0, 180.0];
