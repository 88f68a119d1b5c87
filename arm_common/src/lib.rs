//! Arm Common Library
//!
//! Shared vocabulary for the arm pose coordinator: joint and pose
//! identities, ranges and calibration remapping, error types, and the TOML
//! configuration schema with the robot's compiled-in table.
//!
//! # Module Structure
//!
//! - [`joint`] - Joint identities and the fixed per-joint map
//! - [`pose`] - The five named poses
//! - [`range`] - Ranges and affine remapping
//! - [`config`] - Configuration schema and loading
//! - [`error`] - Range, sensor and command errors
//! - [`consts`] - Counts, timing defaults and tuned numbers
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod error;
pub mod joint;
pub mod pose;
pub mod prelude;
pub mod range;
