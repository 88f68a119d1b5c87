//! # Arm Control Unit Library
//!
//! Safety-interlocked pose coordinator for a four-joint lift and arm
//! (elevator, carriage, elbow, wrist). Once per tick the coordinator takes
//! one validated snapshot of all joint positions, runs each joint's PD
//! controller toward the active pose's target, and lets a joint move only
//! while its guard on the other joints' positions is satisfied.
//!
//! ## Layers
//!
//! 1. **config**: TOML table resolved into typed guard rules and targets
//! 2. **snapshot**: fail-closed sensor validation
//! 3. **guard** / **policy**: per-(Joint, Pose) interlock and control law
//! 4. **coordinator**: pose activation and the per-tick entry point
//! 5. **cycle** / **sim**: fixed-period loop and simulated joints

pub mod config;
pub mod control;
pub mod coordinator;
pub mod cycle;
pub mod driver;
pub mod guard;
pub mod policy;
pub mod sim;
pub mod snapshot;
pub mod speed;
