//! Controller building blocks owned by each joint policy.
//!
//! A PD term toward the target and an optional slew limiter on the
//! resulting command. Both are created fresh per pose activation.

pub mod pd;
pub mod slew;
