//! Integration tests for the Arm Control Unit.
//!
//! These tests exercise multiple modules together: resolved configuration,
//! snapshot validation, guard rules, policies and the coordinator driving
//! simulated joints.

mod integration;
