//! Proportional-derivative controller with an optional first-order filter
//! on the derivative term (Tf).
//!
//! Zero Kd disables the derivative term. There is no integral term.

use arm_common::config::PdGains;

/// Internal state of the PD controller.
///
/// Owned by one joint policy; a pose switch creates a fresh one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdState {
    /// Previous position error (for derivative).
    prev_error: f64,
    /// Filtered derivative term (low-pass via Tf).
    derivative_filtered: f64,
    /// False until the first sample, so the first derivative is zero.
    primed: bool,
}

impl PdState {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Compute one PD cycle.
///
/// # Arguments
/// - `state`: Mutable PD state.
/// - `gains`: Gains for this joint.
/// - `error`: Current position error (target − actual) [device units].
/// - `dt`: Cycle period [s].
///
/// # Returns
/// Unsaturated demand; clamping happens in the policy.
#[inline]
pub fn pd_compute(state: &mut PdState, gains: &PdGains, error: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }

    let p_term = gains.kp * error;

    let d_term = if gains.kd != 0.0 && state.primed {
        let raw_derivative = (error - state.prev_error) / dt;

        if gains.tf > 0.0 {
            // alpha = dt / (tf + dt)
            let alpha = dt / (gains.tf + dt);
            state.derivative_filtered += alpha * (raw_derivative - state.derivative_filtered);
            gains.kd * state.derivative_filtered
        } else {
            gains.kd * raw_derivative
        }
    } else {
        state.derivative_filtered = 0.0;
        0.0
    };

    state.prev_error = error;
    state.primed = true;

    p_term + d_term
}
