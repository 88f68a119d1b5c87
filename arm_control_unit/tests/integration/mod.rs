//! Shared fixtures for the integration suites.

mod config_file;
mod guard_table;
mod pose_sequence;
mod pose_switch;
mod scenarios;

use arm_common::joint::{Joint, JointMap};
use arm_control_unit::config::ResolvedConfig;
use arm_control_unit::coordinator::{Coordinator, TickReport};
use arm_control_unit::sim::SimRig;

/// Coordinator wired to a simulated rig at `positions`.
pub fn rig_at(positions: [f64; 4]) -> (Coordinator, SimRig) {
    let config = ResolvedConfig::default();
    let rig = SimRig::from_config(&config, JointMap::new(positions));
    (Coordinator::new(rig.bank(), config), rig)
}

/// One tick followed by one plant step.
pub fn tick_and_step(c: &mut Coordinator, rig: &SimRig) -> TickReport {
    let report = c.tick();
    rig.step(c.config().dt()).unwrap();
    report
}

/// Tick until every joint reports `AtTarget`. Returns the tick count.
pub fn run_until_reached(c: &mut Coordinator, rig: &SimRig, max_ticks: u64) -> Option<u64> {
    (1..=max_ticks).find(|_| tick_and_step(c, rig).all_at_target())
}

/// Deterministic pseudo-random positions inside each joint's range.
pub struct PositionGen {
    state: u64,
}

impl PositionGen {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_unit(&mut self) -> f64 {
        // MMIX LCG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn positions(&mut self, config: &ResolvedConfig) -> JointMap<f64> {
        JointMap::from_fn(|joint: Joint| {
            let r = config.joint(joint).range;
            r.min() + self.next_unit() * (r.max() - r.min())
        })
    }
}
