//! Fixed-period tick loop around the [`Coordinator`].
//!
//! Paces ticks with `std::thread::sleep`, records per-tick timing, logs
//! overruns and emits a periodic status line. The loop ends when the shared
//! `running` flag is cleared or the tick limit is reached; every joint is
//! commanded to zero on the way out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use static_assertions::const_assert;
use tracing::{debug, info, warn};

use crate::coordinator::{Coordinator, TickReport};
use crate::sim::SimRig;

/// Ticks between status lines (5 s at 50 Hz).
pub const STATUS_INTERVAL_TICKS: u64 = 250;

const_assert!(STATUS_INTERVAL_TICKS > 0);

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleStats {
    /// Total ticks executed.
    pub cycle_count: u64,
    /// Last tick duration [ns].
    pub last_cycle_ns: u64,
    pub min_cycle_ns: u64,
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Ticks that took longer than the period.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
    }

    /// Average tick time [ns] (0 if no ticks).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

pub struct CycleRunner {
    coordinator: Coordinator,
    /// Simulated plant advanced after every tick, if any.
    plant: Option<SimRig>,
    period: Duration,
    running: Arc<AtomicBool>,
    stats: CycleStats,
}

impl CycleRunner {
    pub fn new(coordinator: Coordinator) -> Self {
        let period = coordinator.config().period();
        Self {
            coordinator,
            plant: None,
            period,
            running: Arc::new(AtomicBool::new(true)),
            stats: CycleStats::new(),
        }
    }

    pub fn with_plant(mut self, rig: SimRig) -> Self {
        self.plant = Some(rig);
        self
    }

    /// Flag that keeps the loop alive; clear it to stop.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator {
        &mut self.coordinator
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run one tick and advance the plant.
    pub fn step(&mut self) -> TickReport {
        let report = self.coordinator.tick();
        if let Some(rig) = &self.plant {
            if let Err(e) = rig.step(self.period.as_secs_f64()) {
                warn!(error = %e, "Simulated plant step failed");
            }
        }
        report
    }

    /// Tick at the configured period until stopped or `max_ticks` ticks
    /// have run (`None` = no limit).
    pub fn run(&mut self, max_ticks: Option<u64>) -> TickReport {
        info!(
            period_ms = self.period.as_millis() as u64,
            max_ticks = ?max_ticks,
            "Tick loop started"
        );

        let mut report = *self.coordinator.last_report();
        while self.running.load(Ordering::Relaxed) {
            if max_ticks.is_some_and(|n| self.stats.cycle_count >= n) {
                break;
            }

            let cycle_start = Instant::now();
            report = self.step();
            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed.as_nanos() as u64);

            if elapsed > self.period {
                self.stats.overruns += 1;
                warn!(
                    tick = report.tick,
                    elapsed_us = elapsed.as_micros() as u64,
                    period_us = self.period.as_micros() as u64,
                    "Tick overrun"
                );
            }

            if report.tick % STATUS_INTERVAL_TICKS == 0 {
                info!(
                    tick = report.tick,
                    pose = ?report.pose,
                    statuses = ?report.statuses.values(),
                    velocities = ?report.velocities.values(),
                    avg_us = self.stats.avg_cycle_ns() / 1000,
                    overruns = self.stats.overruns,
                    "Status"
                );
            } else {
                debug!(tick = report.tick, statuses = ?report.statuses.values(), "tick");
            }

            if let Some(remaining) = self.period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        self.coordinator.stop_all();
        info!(
            ticks = self.stats.cycle_count,
            overruns = self.stats.overruns,
            max_us = self.stats.max_cycle_ns / 1000,
            "Tick loop stopped"
        );
        report
    }
}
