use std::collections::HashMap;

use tracing::{trace, warn};

use crate::world::World;

/// One unit of per-tick behavior. Systems are registered in the order they
/// should run and the scheduler never reorders them — there is no
/// dependency inference, only the frequency gate below.
pub trait System {
    fn name(&self) -> &'static str;

    fn tick(&mut self, world: &mut World, dt: f32);
}

struct Entry {
    system: Box<dyn System>,
    /// How many times per second this system should run; `None` means
    /// every scheduler tick regardless of the driving frame rate.
    frequency_hz: Option<f32>,
    accumulator: f32,
    stats: SystemStats,
}

/// Running per-system statistics, queryable after each `Scheduler::run_tick`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStats {
    pub invocations: u64,
    pub last_dt: f32,
    /// Exponential moving average of wall-clock-equivalent dt handed to the
    /// system, i.e. the accumulated time between invocations. Not a
    /// measurement of real execution time — the engine core has no reason
    /// to instrument wall-clock cost beyond this within the ECS crate.
    pub average_dt: f32,
}

impl SystemStats {
    fn record(&mut self, dt: f32) {
        self.invocations += 1;
        self.last_dt = dt;
        const ALPHA: f32 = 0.1;
        self.average_dt = if self.invocations == 1 {
            dt
        } else {
            self.average_dt * (1.0 - ALPHA) + dt * ALPHA
        };
    }
}

/// Aggregated statistics across every registered system, keyed by system
/// name, plus the count of entities reclaimed this tick.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    pub per_system: HashMap<&'static str, SystemStats>,
}

/// Runs a fixed, explicitly-declared sequence of systems, each gated by its
/// own frequency so cheap high-rate systems (physics, input) and expensive
/// low-rate ones (scene maintenance) can share one scheduler without the
/// slow ones running every tick.
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `system` to run every tick regardless of `dt`.
    pub fn add_system(&mut self, system: impl System + 'static) {
        self.entries.push(Entry {
            system: Box::new(system),
            frequency_hz: None,
            accumulator: 0.0,
            stats: SystemStats::default(),
        });
    }

    /// Registers `system` to run no more often than `frequency_hz` times per
    /// second: ticks accumulate `dt` until a full period has elapsed, then
    /// the system runs once with the accumulated `dt` as its own step size.
    pub fn add_system_at(&mut self, system: impl System + 'static, frequency_hz: f32) {
        self.entries.push(Entry {
            system: Box::new(system),
            frequency_hz: Some(frequency_hz),
            accumulator: 0.0,
            stats: SystemStats::default(),
        });
    }

    /// Advances every registered system by `dt` (in seconds), in declared
    /// order, then reclaims entities destroyed during the tick.
    pub fn run_tick(&mut self, world: &mut World, dt: f32) {
        for entry in &mut self.entries {
            match entry.frequency_hz {
                None => {
                    entry.system.tick(world, dt);
                    entry.stats.record(dt);
                }
                Some(hz) => {
                    entry.accumulator += dt;
                    let period = 1.0 / hz;
                    // A system more than one period behind only runs once
                    // per scheduler tick; it simply keeps its leftover
                    // accumulator so it catches up over subsequent ticks
                    // rather than running in a tight catch-up loop.
                    if entry.accumulator + 1e-6 >= period {
                        let step = entry.accumulator;
                        entry.accumulator = 0.0;
                        entry.system.tick(world, step);
                        entry.stats.record(step);
                    }
                }
            }
        }
        trace!(pending = "cleanup", "scheduler tick complete, reclaiming destroyed entities");
        world.cleanup_destroyed();
    }

    pub fn stats(&self) -> SchedulerStats {
        let mut per_system = HashMap::new();
        for entry in &self.entries {
            per_system.insert(entry.system.name(), entry.stats);
        }
        SchedulerStats { per_system }
    }
}

/// Logged once by a caller that detects a system is falling behind its
/// declared frequency by more than a full period; kept here so the format
/// is consistent wherever it's used.
pub fn warn_frequency_overrun(system_name: &'static str, behind_by_periods: f32) {
    warn!(
        system = system_name,
        behind_by_periods, "system is falling behind its declared frequency"
    );
}
