use ion_ecs::SchedulerStats;
use ion_input::HalStats;
use ion_physics::PhysicsStats;

/// Snapshot of every subsystem's counters, queryable by the host
/// application after each `Engine::tick`. There is no global metrics
/// registry — every counter is owned by the subsystem that produces it and
/// copied into this struct once per tick.
#[derive(Debug, Default)]
pub struct EngineStats {
    pub scheduler: SchedulerStats,
    pub physics: PhysicsStats,
    pub hal: HalStats,
    pub entity_count: usize,
}
