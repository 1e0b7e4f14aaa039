/// Per-tick counters exposed by [`crate::PhysicsSystem`], rolled into the
/// engine-wide stats snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsStats {
    pub bodies_integrated: u64,
    pub linear_clamps: u64,
    pub angular_clamps: u64,
}
