use std::cell::RefCell;
use std::rc::Rc;

use ion_ecs::{System, World};
use ion_math::{quaternion, Transform};
use tracing::warn;

use crate::component::Physics;
use crate::stats::PhysicsStats;

/// Velocities above this magnitude are clamped rather than left to grow
/// unbounded, guarding against a runaway force accumulator (e.g. a thruster
/// misconfiguration) producing NaNs or absurd positions. Clamping scales the
/// vector down to this length instead of zeroing it, so direction of travel
/// is preserved.
pub const DEFAULT_MAX_LINEAR_SPEED: f32 = 2_000.0;
pub const DEFAULT_MAX_ANGULAR_SPEED: f32 = 50.0;

/// Integrates every entity with both `Transform` and `Physics` components
/// forward by `dt` using semi-implicit (symplectic) Euler: velocities are
/// updated from accumulated forces/torques first, damped, then used to
/// advance position and orientation.
///
/// Stats live behind an `Rc<RefCell<_>>` rather than a plain field so a
/// caller can hold a handle to them (via [`PhysicsSystem::stats_handle`])
/// even after the system itself has been moved into a `Scheduler`, which
/// only ever hands back `&mut dyn System`.
pub struct PhysicsSystem {
    max_linear_speed: f32,
    max_angular_speed: f32,
    stats: Rc<RefCell<PhysicsStats>>,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINEAR_SPEED, DEFAULT_MAX_ANGULAR_SPEED)
    }
}

impl PhysicsSystem {
    pub fn new(max_linear_speed: f32, max_angular_speed: f32) -> Self {
        Self {
            max_linear_speed,
            max_angular_speed,
            stats: Rc::new(RefCell::new(PhysicsStats::default())),
        }
    }

    pub fn stats(&self) -> PhysicsStats {
        *self.stats.borrow()
    }

    /// A cloneable handle to this system's stats cell, so a caller (e.g.
    /// `ion-core`'s engine) can read current counters without owning the
    /// system itself.
    pub fn stats_handle(&self) -> Rc<RefCell<PhysicsStats>> {
        self.stats.clone()
    }

    fn step_one(&mut self, transform: &mut Transform, body: &mut Physics, dt: f32) {
        if body.is_kinematic || dt <= 0.0 {
            body.clear_accumulators();
            return;
        }

        body.linear_velocity += body.accumulated_force * body.inverse_mass * dt;
        if body.has_6dof {
            let angular_accel = body.inverse_inertia_tensor * body.accumulated_torque;
            body.angular_velocity += angular_accel * dt;
        }
        body.clear_accumulators();

        // Exponential drag: strength is independent of tick rate because
        // drag^dt, not drag * dt, is what's applied.
        body.linear_velocity *= body.linear_drag.powf(dt);
        if body.has_6dof {
            body.angular_velocity *= body.angular_drag.powf(dt);
        }

        {
            let mut stats = self.stats.borrow_mut();
            body.linear_velocity = clamp_and_report(body.linear_velocity, self.max_linear_speed, &mut stats.linear_clamps);
            if body.has_6dof {
                body.angular_velocity =
                    clamp_and_report(body.angular_velocity, self.max_angular_speed, &mut stats.angular_clamps);
            }
        }

        transform.position += body.linear_velocity * dt;
        if body.has_6dof {
            transform.rotation = quaternion::integrate(transform.rotation, body.angular_velocity, dt);
        }

        self.stats.borrow_mut().bodies_integrated += 1;
    }
}

fn clamp_and_report(v: ion_math::Vec3, max_len: f32, counter: &mut u64) -> ion_math::Vec3 {
    let len = v.length();
    if len > max_len {
        warn!(magnitude = len, limit = max_len, "clamping velocity that exceeded sanity limit");
        *counter += 1;
        ion_math::clamp_length(v, max_len)
    } else {
        v
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn tick(&mut self, world: &mut World, dt: f32) {
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let physics_bit = world.component_bit::<Physics>().expect("physics bit");
        let ids = world.query(transform_bit | physics_bit);
        for id in ids {
            // Components are fetched one at a time via raw pointers so we
            // can hold two independent `&mut` borrows into `World`'s
            // type-erased storage without an aliasing violation: the two
            // component stores are backed by different `Vec`s, so this is
            // sound, but the borrow checker can't see that across a type
            // boundary, hence the manual split below.
            let transform_ptr = world.get_component_mut::<Transform>(id).map(|t| t as *mut Transform);
            let physics_ptr = world.get_component_mut::<Physics>(id).map(|p| p as *mut Physics);
            if let (Some(t_ptr), Some(p_ptr)) = (transform_ptr, physics_ptr) {
                // SAFETY: `t_ptr` and `p_ptr` point into disjoint `Vec`
                // allocations (one per component type) and neither pointer
                // is held past this block, so the two `&mut` references
                // below never alias.
                unsafe {
                    let transform = &mut *t_ptr;
                    let physics = &mut *p_ptr;
                    self.step_one(transform, physics, dt);
                }
            }
        }
    }
}
