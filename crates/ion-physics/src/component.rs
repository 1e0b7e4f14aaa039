use ion_math::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// 6DOF rigid body state. Entities without this component are not moved by
/// the physics system regardless of whether they have a `Transform`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Physics {
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,

    pub mass: f32,
    pub inverse_mass: f32,

    /// Offset of the center of mass from the transform's origin, in body
    /// space. Torque from off-center forces is the caller's responsibility
    /// (thrusters compute it); the integrator only consumes the final
    /// accumulated torque.
    pub center_of_mass: Vec3,

    pub inertia_tensor: Mat3,
    pub inverse_inertia_tensor: Mat3,

    pub accumulated_force: Vec3,
    pub accumulated_torque: Vec3,

    /// Per-second exponential decay factor in `(0.0, 1.0]`; `1.0` means no
    /// drag. Applied as `drag.powf(dt)`, never a flat per-tick multiply, so
    /// damping strength is independent of tick rate.
    pub linear_drag: f32,
    pub angular_drag: f32,

    /// Kinematic bodies accumulate no forces and are not integrated; they
    /// are moved only by whatever external system drives their transform.
    pub is_kinematic: bool,

    /// Entities with `has_6dof = false` integrate linear motion only; their
    /// angular velocity is ignored and their rotation is left untouched.
    /// This backs non-ship props that need linear drift but no tumbling.
    pub has_6dof: bool,
}

impl Physics {
    /// Builds a dynamic body of the given mass with an isotropic inertia
    /// tensor derived from `radius` as if the body were a solid sphere —
    /// a reasonable default for craft without a bespoke inertia tensor.
    pub fn dynamic_sphere(mass: f32, radius: f32) -> Self {
        let inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        let i = 0.4 * mass * radius * radius;
        let inertia_tensor = Mat3::from_diagonal(Vec3::splat(i.max(f32::EPSILON)));
        let inverse_inertia_tensor = Mat3::from_diagonal(Vec3::splat(1.0 / i.max(f32::EPSILON)));
        Self {
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            inverse_mass,
            center_of_mass: Vec3::ZERO,
            inertia_tensor,
            inverse_inertia_tensor,
            accumulated_force: Vec3::ZERO,
            accumulated_torque: Vec3::ZERO,
            linear_drag: 1.0,
            angular_drag: 1.0,
            is_kinematic: false,
            has_6dof: true,
        }
    }

    pub fn kinematic() -> Self {
        Self {
            is_kinematic: true,
            ..Self::dynamic_sphere(0.0, 1.0)
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if !self.is_kinematic {
            self.accumulated_force += force;
        }
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        if !self.is_kinematic {
            self.accumulated_torque += torque;
        }
    }

    pub fn clear_accumulators(&mut self) {
        self.accumulated_force = Vec3::ZERO;
        self.accumulated_torque = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinematic_ignores_forces() {
        let mut body = Physics::kinematic();
        body.apply_force(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(body.accumulated_force, Vec3::ZERO);
    }

    #[test]
    fn dynamic_sphere_has_positive_inverse_mass() {
        let body = Physics::dynamic_sphere(10.0, 2.0);
        assert!(body.inverse_mass > 0.0);
        assert!((body.inverse_mass - 0.1).abs() < 1e-6);
    }
}
