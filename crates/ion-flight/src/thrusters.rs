use ion_ecs::{System, World};
use ion_math::{is_finite, Transform, Vec3};
use ion_physics::Physics;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::flight_control::FlightControl;

/// Per-axis force/torque ceilings and an environmental efficiency scalar
/// (e.g. reduced from damage or atmosphere) that together turn a
/// `FlightControl` command into the force and torque handed to physics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thrusters {
    pub max_linear_force: Vec3,
    pub max_angular_torque: Vec3,
    pub environmental_efficiency: f32,
}

impl Default for Thrusters {
    fn default() -> Self {
        Self {
            max_linear_force: Vec3::splat(10_000.0),
            max_angular_torque: Vec3::splat(5_000.0),
            environmental_efficiency: 1.0,
        }
    }
}

/// The "Thrusters" stage: converts each craft's resolved `FlightControl`
/// command into body-frame force/torque, scales by the craft's thruster
/// ceilings and environmental efficiency, rotates into world space, and
/// accumulates onto `Physics` for the integrator to consume next.
#[derive(Default)]
pub struct ThrusterSystem;

impl System for ThrusterSystem {
    fn name(&self) -> &'static str {
        "thrusters"
    }

    fn tick(&mut self, world: &mut World, _dt: f32) {
        let control_bit = world.component_bit::<FlightControl>().expect("control bit");
        let thruster_bit = world.component_bit::<Thrusters>().expect("thruster bit");
        let physics_bit = world.component_bit::<Physics>().expect("physics bit");
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let ids = world.query(control_bit | thruster_bit | physics_bit | transform_bit);

        for id in ids {
            let (linear_command, angular_command) = {
                let control = world.get_component::<FlightControl>(id).expect("queried control");
                (control.linear_command, control.angular_command)
            };
            let (max_force, max_torque, efficiency) = {
                let thrusters = world.get_component::<Thrusters>(id).expect("queried thrusters");
                (
                    thrusters.max_linear_force,
                    thrusters.max_angular_torque,
                    thrusters.environmental_efficiency,
                )
            };
            let rotation = world.get_component::<Transform>(id).expect("queried transform").rotation;

            let body_force = linear_command * max_force * efficiency;
            let body_torque = angular_command * max_torque * efficiency;
            let world_force = rotation * body_force;
            let world_torque = rotation * body_torque;

            if !is_finite(world_force) || !is_finite(world_torque) {
                warn!(entity = %id, "thruster output was non-finite, skipping this tick");
                continue;
            }

            let physics = world.get_component_mut::<Physics>(id).expect("queried physics");
            physics.apply_force(world_force);
            physics.apply_torque(world_torque);
        }
    }
}
