use ion_ecs::{System, World};
use ion_math::Transform;
use ion_physics::Physics;

use crate::flight_control::{resolve_commands, FlightControl};
use crate::thrusters::Thrusters;

/// The "Control" stage of the pipeline: turns each craft's raw
/// `linear_input`/`angular_input` (populated by whatever wrote to
/// `FlightControl` this tick — the player's action values, or
/// `ScriptedFlightSystem` for AI-piloted craft) into the
/// `linear_command`/`angular_command` the thrusters system consumes,
/// applying stability assist, inertia dampening, banking, and PD
/// flight-assist along the way.
#[derive(Default)]
pub struct FlightControlSystem;

impl System for FlightControlSystem {
    fn name(&self) -> &'static str {
        "flight_control"
    }

    fn tick(&mut self, world: &mut World, _dt: f32) {
        let control_bit = world.component_bit::<FlightControl>().expect("flight control bit");
        let physics_bit = world.component_bit::<Physics>().expect("physics bit");
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let ids = world.query(control_bit | physics_bit | transform_bit);
        for id in ids {
            let (linear_velocity, angular_velocity) = {
                let physics = world.get_component::<Physics>(id).expect("queried physics");
                (physics.linear_velocity, physics.angular_velocity)
            };
            let (position, rotation) = {
                let transform = world.get_component::<Transform>(id).expect("queried transform");
                (transform.position, transform.rotation)
            };
            let max_linear_force = world
                .get_component::<Thrusters>(id)
                .map(|thrusters| thrusters.max_linear_force)
                .unwrap_or_else(|| Thrusters::default().max_linear_force);
            let control = world.get_component_mut::<FlightControl>(id).expect("queried control");
            let (linear_command, angular_command) =
                resolve_commands(control, linear_velocity, angular_velocity, position, rotation, max_linear_force);
            control.linear_command = linear_command;
            control.angular_command = angular_command;
        }
    }
}
