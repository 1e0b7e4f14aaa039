use ion_ecs::{System, World};
use ion_math::{clamp_length, quaternion, Transform, Vec3};
use ion_physics::Physics;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::flight_control::FlightControl;
use crate::thrusters::Thrusters;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    pub arrival_radius: f32,
}

/// Autonomous waypoint-following. Overrides whatever `FlightControlSystem`
/// wrote into a craft's `linear_command`/`angular_command` this tick — a
/// scripted craft has no player or AI-agent input feeding `FlightControl`,
/// so `ScriptedFlightSystem` is the one that actually decides where it goes,
/// reusing the same command fields `ThrusterSystem` already knows how to
/// consume rather than a second, parallel path into physics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedFlight {
    pub waypoints: Vec<Waypoint>,
    pub current_index: usize,
    pub loop_waypoints: bool,
    pub cruise_speed: f32,
    /// Max turn rate, in the same normalized units as `angular_command`.
    pub max_turn_rate: f32,
    /// Acceleration ceiling used to derive both the braking-distance speed
    /// cap and the clamp on the acceleration command itself.
    pub max_acceleration: f32,
}

impl Default for ScriptedFlight {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            current_index: 0,
            loop_waypoints: false,
            cruise_speed: 1.0,
            max_turn_rate: 1.0,
            max_acceleration: 10.0,
        }
    }
}

impl ScriptedFlight {
    /// True once a non-looping route has visited its last waypoint.
    pub fn is_finished(&self) -> bool {
        !self.loop_waypoints && self.current_index >= self.waypoints.len()
    }

    fn advance(&mut self) {
        self.current_index += 1;
        if self.current_index >= self.waypoints.len() && self.loop_waypoints {
            self.current_index = 0;
        }
    }
}

#[derive(Default)]
pub struct ScriptedFlightSystem;

impl ScriptedFlightSystem {
    /// Steps one craft's route: (1) bail if there's no route or it's
    /// finished, (2) resolve the current waypoint, (3) measure distance,
    /// (4) advance past waypoints already reached, (5) re-check for route
    /// completion after advancing, (6) build a facing toward the (possibly
    /// new) target with a stable tie-break when it's near the up axis, and
    /// (7) derive a braking-aware desired velocity, convert the velocity
    /// error into an acceleration command, and express it in the craft's
    /// local frame normalized against its thruster ceiling.
    fn step_one(
        route: &mut ScriptedFlight,
        transform: &Transform,
        physics: &Physics,
        max_linear_force: Vec3,
        dt: f32,
    ) -> Option<(Vec3, Vec3)> {
        if route.waypoints.is_empty() || route.is_finished() {
            return None;
        }
        let mut target = route.waypoints[route.current_index];
        let mut to_target = target.position - transform.position;
        if to_target.length() <= target.arrival_radius {
            route.advance();
            if route.is_finished() {
                return Some((Vec3::ZERO, Vec3::ZERO));
            }
            target = route.waypoints[route.current_index];
            to_target = target.position - transform.position;
        }

        let distance = to_target.length();
        let desired_facing = quaternion::look_rotation(to_target, Vec3::Y);

        let facing_error = desired_facing * transform.rotation.inverse();
        let (axis, angle) = facing_error.to_axis_angle();
        let turn = (axis * angle.min(std::f32::consts::PI)).clamp_length_max(route.max_turn_rate);
        let angular_command = turn;

        // Speed cap so the craft can still stop within the remaining
        // distance at `max_acceleration`: v = sqrt(2 * a * r).
        let stopping_speed = (2.0 * route.max_acceleration * distance).sqrt();
        let desired_speed = route.cruise_speed.min(stopping_speed);
        let desired_velocity = to_target.normalize_or_zero() * desired_speed;

        let dt = dt.max(f32::EPSILON);
        let required_accel = (desired_velocity - physics.linear_velocity) / dt;
        let required_accel = clamp_length(required_accel, route.max_acceleration);

        let local_accel = transform.rotation.inverse() * required_accel;
        let linear_command = Vec3::new(
            local_accel.x / max_linear_force.x.max(f32::EPSILON),
            local_accel.y / max_linear_force.y.max(f32::EPSILON),
            local_accel.z / max_linear_force.z.max(f32::EPSILON),
        )
        .clamp(Vec3::NEG_ONE, Vec3::ONE);

        trace!(distance, desired_speed, dt, linear_velocity = ?physics.linear_velocity, "scripted flight step");
        Some((linear_command, angular_command))
    }
}

impl System for ScriptedFlightSystem {
    fn name(&self) -> &'static str {
        "scripted_flight"
    }

    fn tick(&mut self, world: &mut World, dt: f32) {
        let route_bit = world.component_bit::<ScriptedFlight>().expect("route bit");
        let control_bit = world.component_bit::<FlightControl>().expect("control bit");
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let physics_bit = world.component_bit::<Physics>().expect("physics bit");
        let ids = world.query(route_bit | control_bit | transform_bit | physics_bit);

        for id in ids {
            let (transform, physics) = {
                let transform = *world.get_component::<Transform>(id).expect("queried transform");
                let physics = *world.get_component::<Physics>(id).expect("queried physics");
                (transform, physics)
            };
            let max_linear_force = world
                .get_component::<Thrusters>(id)
                .map(|thrusters| thrusters.max_linear_force)
                .unwrap_or_else(|| Thrusters::default().max_linear_force);
            let command = {
                let route = world.get_component_mut::<ScriptedFlight>(id).expect("queried route");
                Self::step_one(route, &transform, &physics, max_linear_force, dt)
            };
            if let Some((linear_command, angular_command)) = command {
                let control = world.get_component_mut::<FlightControl>(id).expect("queried control");
                control.linear_command = linear_command;
                control.angular_command = angular_command;
            }
        }
    }
}
