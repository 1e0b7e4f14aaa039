use ion_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// PD flight-assist constants: when a hold target is set and within
/// `PD_SPHERE_RADIUS` of the craft, the linear command is replaced by a
/// PD controller pulling the craft toward that point. Angular command and
/// banking are left on the Assisted-mode path regardless of mode — flight
/// assist only ever overrides translation, never orientation.
pub const PD_KP: f32 = 2.0;
pub const PD_KD: f32 = 0.5;
pub const PD_SPHERE_RADIUS: f32 = 50.0;
pub const PD_MAX_ACCEL: f32 = 30.0;

/// Yaw input below this magnitude does not trigger banking, so small
/// corrective yaw doesn't visibly roll the craft.
pub const BANKING_YAW_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightMode {
    Manual,
    Assisted,
    Autonomous,
}

impl Default for FlightMode {
    fn default() -> Self {
        FlightMode::Manual
    }
}

/// Per-mode gains: `(stability_assist, inertia_dampening, banking_enabled, banking_ratio)`.
impl FlightMode {
    pub fn gains(&self) -> ModeGains {
        match self {
            FlightMode::Manual => ModeGains {
                stability_assist: 0.02,
                inertia_dampening: 0.0,
                banking_enabled: false,
                banking_ratio: 0.0,
            },
            FlightMode::Assisted => ModeGains {
                stability_assist: 0.15,
                inertia_dampening: 0.10,
                banking_enabled: true,
                banking_ratio: 1.8,
            },
            FlightMode::Autonomous => ModeGains {
                stability_assist: 1.0,
                inertia_dampening: 0.8,
                banking_enabled: true,
                banking_ratio: 1.2,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModeGains {
    pub stability_assist: f32,
    pub inertia_dampening: f32,
    pub banking_enabled: bool,
    pub banking_ratio: f32,
}

/// Flight control state for a pilotable craft. [`Self::linear_input`] and
/// [`Self::angular_input`] are written by whatever upstream system resolves
/// player or AI intent (action values, scripted-flight commands); the
/// `FlightControlSystem` consumes those each tick and produces
/// [`Self::linear_command`]/[`Self::angular_command`] for the thrusters
/// system to turn into forces and torques.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FlightControl {
    pub mode: FlightMode,
    pub linear_input: Vec3,
    pub angular_input: Vec3,
    /// World-space point to hold station near; consumed only by the PD
    /// flight-assist path, and only within `PD_SPHERE_RADIUS` of it.
    pub flight_assist_target: Option<Vec3>,

    pub linear_command: Vec3,
    pub angular_command: Vec3,
}

impl FlightControl {
    pub fn new(mode: FlightMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FlightMode) {
        self.mode = mode;
    }
}

fn clamp_axes(v: Vec3) -> Vec3 {
    Vec3::new(v.x.clamp(-1.0, 1.0), v.y.clamp(-1.0, 1.0), v.z.clamp(-1.0, 1.0))
}

/// Resolves one tick of flight control: stability assist, inertia
/// dampening, banking, and PD flight-assist, given the craft's current
/// physics velocities, world position, orientation, and per-axis thrust
/// ceiling. `rotation` and `max_linear_force` are only consulted by the PD
/// flight-assist path, to turn its world-frame acceleration into the same
/// body-frame, thrust-normalized command every other path here produces —
/// `ThrusterSystem` rotates `linear_command` body-to-world itself, so a
/// command left in world frame here would get rotated a second time.
pub fn resolve_commands(
    control: &FlightControl,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    world_position: Vec3,
    rotation: Quat,
    max_linear_force: Vec3,
) -> (Vec3, Vec3) {
    let gains = control.mode().gains();

    let mut angular_command = control.angular_input - angular_velocity * gains.stability_assist;
    let mut linear_command = control.linear_input - linear_velocity * gains.inertia_dampening;

    if gains.banking_enabled && angular_command.y.abs() > BANKING_YAW_THRESHOLD {
        angular_command.z -= angular_command.y * gains.banking_ratio;
    }

    if let Some(target) = control.flight_assist_target {
        let to_target = target - world_position;
        if to_target.length() <= PD_SPHERE_RADIUS {
            let accel = to_target * PD_KP - linear_velocity * PD_KD;
            let accel = ion_math::clamp_length(accel, PD_MAX_ACCEL);
            let local_accel = rotation.inverse() * accel;
            linear_command = Vec3::new(
                local_accel.x / max_linear_force.x.max(f32::EPSILON),
                local_accel.y / max_linear_force.y.max(f32::EPSILON),
                local_accel.z / max_linear_force.z.max(f32::EPSILON),
            );
        }
    }

    (clamp_axes(linear_command), clamp_axes(angular_command))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: Quat = Quat::IDENTITY;
    const DEFAULT_THRUST: Vec3 = Vec3::new(10_000.0, 10_000.0, 10_000.0);

    #[test]
    fn manual_mode_barely_dampens_drift() {
        let mut control = FlightControl::new(FlightMode::Manual);
        control.angular_input = Vec3::ZERO;
        let (_, angular) = resolve_commands(
            &control,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            IDENTITY,
            DEFAULT_THRUST,
        );
        // stability_assist = 0.02, so most of the spin survives into the
        // counter-command (it opposes, not erases, residual spin).
        assert!(angular.z.abs() > 0.0);
    }

    #[test]
    fn banking_couples_yaw_into_roll_in_assisted_mode() {
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.angular_input = Vec3::new(0.0, 1.0, 0.0);
        let (_, angular) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert!(angular.z < 0.0, "expected banking to roll opposite yaw, got {angular:?}");
    }

    #[test]
    fn small_yaw_does_not_trigger_banking() {
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.angular_input = Vec3::new(0.0, 0.005, 0.0);
        let (_, angular) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert_eq!(angular.z, 0.0);
    }

    #[test]
    fn manual_mode_never_banks() {
        let mut control = FlightControl::new(FlightMode::Manual);
        control.angular_input = Vec3::new(0.0, 1.0, 0.0);
        let (_, angular) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert_eq!(angular.z, 0.0);
    }

    #[test]
    fn flight_assist_overrides_linear_command_within_sphere() {
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.flight_assist_target = Some(Vec3::new(10.0, 0.0, 0.0));
        let (linear, _) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert!(linear.x > 0.0, "expected pull toward target, got {linear:?}");
    }

    #[test]
    fn flight_assist_ignored_outside_sphere() {
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.linear_input = Vec3::new(0.3, 0.0, 0.0);
        control.flight_assist_target = Some(Vec3::new(1_000.0, 0.0, 0.0));
        let (linear, _) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert!((linear.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn commands_are_clamped_to_unit_range() {
        let mut control = FlightControl::new(FlightMode::Autonomous);
        control.linear_input = Vec3::new(5.0, 0.0, 0.0);
        let (linear, _) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert!(linear.x <= 1.0);
    }

    #[test]
    fn flight_assist_accel_is_expressed_in_local_frame() {
        // A 90-degree yaw means a world-frame pull along +X should resolve
        // to a local-frame command along +Z (or -Z), not +X.
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.flight_assist_target = Some(Vec3::new(10.0, 0.0, 0.0));
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let (linear, _) = resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, rotation, DEFAULT_THRUST);
        assert!(linear.x.abs() < 1e-3, "expected no local +X component, got {linear:?}");
        assert!(linear.z.abs() > 1e-6, "expected the pull rotated into local Z, got {linear:?}");
    }

    #[test]
    fn flight_assist_command_scales_with_per_axis_thrust_ceiling() {
        let mut control = FlightControl::new(FlightMode::Assisted);
        control.flight_assist_target = Some(Vec3::new(10.0, 0.0, 0.0));
        let (weak_thrust, _) = resolve_commands(
            &control,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            IDENTITY,
            Vec3::new(1.0, 10_000.0, 10_000.0),
        );
        let (strong_thrust, _) =
            resolve_commands(&control, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, IDENTITY, DEFAULT_THRUST);
        assert!(weak_thrust.x > strong_thrust.x, "a weaker x-axis ceiling should saturate sooner");
    }
}
