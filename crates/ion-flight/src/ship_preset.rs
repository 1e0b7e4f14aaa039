use ion_math::Vec3;
use ion_physics::Physics;
use serde::{Deserialize, Serialize};

use crate::flight_control::{FlightControl, FlightMode};
use crate::thrusters::Thrusters;

/// A named bundle of initial component values for a craft archetype.
/// Presets are applied once at entity construction — they are data, not a
/// runtime mode switch a system checks every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipPreset {
    Racer,
    Cruiser,
    Fighter,
}

/// The component values a preset expands to.
pub struct ShipLoadout {
    pub physics: Physics,
    pub thrusters: Thrusters,
    pub flight_control: FlightControl,
    pub collider_radius: f32,
}

impl ShipPreset {
    pub fn loadout(self) -> ShipLoadout {
        match self {
            ShipPreset::Racer => ShipLoadout {
                physics: {
                    let mut p = Physics::dynamic_sphere(800.0, 4.0);
                    p.linear_drag = 0.85;
                    p.angular_drag = 0.70;
                    p
                },
                thrusters: Thrusters {
                    max_linear_force: Vec3::splat(40_000.0),
                    max_angular_torque: Vec3::splat(12_000.0),
                    environmental_efficiency: 1.0,
                },
                flight_control: FlightControl::new(FlightMode::Manual),
                collider_radius: 4.0,
            },
            ShipPreset::Cruiser => ShipLoadout {
                physics: {
                    let mut p = Physics::dynamic_sphere(12_000.0, 20.0);
                    p.linear_drag = 0.97;
                    p.angular_drag = 0.90;
                    p
                },
                thrusters: Thrusters {
                    max_linear_force: Vec3::splat(60_000.0),
                    max_angular_torque: Vec3::splat(20_000.0),
                    environmental_efficiency: 1.0,
                },
                flight_control: FlightControl::new(FlightMode::Assisted),
                collider_radius: 20.0,
            },
            ShipPreset::Fighter => ShipLoadout {
                physics: {
                    let mut p = Physics::dynamic_sphere(2_000.0, 6.0);
                    p.linear_drag = 0.90;
                    p.angular_drag = 0.80;
                    p
                },
                thrusters: Thrusters {
                    max_linear_force: Vec3::splat(55_000.0),
                    max_angular_torque: Vec3::splat(18_000.0),
                    environmental_efficiency: 1.0,
                },
                flight_control: FlightControl::new(FlightMode::Assisted),
                collider_radius: 6.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn racer_is_lighter_than_cruiser() {
        let racer = ShipPreset::Racer.loadout();
        let cruiser = ShipPreset::Cruiser.loadout();
        assert!(racer.physics.mass < cruiser.physics.mass);
    }

    #[test]
    fn each_preset_defaults_to_a_sensible_flight_mode() {
        assert_eq!(ShipPreset::Racer.loadout().flight_control.mode(), FlightMode::Manual);
        assert_eq!(ShipPreset::Cruiser.loadout().flight_control.mode(), FlightMode::Assisted);
    }
}
