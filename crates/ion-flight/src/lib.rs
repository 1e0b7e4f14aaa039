//! Flight control, thrusters, scripted flight and camera systems: the
//! pipeline stages between resolved input and the physics integrator.

pub mod camera;
pub mod error;
pub mod flight_control;
pub mod flight_control_system;
pub mod scripted_flight;
pub mod ship_preset;
pub mod thrusters;

pub use camera::{Camera, CameraBehavior, CameraSystem};
pub use error::{FlightError, FlightResult};
pub use flight_control::{FlightControl, FlightMode, ModeGains};
pub use flight_control_system::FlightControlSystem;
pub use scripted_flight::{ScriptedFlight, ScriptedFlightSystem, Waypoint};
pub use ship_preset::{ShipLoadout, ShipPreset};
pub use thrusters::{ThrusterSystem, Thrusters};
