use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Engine-wide tunables collected into one serializable record, the way a
/// real process boundary wants a single config object rather than a dozen
/// constructor arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_entities: usize,
    pub hal_capacity: usize,

    pub max_linear_speed: f32,
    pub max_angular_speed: f32,

    pub physics_frequency_hz: f32,
    pub control_frequency_hz: f32,
    pub input_frequency_hz: f32,
    pub thrusters_frequency_hz: f32,
    pub camera_frequency_hz: f32,
    pub scripted_flight_frequency_hz: f32,
    pub lod_frequency_hz: f32,
    pub scene_maintenance_frequency_hz: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: 4096,
            hal_capacity: ion_input::DEFAULT_HAL_CAPACITY,
            max_linear_speed: ion_physics::DEFAULT_MAX_LINEAR_SPEED,
            max_angular_speed: ion_physics::DEFAULT_MAX_ANGULAR_SPEED,
            physics_frequency_hz: 60.0,
            control_frequency_hz: 60.0,
            input_frequency_hz: 60.0,
            thrusters_frequency_hz: 60.0,
            camera_frequency_hz: 60.0,
            scripted_flight_frequency_hz: 30.0,
            lod_frequency_hz: 10.0,
            scene_maintenance_frequency_hz: 2.0,
        }
    }
}

impl EngineConfig {
    /// Loads a config from JSON, matching `ion-input`'s `BindingConfig`
    /// loader so the two process-boundary config surfaces behave the same
    /// way. Fields absent from the file fall back to `Default::default`
    /// only if the caller starts from a `Default` value and overlays it —
    /// this parses a complete record, it does not merge with defaults.
    pub fn from_json(text: &str) -> EngineResult<Self> {
        serde_json::from_str(text).map_err(|e| EngineError::Other(e.into()))
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Other(e.into()))
    }
}
