use ion_ecs::EntityId;
use ion_flight::{Camera, FlightControl, ScriptedFlight, ShipPreset, Thrusters};
use ion_math::Transform;
use ion_physics::{Collider, Physics};
use serde::{Deserialize, Serialize};

use crate::component::{Metadata, Renderable};

/// A typed, stable record an external tool (level editor, save loader,
/// scripted mission spawner) hands across the crate boundary to create an
/// entity. Every field beyond `name` is optional — a descriptor that sets
/// only `name`/`description` produces an entity with just `Metadata`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<EntityId>,

    #[serde(default)]
    pub preset: Option<ShipPreset>,

    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub physics: Option<Physics>,
    #[serde(default)]
    pub collider: Option<Collider>,
    #[serde(default)]
    pub thrusters: Option<Thrusters>,
    #[serde(default)]
    pub flight_control: Option<FlightControl>,
    #[serde(default)]
    pub scripted_flight: Option<ScriptedFlight>,
    #[serde(default)]
    pub camera: Option<Camera>,
    #[serde(default)]
    pub renderable: Option<Renderable>,
}

impl EntityDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_preset(mut self, preset: ShipPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn to_metadata(&self) -> Metadata {
        Metadata {
            name: self.name.clone(),
            description: self.description.clone(),
            parent: self.parent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_descriptor_has_empty_optional_fields() {
        let descriptor = EntityDescriptor::named("probe");
        assert_eq!(descriptor.name, "probe");
        assert!(descriptor.transform.is_none());
        assert!(descriptor.preset.is_none());
    }

    #[test]
    fn builder_methods_set_the_expected_fields() {
        let descriptor = EntityDescriptor::named("racer-1")
            .with_preset(ShipPreset::Racer)
            .with_transform(Transform::from_position(ion_math::Vec3::new(0.0, 0.0, 0.0)));
        assert_eq!(descriptor.preset, Some(ShipPreset::Racer));
        assert!(descriptor.transform.is_some());
    }
}
