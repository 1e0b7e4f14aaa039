use ion_ecs::EntityId;
use serde::{Deserialize, Serialize};

/// Descriptive data carried by every named entity. No system in the core
/// acts on `parent` beyond storing it — hierarchy resolution (scene graphs,
/// transform inheritance) belongs to the rendering/scene layer that
/// consumes this core's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub parent: Option<EntityId>,
}

/// Marks an entity as something the renderer should be told about, and
/// carries the handful of fields a render snapshot needs beyond `Transform`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Renderable {
    pub mesh_id: String,
    pub material_id: String,
    pub visible: bool,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            mesh_id: String::new(),
            material_id: String::new(),
            visible: true,
        }
    }
}
