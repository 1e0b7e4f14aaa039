use ion_ecs::{EntityId, System, World};
use ion_math::Transform;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::Renderable;

/// One entity's worth of data the (out-of-scope) renderer needs: where it
/// is and what to draw there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRecord {
    pub entity: EntityId,
    pub transform: Transform,
    pub mesh_id: String,
    pub material_id: String,
}

/// A full frame's worth of visible entities, handed across the rendering
/// boundary. Entities with `Renderable::visible == false` are omitted
/// entirely rather than included with a hidden flag, so the renderer never
/// has to branch on visibility itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub records: Vec<RenderRecord>,
}

/// Takes `&mut World` rather than `&World` only because registering a
/// component type's presence-mask bit on first use is itself a (small,
/// data-only) mutation of the world's type registry; no component data is
/// touched.
pub fn build_render_snapshot(world: &mut World) -> RenderSnapshot {
    let renderable_bit = world.component_bit::<Renderable>().expect("renderable bit");
    let transform_bit = world.component_bit::<Transform>().expect("transform bit");

    let mut records = Vec::new();
    world.for_each(renderable_bit | transform_bit, |id| {
        let Some(renderable) = world.get_component::<Renderable>(id) else {
            return;
        };
        if !renderable.visible {
            return;
        }
        let Some(transform) = world.get_component::<Transform>(id) else {
            return;
        };
        records.push(RenderRecord {
            entity: id,
            transform: *transform,
            mesh_id: renderable.mesh_id.clone(),
            material_id: renderable.material_id.clone(),
        });
    });
    RenderSnapshot { records }
}

/// Distance beyond which `LodSystem` marks an entity invisible, as a
/// placeholder for real level-of-detail selection (swapping meshes, not
/// just hiding them, is a renderer concern out of scope here).
pub const DEFAULT_VISIBILITY_RADIUS: f32 = 10_000.0;

/// Low-frequency visibility culling relative to `origin` (typically the
/// active camera's position). This is deliberately simple — a distance
/// cutoff — standing in for whatever LOD scheme the renderer actually uses;
/// this core only needs to decide who is even worth describing in a
/// snapshot.
pub struct LodSystem {
    pub origin: ion_math::Vec3,
    pub visibility_radius: f32,
}

impl Default for LodSystem {
    fn default() -> Self {
        Self {
            origin: ion_math::Vec3::ZERO,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
        }
    }
}

impl System for LodSystem {
    fn name(&self) -> &'static str {
        "lod"
    }

    fn tick(&mut self, world: &mut World, _dt: f32) {
        let renderable_bit = world.component_bit::<Renderable>().expect("renderable bit");
        let transform_bit = world.component_bit::<Transform>().expect("transform bit");
        let ids = world.query(renderable_bit | transform_bit);
        for id in ids {
            let distance = world
                .get_component::<Transform>(id)
                .map(|t| (t.position - self.origin).length())
                .unwrap_or(0.0);
            let visible = distance <= self.visibility_radius;
            if let Some(renderable) = world.get_component_mut::<Renderable>(id) {
                renderable.visible = visible;
            }
        }
    }
}

/// Low-frequency world bookkeeping: clears `Metadata::parent` references
/// that now point at a destroyed entity, so a stale weak reference doesn't
/// accumulate across many ticks between the rarer maintenance passes that
/// would otherwise be the only thing to notice.
pub struct SceneMaintenanceSystem;

impl Default for SceneMaintenanceSystem {
    fn default() -> Self {
        Self
    }
}

impl System for SceneMaintenanceSystem {
    fn name(&self) -> &'static str {
        "scene_maintenance"
    }

    fn tick(&mut self, world: &mut World, _dt: f32) {
        let metadata_bit = world.component_bit::<crate::component::Metadata>().expect("metadata bit");
        let ids = world.query(metadata_bit);
        let mut cleared = 0u32;
        for id in ids {
            let stale = world
                .get_component::<crate::component::Metadata>(id)
                .and_then(|m| m.parent)
                .map(|parent| !world.is_alive(parent))
                .unwrap_or(false);
            if stale {
                if let Some(metadata) = world.get_component_mut::<crate::component::Metadata>(id) {
                    metadata.parent = None;
                }
                cleared += 1;
            }
        }
        debug!(cleared, entity_count = world.entity_count(), "scene maintenance pass");
    }
}
