use serde::{Deserialize, Serialize};

/// Collision shape data. `ion-physics` only carries the shape and a trigger
/// flag — broad/narrow-phase collision detection and response are a
/// separate, out-of-scope concern this core hands off to whatever
/// collision engine the host application wires in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere { radius: f32 },
    Capsule { radius: f32, half_height: f32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Triggers report overlap without participating in collision
    /// response.
    pub is_trigger: bool,
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            is_trigger: false,
        }
    }
}
