use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of an entity in world space.
///
/// This is the plain-data shape, not a component wrapper — `ion-ecs` stores
/// one of these per entity that has a `Transform` bit set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Transforms a point from this transform's local space into the space
    /// it's embedded in, applying scale, then rotation, then translation.
    pub fn apply_to_point(&self, local: Vec3) -> Vec3 {
        self.rotation * (local * self.scale) + self.position
    }

    /// Transforms a direction (ignores translation and scale).
    pub fn apply_to_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Composes `self` with a child transform expressed relative to it,
    /// producing the child's transform in the same space `self` is in.
    pub fn combine(&self, child: &Transform) -> Transform {
        Transform {
            position: self.apply_to_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.apply_to_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn translation_only() {
        let t = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(t.apply_to_point(Vec3::ZERO), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_actually_rotates() {
        let t = Transform {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        let rotated = t.apply_to_point(Vec3::new(0.0, 0.0, -1.0));
        // 90 degree yaw should bring -Z roughly onto -X.
        assert!((rotated.x - (-1.0)).abs() < 1e-4, "rotated = {rotated:?}");
        assert!(rotated.z.abs() < 1e-4);
    }

    #[test]
    fn combine_composes_parent_and_child() {
        let parent = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let child = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        let combined = parent.combine(&child);
        assert_eq!(combined.position, Vec3::new(10.0, 5.0, 0.0));
    }

    #[test]
    fn forward_up_right_are_orthonormal_at_identity() {
        let t = Transform::default();
        assert_eq!(t.forward(), Vec3::NEG_Z);
        assert_eq!(t.up(), Vec3::Y);
        assert_eq!(t.right(), Vec3::X);
    }
}
