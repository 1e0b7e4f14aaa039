//! Small vector helpers that come up repeatedly in flight and physics code.

use glam::Vec3;

/// Sanity limit used when clamping a magnitude without zeroing direction.
/// Returns `v` unchanged if its length is already within `max_len`.
pub fn clamp_length(v: Vec3, max_len: f32) -> Vec3 {
    let len = v.length();
    if len > max_len && len > f32::EPSILON {
        v * (max_len / len)
    } else {
        v
    }
}

/// True if every component of `v` is finite.
pub fn is_finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Projects `v` onto the plane perpendicular to `normal` (assumed unit length).
pub fn project_onto_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}
