//! Quaternion helpers for rigid body integration.
//!
//! `glam::Quat` already multiplies and rotates correctly; this module adds
//! the operations the physics integrator needs on top: building the
//! "derivative" quaternion for angular-velocity integration, renormalizing
//! after repeated small updates, and Euler conversions for authoring tools.

use glam::{Quat, Vec3};

/// Integrates `q` forward by one step under angular velocity `omega`
/// (rad/s, world frame) over `dt` seconds using the standard
/// `q_dot = 0.5 * omega_quat * q` update, then renormalizes.
///
/// This is the quaternion half of semi-implicit Euler integration: call it
/// with the *updated* angular velocity, after forces for this step have
/// already been applied to it.
pub fn integrate(q: Quat, omega: Vec3, dt: f32) -> Quat {
    let omega_quat = Quat::from_xyzw(omega.x, omega.y, omega.z, 0.0);
    let q_dot = omega_quat * q;
    let scaled = Quat::from_xyzw(
        q_dot.x * 0.5 * dt,
        q_dot.y * 0.5 * dt,
        q_dot.z * 0.5 * dt,
        q_dot.w * 0.5 * dt,
    );
    let integrated = Quat::from_xyzw(
        q.x + scaled.x,
        q.y + scaled.y,
        q.z + scaled.z,
        q.w + scaled.w,
    );
    renormalize(integrated)
}

/// Renormalizes `q`, falling back to identity if it has degenerated to
/// (near-)zero length — this should only happen after a bug upstream, but
/// the integrator must never hand a NaN quaternion to the rest of the world.
pub fn renormalize(q: Quat) -> Quat {
    let len_sq = q.length_squared();
    if len_sq < 1e-12 || !len_sq.is_finite() {
        Quat::IDENTITY
    } else {
        q.normalize()
    }
}

/// How far `q` has drifted from unit length, for invariant checks.
pub fn unit_drift(q: Quat) -> f32 {
    (q.length_squared().sqrt() - 1.0).abs()
}

/// Shortest-arc rotation that takes the local `forward` axis to `target_dir`
/// (both assumed non-zero; `target_dir` need not be unit length).
pub fn look_rotation(target_dir: Vec3, up: Vec3) -> Quat {
    let dir = target_dir.normalize_or_zero();
    if dir.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    // Near-parallel to `up`: fall back to an arbitrary stable reference axis
    // so the resulting basis doesn't degenerate.
    let up = if dir.abs_diff_eq(up.normalize_or_zero(), 1e-3)
        || dir.abs_diff_eq(-up.normalize_or_zero(), 1e-3)
    {
        Vec3::X
    } else {
        up
    };
    Quat::from_mat3(&glam::Mat3::from_cols(
        up.cross(dir).normalize_or_zero(),
        up,
        dir,
    ))
    .normalize()
}

pub fn from_euler_deg(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        glam::EulerRot::YXZ,
        crate::degrees_to_radians(yaw),
        crate::degrees_to_radians(pitch),
        crate::degrees_to_radians(roll),
    )
}

pub fn to_euler_deg(q: Quat) -> (f32, f32, f32) {
    let (yaw, pitch, roll) = q.to_euler(glam::EulerRot::YXZ);
    (
        crate::radians_to_degrees(pitch),
        crate::radians_to_degrees(yaw),
        crate::radians_to_degrees(roll),
    )
}
