//! 6DOF rigid body integration: the `Physics` component and the system that
//! advances it each tick using semi-implicit Euler integration with
//! exponential drag.

pub mod collider;
pub mod component;
pub mod stats;
pub mod system;

pub use collider::{Collider, ColliderShape};
pub use component::Physics;
pub use stats::PhysicsStats;
pub use system::{PhysicsSystem, DEFAULT_MAX_ANGULAR_SPEED, DEFAULT_MAX_LINEAR_SPEED};
