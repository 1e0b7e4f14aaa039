//! Entity/component substrate and system scheduler.
//!
//! [`World`] owns a fixed-capacity pool of generational [`EntityId`]s and a
//! type-erased store per component type. [`Scheduler`] runs a fixed,
//! explicitly declared sequence of [`System`]s, each optionally gated to a
//! frequency lower than the driving tick rate.

pub mod entity;
pub mod error;
pub mod scheduler;
pub mod world;

pub use entity::EntityId;
pub use error::{EcsError, EcsResult};
pub use scheduler::{Scheduler, SchedulerStats, System, SystemStats};
pub use world::{Component, World, MAX_COMPONENT_KINDS};
