use thiserror::Error;

use crate::entity::EntityId;

#[derive(Debug, Error)]
pub enum EcsError {
    #[error("entity pool exhausted: capacity {capacity} reached")]
    CapacityExceeded { capacity: usize },

    #[error("entity {0} is not alive (destroyed or never created)")]
    EntityNotAlive(EntityId),

    #[error("component type registry full: at most {max} distinct component types are supported")]
    ComponentRegistryFull { max: u32 },

    #[error("system '{name}' panicked or returned an error during tick: {source}")]
    SystemFailed {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

pub type EcsResult<T> = Result<T, EcsError>;
