use thiserror::Error;

use ion_ecs::EcsError;
use ion_flight::FlightError;
use ion_input::InputError;

/// Top-level engine error, composing each subsystem's own error type the
/// way a process boundary wants one `Result` to report through rather than
/// making every caller match on which crate failed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ecs error: {0}")]
    Ecs(#[from] EcsError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("flight error: {0}")]
    Flight(#[from] FlightError),

    #[error("descriptor '{name}' is invalid: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
