use thiserror::Error;

use ion_ecs::EntityId;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("entity {0} has no FlightControl component")]
    MissingFlightControl(EntityId),

    #[error("entity {0} has no Thrusters component")]
    MissingThrusters(EntityId),
}

pub type FlightResult<T> = Result<T, FlightError>;
