pub mod status;
pub mod flight;
pub mod validation;
pub mod search;
pub mod repository;

pub use flight::{CreateFlightRequest, FlightPayload, FlightRecord, NewFlight, UpdateFlightRequest};
pub use repository::FlightRepository;
pub use search::{FlightClause, FlightPredicate, FlightSearchCriteria};
pub use status::FlightStatus;
pub use validation::{FieldError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("A flight with number {0} already exists")]
    DuplicateFlightNumber(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
