use std::sync::Arc;
use flightinfo_core::FlightRepository;

use crate::service::FlightService;

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<FlightService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn FlightRepository>) -> Self {
        Self {
            flights: Arc::new(FlightService::new(repo)),
        }
    }
}
