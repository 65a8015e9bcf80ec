use std::sync::Arc;
use flightinfo_core::search::build_predicate;
use flightinfo_core::{
    CoreResult, FlightPayload, FlightRecord, FlightRepository, FlightSearchCriteria, NewFlight,
};
use tracing::{info, warn};

/// Thin layer over the repository that owns the operational logging.
/// Callers validate payloads before handing them over.
pub struct FlightService {
    repo: Arc<dyn FlightRepository>,
}

impl FlightService {
    pub fn new(repo: Arc<dyn FlightRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all_flights(&self) -> CoreResult<Vec<FlightRecord>> {
        info!("Retrieving all flights");
        let flights = self.repo.list_all().await?;
        info!("Retrieved {} flights", flights.len());
        Ok(flights)
    }

    pub async fn get_flight_by_id(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        info!("Retrieving flight with ID {}", id);
        let flight = self.repo.get(id).await?;
        if flight.is_none() {
            warn!("Flight with ID {} not found", id);
        }
        Ok(flight)
    }

    pub async fn create_flight(&self, payload: &FlightPayload) -> CoreResult<FlightRecord> {
        info!(
            "Creating new flight {} from {} to {}",
            payload.flight_number, payload.departure_airport, payload.arrival_airport
        );
        let flight = NewFlight::try_from(payload)?;
        let created = self.repo.insert(flight).await?;
        info!(
            "Flight created successfully with ID {}: {}",
            created.id, created.flight_number
        );
        Ok(created)
    }

    pub async fn update_flight(&self, id: i64, payload: &FlightPayload) -> CoreResult<Option<FlightRecord>> {
        info!("Updating flight {} ({})", id, payload.flight_number);
        let flight = NewFlight::try_from(payload)?;
        let updated = self.repo.update(id, flight).await?;
        match &updated {
            Some(f) => info!("Flight {} updated: {} is {}", f.id, f.flight_number, f.status),
            None => warn!("Flight with ID {} not found for update", id),
        }
        Ok(updated)
    }

    pub async fn delete_flight(&self, id: i64) -> CoreResult<bool> {
        info!("Deleting flight {}", id);
        let deleted = self.repo.delete(id).await?;
        if !deleted {
            warn!("Flight with ID {} not found for deletion", id);
        }
        Ok(deleted)
    }

    pub async fn search_flights(&self, criteria: &FlightSearchCriteria) -> CoreResult<Vec<FlightRecord>> {
        let predicate = build_predicate(criteria);
        info!("Searching flights with {} filter(s)", predicate.clauses().len());
        let flights = self.repo.search(&predicate).await?;
        info!("Search matched {} flights", flights.len());
        Ok(flights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use flightinfo_core::CoreError;
    use flightinfo_store::InMemoryFlightRepository;

    fn payload(number: &str) -> FlightPayload {
        let departure = Utc::now() + Duration::days(2);
        FlightPayload {
            flight_number: number.to_string(),
            airline: "Jetstar".to_string(),
            departure_airport: "AKL".to_string(),
            arrival_airport: "ZQN".to_string(),
            departure_time: Some(departure),
            arrival_time: Some(departure + Duration::hours(2)),
            status: "Scheduled".to_string(),
        }
    }

    fn service() -> FlightService {
        FlightService::new(Arc::new(InMemoryFlightRepository::new()))
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let service = service();
        let created = service.create_flight(&payload("JQ101")).await.unwrap();

        let fetched = service.get_flight_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.flight_number, "JQ101");
        assert_eq!(service.get_all_flights().await.unwrap().len(), 1);
        assert!(service.get_flight_by_id(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_status_is_rejected_before_storage() {
        let service = service();
        let mut bad = payload("JQ101");
        bad.status = "Boarding".to_string();

        let err = service.create_flight(&bad).await.unwrap_err();
        assert!(matches!(err, CoreError::InternalError(_)));
        assert!(service.get_all_flights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_flights() {
        let service = service();
        assert!(service.update_flight(99, &payload("JQ101")).await.unwrap().is_none());
        assert!(!service.delete_flight(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_delegates_to_repository() {
        let service = service();
        service.create_flight(&payload("JQ101")).await.unwrap();
        let mut other = payload("NZ5");
        other.airline = "Air New Zealand".to_string();
        service.create_flight(&other).await.unwrap();

        let criteria = FlightSearchCriteria {
            airline: Some("Jet".to_string()),
            ..Default::default()
        };
        let found = service.search_flights(&criteria).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].flight_number, "JQ101");
    }
}
