use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use flightinfo_core::repository::FlightRepository;
use flightinfo_core::search::{sort_by_departure, FlightPredicate};
use flightinfo_core::{CoreError, CoreResult, FlightRecord, NewFlight};

#[derive(Default)]
struct Inner {
    flights: BTreeMap<i64, FlightRecord>,
    last_id: i64,
}

impl Inner {
    fn number_taken(&self, flight_number: &str, except: Option<i64>) -> bool {
        self.flights
            .values()
            .any(|f| f.flight_number == flight_number && Some(f.id) != except)
    }
}

/// Process-local flight store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryFlightRepository {
    inner: RwLock<Inner>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn get(&self, id: i64) -> CoreResult<Option<FlightRecord>> {
        Ok(self.inner.read().await.flights.get(&id).cloned())
    }

    async fn list_all(&self) -> CoreResult<Vec<FlightRecord>> {
        let mut flights: Vec<FlightRecord> = self.inner.read().await.flights.values().cloned().collect();
        sort_by_departure(&mut flights);
        Ok(flights)
    }

    async fn insert(&self, flight: NewFlight) -> CoreResult<FlightRecord> {
        let mut inner = self.inner.write().await;
        if inner.number_taken(&flight.flight_number, None) {
            return Err(CoreError::DuplicateFlightNumber(flight.flight_number));
        }

        inner.last_id += 1;
        let record = flight.into_record(inner.last_id, Utc::now());
        inner.flights.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, flight: NewFlight) -> CoreResult<Option<FlightRecord>> {
        let mut inner = self.inner.write().await;
        if !inner.flights.contains_key(&id) {
            return Ok(None);
        }
        if inner.number_taken(&flight.flight_number, Some(id)) {
            return Err(CoreError::DuplicateFlightNumber(flight.flight_number));
        }

        let Some(existing) = inner.flights.get_mut(&id) else {
            return Ok(None);
        };
        existing.flight_number = flight.flight_number;
        existing.airline = flight.airline;
        existing.departure_airport = flight.departure_airport;
        existing.arrival_airport = flight.arrival_airport;
        existing.departure_time = flight.departure_time;
        existing.arrival_time = flight.arrival_time;
        existing.status = flight.status;
        existing.updated_at = Utc::now();

        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> CoreResult<bool> {
        Ok(self.inner.write().await.flights.remove(&id).is_some())
    }

    async fn exists(&self, id: i64) -> CoreResult<bool> {
        Ok(self.inner.read().await.flights.contains_key(&id))
    }

    async fn search(&self, predicate: &FlightPredicate) -> CoreResult<Vec<FlightRecord>> {
        let inner = self.inner.read().await;
        Ok(predicate.apply(inner.flights.values().cloned()))
    }
}
