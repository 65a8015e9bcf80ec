use async_trait::async_trait;
use crate::flight::{FlightRecord, NewFlight};
use crate::search::FlightPredicate;
use crate::CoreResult;

/// Repository trait for flight data access.
///
/// Listing and search results are ordered by departure time, then id.
/// Implementations assign ids in creation order and stamp `created_at` /
/// `updated_at` themselves. Flight numbers are unique across the store.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get(&self, id: i64) -> CoreResult<Option<FlightRecord>>;

    async fn list_all(&self) -> CoreResult<Vec<FlightRecord>>;

    async fn insert(&self, flight: NewFlight) -> CoreResult<FlightRecord>;

    /// Replace the mutable fields of flight `id`. `None` if it does not exist.
    async fn update(&self, id: i64, flight: NewFlight) -> CoreResult<Option<FlightRecord>>;

    /// `false` if there was nothing to delete.
    async fn delete(&self, id: i64) -> CoreResult<bool>;

    async fn exists(&self, id: i64) -> CoreResult<bool>;

    async fn search(&self, predicate: &FlightPredicate) -> CoreResult<Vec<FlightRecord>>;
}
