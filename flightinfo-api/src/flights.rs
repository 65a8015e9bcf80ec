use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use flightinfo_core::search::validate_search;
use flightinfo_core::validation::{validate_create, validate_update};
use flightinfo_core::{CreateFlightRequest, FlightRecord, FlightSearchCriteria, UpdateFlightRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightResponse {
    pub id: i64,
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: String,
}

impl From<FlightRecord> for FlightResponse {
    fn from(flight: FlightRecord) -> Self {
        Self {
            id: flight.id,
            status: flight.status.to_string(),
            flight_number: flight.flight_number,
            airline: flight.airline,
            departure_airport: flight.departure_airport,
            arrival_airport: flight.arrival_airport,
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
        }
    }
}

fn to_responses(flights: Vec<FlightRecord>) -> Vec<FlightResponse> {
    flights.into_iter().map(FlightResponse::from).collect()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights).post(create_flight))
        .route("/api/flights/search", get(search_flights))
        .route(
            "/api/flights/{id}",
            get(get_flight).put(update_flight).delete(delete_flight),
        )
}

/// GET /api/flights
async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<FlightResponse>>, AppError> {
    let flights = state.flights.get_all_flights().await?;
    Ok(Json(to_responses(flights)))
}

/// GET /api/flights/{id}
async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight = state
        .flights
        .get_flight_by_id(id)
        .await?
        .ok_or_else(|| AppError::flight_not_found(id))?;

    Ok(Json(flight.into()))
}

/// POST /api/flights
/// Responds 201 with a Location header pointing at the new flight.
async fn create_flight(
    State(state): State<AppState>,
    Json(req): Json<CreateFlightRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create(&req)?;

    let created = state.flights.create_flight(&req).await?;
    let location = format!("/api/flights/{}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FlightResponse::from(created)),
    ))
}

/// PUT /api/flights/{id}
async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFlightRequest>,
) -> Result<Json<FlightResponse>, AppError> {
    validate_update(&req)?;

    let updated = state
        .flights
        .update_flight(id, &req)
        .await?
        .ok_or_else(|| AppError::flight_not_found(id))?;

    Ok(Json(updated.into()))
}

/// DELETE /api/flights/{id}
async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.flights.delete_flight(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::flight_not_found(id))
    }
}

/// GET /api/flights/search
async fn search_flights(
    State(state): State<AppState>,
    Query(criteria): Query<FlightSearchCriteria>,
) -> Result<Json<Vec<FlightResponse>>, AppError> {
    validate_search(&criteria)?;

    let flights = state.flights.search_flights(&criteria).await?;
    Ok(Json(to_responses(flights)))
}
