use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::status::FlightStatus;
use crate::{CoreError, CoreResult};

/// A persisted flight. Identity and timestamps are owned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: i64,
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create or update request, exactly as the caller sent it.
///
/// Missing strings deserialize as empty and missing times as `None` so the
/// validation engine can report them as field errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightPayload {
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub status: String,
}

pub type CreateFlightRequest = FlightPayload;
pub type UpdateFlightRequest = FlightPayload;

impl From<&FlightRecord> for FlightPayload {
    fn from(record: &FlightRecord) -> Self {
        Self {
            flight_number: record.flight_number.clone(),
            airline: record.airline.clone(),
            departure_airport: record.departure_airport.clone(),
            arrival_airport: record.arrival_airport.clone(),
            departure_time: Some(record.departure_time),
            arrival_time: Some(record.arrival_time),
            status: record.status.to_string(),
        }
    }
}

/// The mutable fields of a flight in typed form, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightStatus,
}

impl NewFlight {
    /// Build a record from this flight as the repository would store it.
    pub fn into_record(self, id: i64, now: DateTime<Utc>) -> FlightRecord {
        FlightRecord {
            id,
            flight_number: self.flight_number,
            airline: self.airline,
            departure_airport: self.departure_airport,
            arrival_airport: self.arrival_airport,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<&FlightPayload> for NewFlight {
    type Error = CoreError;

    fn try_from(payload: &FlightPayload) -> CoreResult<Self> {
        let departure_time = payload
            .departure_time
            .ok_or_else(|| CoreError::InternalError("departure time missing after validation".into()))?;
        let arrival_time = payload
            .arrival_time
            .ok_or_else(|| CoreError::InternalError("arrival time missing after validation".into()))?;
        let status = payload
            .status
            .parse::<FlightStatus>()
            .map_err(|e| CoreError::InternalError(e.to_string()))?;

        Ok(Self {
            flight_number: payload.flight_number.clone(),
            airline: payload.airline.clone(),
            departure_airport: payload.departure_airport.clone(),
            arrival_airport: payload.arrival_airport.clone(),
            departure_time,
            arrival_time,
            status,
        })
    }
}
