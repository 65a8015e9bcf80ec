//! Business rules applied to flight payloads on create and update.
//!
//! Every rule runs against the whole payload and pushes into a shared
//! [`ValidationErrors`], so a single pass reports every problem at once.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::flight::FlightPayload;
use crate::status::FlightStatus;

static FLIGHT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{1,4}$").unwrap()
});

static AIRPORT_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{3,4}$").unwrap()
});

/// How far in the past a new flight may depart, to absorb clock skew.
pub const DEPARTURE_GRACE_MINUTES: i64 = 30;

pub mod fields {
    pub const FLIGHT_NUMBER: &str = "flightNumber";
    pub const AIRLINE: &str = "airline";
    pub const DEPARTURE_AIRPORT: &str = "departureAirport";
    pub const ARRIVAL_AIRPORT: &str = "arrivalAirport";
    pub const DEPARTURE_TIME: &str = "departureTime";
    pub const ARRIVAL_TIME: &str = "arrivalTime";
    pub const STATUS: &str = "status";
}

/// A single rule violation, scoped to the wire name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered collection of rule violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Messages recorded against `field`, in rule order.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when no rule fired.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_flight_number(value: &str) -> bool {
    FLIGHT_NUMBER_REGEX.is_match(value)
}

pub fn is_valid_airport_code(value: &str) -> bool {
    AIRPORT_CODE_REGEX.is_match(value)
}

pub fn status_message() -> String {
    format!("Status must be one of: {}", FlightStatus::names())
}

pub(crate) fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a create payload against the current clock.
pub fn validate_create(payload: &FlightPayload) -> Result<(), ValidationErrors> {
    validate_create_at(payload, Utc::now())
}

/// Validate a create payload as if the current time were `now`.
pub fn validate_create_at(payload: &FlightPayload, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
    let earliest_departure = now - Duration::minutes(DEPARTURE_GRACE_MINUTES);
    validate_payload(payload, Some(earliest_departure))
}

/// Validate an update payload. Past departures are allowed.
pub fn validate_update(payload: &FlightPayload) -> Result<(), ValidationErrors> {
    validate_payload(payload, None)
}

fn validate_payload(
    payload: &FlightPayload,
    earliest_departure: Option<DateTime<Utc>>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_flight_number(payload, &mut errors);
    check_airline(payload, &mut errors);
    check_airport_code(fields::DEPARTURE_AIRPORT, &payload.departure_airport, &mut errors);
    check_airport_code(fields::ARRIVAL_AIRPORT, &payload.arrival_airport, &mut errors);
    check_departure_time(payload, earliest_departure, &mut errors);
    check_arrival_time(payload, &mut errors);
    check_status(payload, &mut errors);
    check_airports_differ(payload, &mut errors);

    errors.into_result()
}

fn check_flight_number(payload: &FlightPayload, errors: &mut ValidationErrors) {
    let value = payload.flight_number.as_str();
    if is_blank(value) {
        errors.add(fields::FLIGHT_NUMBER, "Flight number is required");
        return;
    }
    if !length_between(value, 2, 10) {
        errors.add(fields::FLIGHT_NUMBER, "Flight number must be between 2 and 10 characters");
    }
    if !is_valid_flight_number(value) {
        errors.add(
            fields::FLIGHT_NUMBER,
            "Flight number must be in format: AA123 (2 letters followed by 1-4 numbers)",
        );
    }
}

fn check_airline(payload: &FlightPayload, errors: &mut ValidationErrors) {
    let value = payload.airline.as_str();
    if is_blank(value) {
        errors.add(fields::AIRLINE, "Airline is required");
    } else if !length_between(value, 2, 100) {
        errors.add(fields::AIRLINE, "Airline must be between 2 and 100 characters");
    }
}

fn check_airport_code(field: &str, value: &str, errors: &mut ValidationErrors) {
    if is_blank(value) {
        errors.add(field, "Airport code is required");
        return;
    }
    if !length_between(value, 3, 5) {
        errors.add(field, "Airport code must be between 3 and 5 characters");
    }
    if !is_valid_airport_code(value) {
        errors.add(field, "Airport code must be 3-4 uppercase letters");
    }
}

fn check_departure_time(
    payload: &FlightPayload,
    earliest_departure: Option<DateTime<Utc>>,
    errors: &mut ValidationErrors,
) {
    match (payload.departure_time, earliest_departure) {
        (None, _) => errors.add(fields::DEPARTURE_TIME, "Departure time is required"),
        (Some(departure), Some(earliest)) if departure < earliest => errors.add(
            fields::DEPARTURE_TIME,
            format!(
                "Departure time cannot be more than {} minutes in the past",
                DEPARTURE_GRACE_MINUTES
            ),
        ),
        _ => {}
    }
}

fn check_arrival_time(payload: &FlightPayload, errors: &mut ValidationErrors) {
    let Some(arrival) = payload.arrival_time else {
        errors.add(fields::ARRIVAL_TIME, "Arrival time is required");
        return;
    };
    if let Some(departure) = payload.departure_time {
        if arrival <= departure {
            errors.add(fields::ARRIVAL_TIME, "Arrival time must be after departure time");
        }
    }
}

fn check_status(payload: &FlightPayload, errors: &mut ValidationErrors) {
    if is_blank(&payload.status) {
        errors.add(fields::STATUS, "Status is required");
    } else if payload.status.parse::<FlightStatus>().is_err() {
        errors.add(fields::STATUS, status_message());
    }
}

fn check_airports_differ(payload: &FlightPayload, errors: &mut ValidationErrors) {
    if is_blank(&payload.departure_airport) || is_blank(&payload.arrival_airport) {
        return;
    }
    if payload.departure_airport == payload.arrival_airport {
        errors.add(
            fields::ARRIVAL_AIRPORT,
            "Departure and arrival airports cannot be the same",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap()
    }

    fn valid_payload() -> FlightPayload {
        FlightPayload {
            flight_number: "NZ123".to_string(),
            airline: "Air New Zealand".to_string(),
            departure_airport: "AKL".to_string(),
            arrival_airport: "CHC".to_string(),
            departure_time: Some(now() + Duration::hours(2)),
            arrival_time: Some(now() + Duration::hours(3)),
            status: "Scheduled".to_string(),
        }
    }

    #[test]
    fn test_valid_payload_passes_create_and_update() {
        assert!(validate_create_at(&valid_payload(), now()).is_ok());
        assert!(validate_update(&valid_payload()).is_ok());
    }

    #[test]
    fn test_arrival_before_departure_fails() {
        let mut payload = valid_payload();
        payload.arrival_time = Some(now() + Duration::hours(1));

        let errors = validate_create_at(&payload, now()).unwrap_err();
        assert!(errors
            .messages_for(fields::ARRIVAL_TIME)
            .any(|m| m == "Arrival time must be after departure time"));

        let errors = validate_update(&payload).unwrap_err();
        assert!(errors.has_field(fields::ARRIVAL_TIME));
    }

    #[test]
    fn test_arrival_equal_to_departure_fails_alongside_other_errors() {
        let mut payload = valid_payload();
        payload.arrival_time = payload.departure_time;
        payload.flight_number = "bad".to_string();
        payload.status = "Boarding".to_string();

        let errors = validate_update(&payload).unwrap_err();
        assert!(errors.has_field(fields::ARRIVAL_TIME));
        assert!(errors.has_field(fields::FLIGHT_NUMBER));
        assert!(errors.has_field(fields::STATUS));
    }

    #[test]
    fn test_same_airports_fail_even_when_well_formed() {
        let mut payload = valid_payload();
        payload.arrival_airport = "AKL".to_string();

        let errors = validate_create_at(&payload, now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, fields::ARRIVAL_AIRPORT);
        assert_eq!(
            errors.errors()[0].message,
            "Departure and arrival airports cannot be the same"
        );
    }

    #[test]
    fn test_departure_grace_window_applies_to_create_only() {
        let mut payload = valid_payload();
        payload.departure_time = Some(now() - Duration::minutes(31));
        payload.arrival_time = Some(now() + Duration::hours(1));

        let errors = validate_create_at(&payload, now()).unwrap_err();
        assert_eq!(
            errors.messages_for(fields::DEPARTURE_TIME).collect::<Vec<_>>(),
            vec!["Departure time cannot be more than 30 minutes in the past"]
        );
        assert!(validate_update(&payload).is_ok());

        payload.departure_time = Some(now() - Duration::minutes(29));
        assert!(validate_create_at(&payload, now()).is_ok());

        payload.departure_time = Some(now() - Duration::minutes(30));
        assert!(validate_create_at(&payload, now()).is_ok());
    }

    #[test]
    fn test_status_is_case_insensitive() {
        for status in ["scheduled", "Scheduled", "SCHEDULED", "inair", "Landed"] {
            let mut payload = valid_payload();
            payload.status = status.to_string();
            assert!(validate_create_at(&payload, now()).is_ok(), "status {status}");
        }

        let mut payload = valid_payload();
        payload.status = "Boarding".to_string();
        let errors = validate_create_at(&payload, now()).unwrap_err();
        assert_eq!(
            errors.errors()[0].message,
            "Status must be one of: Scheduled, Delayed, Cancelled, InAir, Landed"
        );
    }

    #[test]
    fn test_empty_payload_reports_every_required_field() {
        let errors = validate_create_at(&FlightPayload::default(), now()).unwrap_err();
        let scoped: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            scoped,
            vec![
                fields::FLIGHT_NUMBER,
                fields::AIRLINE,
                fields::DEPARTURE_AIRPORT,
                fields::ARRIVAL_AIRPORT,
                fields::DEPARTURE_TIME,
                fields::ARRIVAL_TIME,
                fields::STATUS,
            ]
        );
        assert!(errors.errors().iter().all(|e| e.message.ends_with("is required")));
    }

    #[test]
    fn test_flight_number_format() {
        for ok in ["NZ1", "NZ1234", "QF12"] {
            let mut payload = valid_payload();
            payload.flight_number = ok.to_string();
            assert!(validate_update(&payload).is_ok(), "{ok}");
        }

        for bad in ["nz123", "N123", "NZ12345", "NZ", "123NZ", "NZ12A"] {
            let mut payload = valid_payload();
            payload.flight_number = bad.to_string();
            let errors = validate_update(&payload).unwrap_err();
            assert!(errors.has_field(fields::FLIGHT_NUMBER), "{bad}");
        }

        let mut payload = valid_payload();
        payload.flight_number = "ABCDEFGHIJK".to_string();
        let errors = validate_update(&payload).unwrap_err();
        assert_eq!(errors.messages_for(fields::FLIGHT_NUMBER).count(), 2);
    }

    #[test]
    fn test_airline_length() {
        let mut payload = valid_payload();
        payload.airline = "A".to_string();
        assert!(validate_update(&payload).unwrap_err().has_field(fields::AIRLINE));

        payload.airline = "A".repeat(101);
        assert!(validate_update(&payload).unwrap_err().has_field(fields::AIRLINE));

        payload.airline = "A".repeat(100);
        assert!(validate_update(&payload).is_ok());
    }

    #[test]
    fn test_airport_code_format() {
        let mut payload = valid_payload();
        payload.departure_airport = "NZAA".to_string();
        assert!(validate_update(&payload).is_ok());

        payload.departure_airport = "akl".to_string();
        let errors = validate_update(&payload).unwrap_err();
        assert_eq!(
            errors.messages_for(fields::DEPARTURE_AIRPORT).collect::<Vec<_>>(),
            vec!["Airport code must be 3-4 uppercase letters"]
        );

        payload.departure_airport = "ABCDEF".to_string();
        let errors = validate_update(&payload).unwrap_err();
        assert_eq!(errors.messages_for(fields::DEPARTURE_AIRPORT).count(), 2);
    }

    #[test]
    fn test_accepted_payload_round_trips_through_record() {
        let payload = valid_payload();
        validate_create_at(&payload, now()).unwrap();

        let record = crate::flight::NewFlight::try_from(&payload)
            .unwrap()
            .into_record(1, now());
        let again = FlightPayload::from(&record);

        assert!(validate_create_at(&again, now()).is_ok());
        assert_eq!(again.departure_time, payload.departure_time);
    }

    #[test]
    fn test_errors_serialize_as_list() {
        let mut errors = ValidationErrors::new();
        errors.add(fields::AIRLINE, "Airline is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "airline", "message": "Airline is required" }])
        );
        assert_eq!(errors.to_string(), "airline: Airline is required");
    }
}
