//! Sparse flight search: criteria validation and predicate composition.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::flight::FlightRecord;
use crate::status::FlightStatus;
use crate::validation::{
    is_valid_airport_code, length_between, status_message, ValidationErrors,
};

pub const MAX_RANGE_DAYS: i64 = 365;
pub const MAX_LOOKBACK_MONTHS: u32 = 12;
pub const MAX_LOOKAHEAD_MONTHS: u32 = 24;

pub mod fields {
    pub const AIRLINE: &str = "airline";
    pub const DEPARTURE_AIRPORT: &str = "departureAirport";
    pub const ARRIVAL_AIRPORT: &str = "arrivalAirport";
    pub const DEPARTURE_FROM_DATE: &str = "departureFromDate";
    pub const DEPARTURE_TO_DATE: &str = "departureToDate";
    pub const STATUS: &str = "status";
    pub const SEARCH_CRITERIA: &str = "searchCriteria";
}

/// Optional filters for a flight search. Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightSearchCriteria {
    pub airline: Option<String>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub departure_from_date: Option<DateTime<Utc>>,
    pub departure_to_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn meaningful(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl FlightSearchCriteria {
    /// True when at least one filter carries a usable value.
    pub fn has_any_criterion(&self) -> bool {
        meaningful(&self.airline)
            || meaningful(&self.departure_airport)
            || meaningful(&self.arrival_airport)
            || meaningful(&self.status)
            || self.departure_from_date.is_some()
            || self.departure_to_date.is_some()
    }
}

pub fn validate_search(criteria: &FlightSearchCriteria) -> Result<(), ValidationErrors> {
    validate_search_at(criteria, Utc::now())
}

/// Validate search criteria as if the current time were `now`.
pub fn validate_search_at(
    criteria: &FlightSearchCriteria,
    now: DateTime<Utc>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(airline) = filled(&criteria.airline) {
        if !length_between(airline, 2, 100) {
            errors.add(fields::AIRLINE, "Airline name must be between 2 and 100 characters");
        }
    }

    if let Some(code) = filled(&criteria.departure_airport) {
        if !length_between(code, 3, 5) || !is_valid_airport_code(code) {
            errors.add(
                fields::DEPARTURE_AIRPORT,
                "Departure airport code must be 3-4 uppercase letters (e.g., AKL, NZAA)",
            );
        }
    }

    if let Some(code) = filled(&criteria.arrival_airport) {
        if !length_between(code, 3, 5) || !is_valid_airport_code(code) {
            errors.add(
                fields::ARRIVAL_AIRPORT,
                "Arrival airport code must be 3-4 uppercase letters (e.g., CHC, NZCH)",
            );
        }
    }

    if let Some(status) = filled(&criteria.status) {
        if status.parse::<FlightStatus>().is_err() {
            errors.add(fields::STATUS, status_message());
        }
    }

    check_date_window(criteria, now, &mut errors);

    if !criteria.has_any_criterion() {
        errors.add(
            fields::SEARCH_CRITERIA,
            "At least one search criterion must be provided",
        );
    }

    errors.into_result()
}

fn check_date_window(criteria: &FlightSearchCriteria, now: DateTime<Utc>, errors: &mut ValidationErrors) {
    if let (Some(from), Some(to)) = (criteria.departure_from_date, criteria.departure_to_date) {
        if from >= to {
            errors.add(
                fields::DEPARTURE_FROM_DATE,
                "Departure from date must be before departure to date",
            );
        }
    }

    if let Some(from) = criteria.departure_from_date {
        let earliest = now
            .checked_sub_months(Months::new(MAX_LOOKBACK_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        if from <= earliest {
            errors.add(
                fields::DEPARTURE_FROM_DATE,
                "Departure from date cannot be more than 1 year in the past",
            );
        }
    }

    if let Some(to) = criteria.departure_to_date {
        let latest = now
            .checked_add_months(Months::new(MAX_LOOKAHEAD_MONTHS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if to >= latest {
            errors.add(
                fields::DEPARTURE_TO_DATE,
                "Departure to date cannot be more than 2 years in the future",
            );
        }
    }

    if let (Some(from), Some(to)) = (criteria.departure_from_date, criteria.departure_to_date) {
        if to - from > Duration::days(MAX_RANGE_DAYS) {
            errors.add(fields::DEPARTURE_TO_DATE, "Date range cannot exceed 365 days");
        }
    }
}

/// One conjunct of a search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightClause {
    /// Case-sensitive literal substring of the airline name.
    AirlineContains(String),
    DepartureAirport(String),
    ArrivalAirport(String),
    DepartsAtOrAfter(DateTime<Utc>),
    DepartsAtOrBefore(DateTime<Utc>),
    Status(FlightStatus),
}

impl FlightClause {
    pub fn matches(&self, flight: &FlightRecord) -> bool {
        match self {
            FlightClause::AirlineContains(needle) => flight.airline.contains(needle.as_str()),
            FlightClause::DepartureAirport(code) => flight.departure_airport == *code,
            FlightClause::ArrivalAirport(code) => flight.arrival_airport == *code,
            FlightClause::DepartsAtOrAfter(from) => flight.departure_time >= *from,
            FlightClause::DepartsAtOrBefore(to) => flight.departure_time <= *to,
            FlightClause::Status(status) => flight.status == *status,
        }
    }
}

/// Conjunction of clauses. An empty predicate matches every flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightPredicate {
    clauses: Vec<FlightClause>,
}

impl FlightPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: FlightClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FlightClause] {
        &self.clauses
    }

    pub fn matches(&self, flight: &FlightRecord) -> bool {
        self.clauses.iter().all(|clause| clause.matches(flight))
    }

    /// Keep the matching flights, ordered by departure then identity.
    pub fn apply<I>(&self, flights: I) -> Vec<FlightRecord>
    where
        I: IntoIterator<Item = FlightRecord>,
    {
        let mut matched: Vec<FlightRecord> = flights
            .into_iter()
            .filter(|flight| self.matches(flight))
            .collect();
        sort_by_departure(&mut matched);
        matched
    }
}

/// Translate validated criteria into a predicate.
///
/// An unparseable status contributes no clause; validation rejects it first.
pub fn build_predicate(criteria: &FlightSearchCriteria) -> FlightPredicate {
    let mut predicate = FlightPredicate::new();

    if let Some(airline) = filled(&criteria.airline) {
        predicate = predicate.and(FlightClause::AirlineContains(airline.to_string()));
    }
    if let Some(code) = filled(&criteria.departure_airport) {
        predicate = predicate.and(FlightClause::DepartureAirport(code.to_string()));
    }
    if let Some(code) = filled(&criteria.arrival_airport) {
        predicate = predicate.and(FlightClause::ArrivalAirport(code.to_string()));
    }
    if let Some(from) = criteria.departure_from_date {
        predicate = predicate.and(FlightClause::DepartsAtOrAfter(from));
    }
    if let Some(to) = criteria.departure_to_date {
        predicate = predicate.and(FlightClause::DepartsAtOrBefore(to));
    }
    if let Some(status) = filled(&criteria.status).and_then(|s| s.parse::<FlightStatus>().ok()) {
        predicate = predicate.and(FlightClause::Status(status));
    }

    predicate
}

pub fn sort_by_departure(flights: &mut [FlightRecord]) {
    flights.sort_by(|a, b| {
        a.departure_time
            .cmp(&b.departure_time)
            .then_with(|| a.id.cmp(&b.id))
    });
}
