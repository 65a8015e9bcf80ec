use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational status of a flight.
///
/// The set is closed. Parsing is case-insensitive against the variant names,
/// while `Display` always yields the canonical name (`"InAir"`), which is also
/// the wire and storage form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FlightStatus {
    Scheduled,
    Delayed,
    Cancelled,
    InAir,
    Landed,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 5] = [
        FlightStatus::Scheduled,
        FlightStatus::Delayed,
        FlightStatus::Cancelled,
        FlightStatus::InAir,
        FlightStatus::Landed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::Delayed => "Delayed",
            FlightStatus::Cancelled => "Cancelled",
            FlightStatus::InAir => "InAir",
            FlightStatus::Landed => "Landed",
        }
    }

    /// Comma-separated canonical names, used in error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(FlightStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown flight status: {0}")]
pub struct ParseFlightStatusError(pub String);

impl FromStr for FlightStatus {
    type Err = ParseFlightStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseFlightStatusError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        for raw in ["scheduled", "Scheduled", "SCHEDULED", "sChEdUlEd"] {
            assert_eq!(raw.parse::<FlightStatus>(), Ok(FlightStatus::Scheduled));
        }
        assert_eq!("inair".parse::<FlightStatus>(), Ok(FlightStatus::InAir));
        assert_eq!("LANDED".parse::<FlightStatus>(), Ok(FlightStatus::Landed));
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!("Boarding".parse::<FlightStatus>().is_err());
        assert!("In Air".parse::<FlightStatus>().is_err());
        assert!("".parse::<FlightStatus>().is_err());
        // Ordinals are not names
        assert!("0".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for status in FlightStatus::ALL {
            assert_eq!(status.to_string().parse::<FlightStatus>(), Ok(status));
        }
        assert_eq!(FlightStatus::names(), "Scheduled, Delayed, Cancelled, InAir, Landed");
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&FlightStatus::InAir).unwrap();
        assert_eq!(json, "\"InAir\"");
    }
}
