use crate::directory::Resource;
use crate::flight::FlightId;
use crate::time::{Time, TimeParseError};
use chrono::NaiveDate;
use thiserror::Error;

/// Why a booking, cancellation or edit was not applied.
///
/// None of these are fatal; the store is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{date} {start} is in the past, pick a future time")]
    PastDateRejected { date: NaiveDate, start: Time },

    #[error("{resource} is already reserved by flight {flight} in that window")]
    ResourceConflict { resource: Resource, flight: FlightId },

    #[error("instructor {instructor} is not authorized to fly {aircraft}")]
    AuthorizationMismatch { instructor: String, aircraft: String },

    #[error("unknown {0}")]
    UnknownResource(Resource),

    #[error("no flight {0}")]
    UnknownFlight(FlightId),

    #[error("flight {0} is already cancelled")]
    AlreadyCancelled(FlightId),

    #[error("flight {0} is no longer scheduled")]
    NotScheduled(FlightId),
}

impl BookingError {
    pub fn missing(field: &'static str) -> BookingError {
        BookingError::InvalidInput {
            field,
            reason: "a value is required".to_string(),
        }
    }
}

impl From<TimeParseError> for BookingError {
    fn from(err: TimeParseError) -> Self {
        BookingError::InvalidInput {
            field: "time",
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Scenario file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Seed flight {index} is inconsistent: {source}")]
    Scenario {
        index: usize,
        #[source]
        source: BookingError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
