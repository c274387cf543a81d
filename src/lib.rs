pub mod aircraft;
pub mod config;
pub mod directory;
pub mod error;
pub mod flight;
pub mod instructor;
pub mod logger;
pub mod schedule;
pub mod time;

pub use config::DayWindow;
pub use directory::{Directory, Resource, ResourceKind};
pub use error::{BookingError, Error, Result};
pub use flight::{CancelReason, Flight, FlightCategory, FlightId, FlightStatus};
pub use schedule::{BookingRequest, BookingState, Command, FlightEdit, Schedule, SharedSchedule};
pub use time::Time;
