pub mod availability;
pub mod booking;
#[allow(clippy::module_inception)]
pub mod schedule;
pub mod shared;
pub mod slots;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use booking::{BookingRequest, BookingState};
pub use schedule::{Command, FlightEdit, Schedule, SeedFlight};
pub use shared::SharedSchedule;
pub use slots::Window;
pub use store::ReservationStore;
