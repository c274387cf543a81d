//! Conflict detection over a reservation snapshot.
//!
//! Everything here is a pure read of the store. Occupancy is decided with
//! continuous half-open interval arithmetic on `[start, end)`; a flight ending
//! at 10:00 never conflicts with one starting at 10:00.

use crate::directory::{Directory, Resource};
use crate::flight::{Flight, FlightId};
use crate::schedule::store::ReservationStore;
use crate::time::Time;
use chrono::NaiveDate;

/// `resource` is not inside any active reservation at `instant`.
pub fn is_available(
    resource: &Resource,
    instant: Time,
    date: NaiveDate,
    store: &ReservationStore,
) -> bool {
    !store
        .touching(resource, date)
        .any(|f| f.start <= instant && instant < f.end)
}

/// First active reservation of `resource` overlapping `[start, end)`, ignoring `exclude`.
pub fn conflicting_flight<'s>(
    resource: &Resource,
    start: Time,
    end: Time,
    date: NaiveDate,
    store: &'s ReservationStore,
    exclude: Option<FlightId>,
) -> Option<&'s Flight> {
    let conflict = store
        .touching(resource, date)
        .filter(|f| Some(f.id) != exclude)
        .find(|f| Time::is_overlapping(&(start, end), &f.span()));
    if let Some(flight) = conflict {
        log::debug!(
            "{} busy {}-{} on {}: held by {} ({}-{})",
            resource,
            start,
            end,
            date,
            flight.id,
            flight.start,
            flight.end
        );
    }
    conflict
}

pub fn is_available_for_range(
    resource: &Resource,
    start: Time,
    end: Time,
    date: NaiveDate,
    store: &ReservationStore,
) -> bool {
    conflicting_flight(resource, start, end, date, store, None).is_none()
}

/// Every resource is free for the whole range. Aircraft and instructors may be mixed.
pub fn all_available(
    resources: &[Resource],
    start: Time,
    end: Time,
    date: NaiveDate,
    store: &ReservationStore,
) -> bool {
    resources
        .iter()
        .all(|r| is_available_for_range(r, start, end, date, store))
}

/// Resources of the other kind that are free for `[start, end)` and may be
/// paired with `pivot`, in directory order.
pub fn available_counterparts(
    pivot: &Resource,
    start: Time,
    end: Time,
    date: NaiveDate,
    store: &ReservationStore,
    directory: &Directory,
) -> Vec<Resource> {
    if !directory.contains(pivot) {
        log::debug!("No counterparts for unknown {}", pivot);
        return vec![];
    }

    let candidates = match pivot {
        Resource::Aircraft(registration) => directory
            .instructors()
            .iter()
            .filter(|i| i.is_authorized_for(registration))
            .map(|i| Resource::Instructor(i.id.clone()))
            .collect::<Vec<_>>(),
        Resource::Instructor(id) => match directory.instructor(id) {
            Some(instructor) => directory
                .aircraft()
                .iter()
                .filter(|a| instructor.is_authorized_for(&a.registration))
                .map(|a| Resource::Aircraft(a.registration.clone()))
                .collect(),
            None => vec![],
        },
    };

    candidates
        .into_iter()
        .filter(|r| is_available_for_range(r, start, end, date, store))
        .collect()
}
