use crate::config::DayWindow;
use crate::directory::Resource;
use crate::flight::FlightId;
use crate::schedule::availability::all_available;
use crate::schedule::store::ReservationStore;
use crate::time::Time;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: Time,
    pub end: Time,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Candidate start times `day_start <= t < day_end`, `granularity` minutes apart.
pub fn generate_slots(day_start: Time, day_end: Time, granularity: u32) -> Vec<Time> {
    if granularity == 0 {
        return vec![];
    }
    (day_start.minutes()..day_end.minutes())
        .step_by(granularity as usize)
        .map(Time)
        .collect()
}

/// Slot starts where every resource is free for `duration` minutes.
///
/// Windows starting near the end of the day may run past it.
pub fn find_open_windows(
    resources: &[Resource],
    date: NaiveDate,
    duration: u32,
    day: &DayWindow,
    store: &ReservationStore,
) -> Vec<Window> {
    generate_slots(day.start, day.end, day.granularity)
        .into_iter()
        .map(|start| Window {
            start,
            end: start + duration,
        })
        .filter(|w| all_available(resources, w.start, w.end, date, store))
        .collect()
}

/// End times a booking starting at `start` may pick: one slot later up to the end of the day.
pub fn end_time_options(start: Time, day: &DayWindow) -> Vec<Time> {
    if day.granularity == 0 {
        return vec![];
    }
    ((start.minutes() + day.granularity)..=day.end.minutes())
        .step_by(day.granularity as usize)
        .map(Time)
        .collect()
}

pub fn is_slot_in_past(date: NaiveDate, slot: Time, now: NaiveDateTime) -> bool {
    slot.at(date) < now
}

/// Samples each slot of the day and reports which flight, if any, holds
/// `resource` at that instant. Meant for drawing grids only: a flight that
/// starts and ends between two samples does not show up.
pub fn occupancy(
    resource: &Resource,
    date: NaiveDate,
    day: &DayWindow,
    store: &ReservationStore,
) -> Vec<(Time, Option<FlightId>)> {
    let held = store.touching(resource, date).collect::<Vec<_>>();
    generate_slots(day.start, day.end, day.granularity)
        .into_iter()
        .map(|slot| {
            let flight = held
                .iter()
                .find(|f| f.start <= slot && slot < f.end)
                .map(|f| f.id);
            (slot, flight)
        })
        .collect()
}
