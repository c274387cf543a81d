use crate::aircraft::Aircraft;
use crate::config::DayWindow;
use crate::directory::{Directory, Resource};
use crate::error::{BookingError, Error, Result};
use crate::flight::{
    CancelReason, Flight, FlightCategory, FlightId, FlightKind, FlightStatus,
};
use crate::instructor::Instructor;
use crate::schedule::availability;
use crate::schedule::booking::{
    BookingRequest, ValidBooking, check_placement, resolve_aircraft, resolve_instructor, validate,
};
use crate::schedule::slots::{self, Window};
use crate::schedule::store::ReservationStore;
use crate::time::Time;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::path::Path;

/// Every change to the reservations goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Book(BookingRequest),
    Cancel {
        flight: FlightId,
        reason: CancelReason,
        comments: Option<String>,
    },
    Edit {
        flight: FlightId,
        changes: FlightEdit,
    },
    Complete {
        flight: FlightId,
        hobbs: f64,
    },
}

/// Fields of a scheduled flight that may be changed. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightEdit {
    pub start: Option<Time>,
    pub end: Option<Time>,
    pub aircraft: Option<String>,
    pub instructor: Option<String>,
    pub category: Option<FlightCategory>,
}

/// A flight as it appears in a scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFlight {
    pub date: NaiveDate,
    pub start: Time,
    pub end: Time,
    pub aircraft: String,
    /// Instructor id or display name.
    pub instructor: String,
    #[serde(default = "default_student")]
    pub student: String,
    #[serde(default)]
    pub kind: FlightKind,
    #[serde(default)]
    pub category: FlightCategory,
    #[serde(default = "default_status")]
    pub status: FlightStatus,
}

fn default_student() -> String {
    "You".to_string()
}

fn default_status() -> FlightStatus {
    FlightStatus::Scheduled
}

pub struct Schedule {
    directory: Directory,
    store: ReservationStore,
    day: DayWindow,
}

impl Schedule {
    pub fn new(directory: Directory, day: DayWindow) -> Schedule {
        Schedule {
            directory,
            store: ReservationStore::new(),
            day,
        }
    }

    /// Builds a schedule from existing flights. Each active seed must fit the
    /// same range, availability and authorization rules a booking does; the
    /// past-date rule is not applied.
    pub fn with_flights(directory: Directory, day: DayWindow, seeds: Vec<SeedFlight>) -> Result<Schedule> {
        day.validate()?;
        let mut schedule = Schedule::new(directory, day);
        for (index, seed) in seeds.into_iter().enumerate() {
            schedule
                .seed(seed)
                .map_err(|source| Error::Scenario { index, source })?;
        }
        log::debug!("Seeded {} flights", schedule.store.len());
        schedule.assert_invariants();
        Ok(schedule)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            #[serde(default)]
            day: DayWindow,
            aircraft: Vec<Aircraft>,
            instructors: Vec<Instructor>,
            #[serde(default)]
            flights: Vec<SeedFlight>,
        }
        let raw: RawData = serde_json::from_str(&data)?;
        log::info!(
            "Loaded {} aircraft, {} instructors and {} flights from {}",
            raw.aircraft.len(),
            raw.instructors.len(),
            raw.flights.len(),
            path.display()
        );

        let directory = Directory::new(raw.aircraft, raw.instructors)?;
        Schedule::with_flights(directory, raw.day, raw.flights)
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn day(&self) -> &DayWindow {
        &self.day
    }

    pub fn set_day(&mut self, day: DayWindow) -> Result<()> {
        day.validate()?;
        self.day = day;
        Ok(())
    }

    pub fn is_available(&self, resource: &Resource, instant: Time, date: NaiveDate) -> bool {
        availability::is_available(resource, instant, date, &self.store)
    }

    pub fn is_available_for_range(
        &self,
        resource: &Resource,
        start: Time,
        end: Time,
        date: NaiveDate,
    ) -> bool {
        availability::is_available_for_range(resource, start, end, date, &self.store)
    }

    pub fn all_available(&self, resources: &[Resource], start: Time, end: Time, date: NaiveDate) -> bool {
        availability::all_available(resources, start, end, date, &self.store)
    }

    pub fn available_counterparts(
        &self,
        pivot: &Resource,
        start: Time,
        end: Time,
        date: NaiveDate,
    ) -> Vec<Resource> {
        availability::available_counterparts(pivot, start, end, date, &self.store, &self.directory)
    }

    /// Open windows for `resources`, defaulting to the configured booking length.
    pub fn find_open_windows(
        &self,
        resources: &[Resource],
        date: NaiveDate,
        duration: Option<u32>,
    ) -> Vec<Window> {
        let duration = duration.unwrap_or(self.day.default_duration);
        slots::find_open_windows(resources, date, duration, &self.day, &self.store)
    }

    /// Applies a command atomically: either every check passes and the store
    /// changes, or nothing changes and the failed rule is returned.
    pub fn apply(&mut self, command: Command, now: NaiveDateTime) -> std::result::Result<FlightId, BookingError> {
        let result = match command {
            Command::Book(request) => self.book(&request, now),
            Command::Cancel {
                flight,
                reason,
                comments,
            } => self.cancel(flight, reason, comments),
            Command::Edit { flight, changes } => self.edit(flight, changes),
            Command::Complete { flight, hobbs } => self.complete(flight, hobbs),
        };
        match &result {
            Ok(_) => self.assert_invariants(),
            Err(err) => log::warn!("Rejected: {}", err),
        }
        result
    }

    fn book(&mut self, request: &BookingRequest, now: NaiveDateTime) -> std::result::Result<FlightId, BookingError> {
        let booking = validate(request, &self.directory, &self.store, now)?;
        let id = self.insert(booking, FlightStatus::Scheduled);
        if let Some(flight) = self.store.get(id) {
            log::info!(
                "Booked {} on {} {}-{} with {} and {}",
                flight.id,
                flight.date,
                flight.start,
                flight.end,
                flight.aircraft,
                flight.instructor
            );
        }
        Ok(id)
    }

    fn cancel(
        &mut self,
        id: FlightId,
        reason: CancelReason,
        comments: Option<String>,
    ) -> std::result::Result<FlightId, BookingError> {
        let flight = self.store.get_mut(id).ok_or(BookingError::UnknownFlight(id))?;
        match flight.status {
            FlightStatus::Scheduled => {}
            FlightStatus::Cancelled { .. } => return Err(BookingError::AlreadyCancelled(id)),
            FlightStatus::Completed { .. } => return Err(BookingError::NotScheduled(id)),
        }
        flight.status = FlightStatus::Cancelled {
            reason,
            comments: comments
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };
        log::info!("Cancelled {} ({})", id, reason);
        Ok(id)
    }

    fn edit(&mut self, id: FlightId, changes: FlightEdit) -> std::result::Result<FlightId, BookingError> {
        let current = self.store.get(id).ok_or(BookingError::UnknownFlight(id))?;
        match current.status {
            FlightStatus::Scheduled => {}
            FlightStatus::Cancelled { .. } => return Err(BookingError::AlreadyCancelled(id)),
            FlightStatus::Completed { .. } => return Err(BookingError::NotScheduled(id)),
        }

        let aircraft = match changes.aircraft.as_deref() {
            Some(key) => resolve_aircraft(&self.directory, Some(key))?,
            None => current.aircraft.clone(),
        };
        let instructor = match changes.instructor.as_deref() {
            Some(key) => resolve_instructor(&self.directory, Some(key))?,
            None => current.instructor.clone(),
        };
        let candidate = ValidBooking {
            date: current.date,
            start: changes.start.unwrap_or(current.start),
            end: changes.end.unwrap_or(current.end),
            aircraft,
            instructor,
            student: current.student.clone(),
            kind: current.kind,
            category: changes.category.unwrap_or(current.category),
        };
        check_placement(&candidate, &self.directory, &self.store, Some(id))?;

        if let Some(flight) = self.store.get_mut(id) {
            flight.start = candidate.start;
            flight.end = candidate.end;
            flight.aircraft = candidate.aircraft;
            flight.instructor = candidate.instructor;
            flight.category = candidate.category;
            log::info!("Edited {} to {}-{}", id, flight.start, flight.end);
        }
        Ok(id)
    }

    fn complete(&mut self, id: FlightId, hobbs: f64) -> std::result::Result<FlightId, BookingError> {
        if !hobbs.is_finite() || hobbs < 0.0 {
            return Err(BookingError::InvalidInput {
                field: "hobbs",
                reason: format!("{} is not a flight time", hobbs),
            });
        }
        let flight = self.store.get_mut(id).ok_or(BookingError::UnknownFlight(id))?;
        if let FlightStatus::Cancelled { .. } = flight.status {
            return Err(BookingError::AlreadyCancelled(id));
        }
        flight.status = FlightStatus::Completed { hobbs };
        log::info!("Logged {:.1} hobbs hours on {}", hobbs, id);
        Ok(id)
    }

    fn seed(&mut self, seed: SeedFlight) -> std::result::Result<FlightId, BookingError> {
        let booking = ValidBooking {
            date: seed.date,
            start: seed.start,
            end: seed.end,
            aircraft: resolve_aircraft(&self.directory, Some(&seed.aircraft))?,
            instructor: resolve_instructor(&self.directory, Some(&seed.instructor))?,
            student: seed.student,
            kind: seed.kind,
            category: seed.category,
        };
        if seed.status.is_active() {
            check_placement(&booking, &self.directory, &self.store, None)?;
        } else if booking.start >= booking.end {
            return Err(BookingError::InvalidInput {
                field: "end",
                reason: format!("{} is not after start {}", booking.end, booking.start),
            });
        }
        Ok(self.insert(booking, seed.status))
    }

    fn insert(&mut self, booking: ValidBooking, status: FlightStatus) -> FlightId {
        self.store.insert(|id| Flight {
            id,
            date: booking.date,
            start: booking.start,
            end: booking.end,
            aircraft: booking.aircraft,
            instructor: booking.instructor,
            student: booking.student,
            kind: booking.kind,
            category: booking.category,
            status,
        })
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        debug_assert!(
            self.store.iter().all(|f| f.start < f.end),
            "Start < end invariant violated"
        );

        let active = self
            .store
            .iter()
            .filter(|f| f.status.is_active())
            .collect::<Vec<_>>();
        for (i, a) in active.iter().enumerate() {
            for b in active.iter().skip(i + 1) {
                if a.date != b.date || !Time::is_overlapping(&a.span(), &b.span()) {
                    continue;
                }
                debug_assert!(
                    a.aircraft != b.aircraft,
                    "Aircraft {} double-booked by {} and {}",
                    a.aircraft,
                    a.id,
                    b.id
                );
                debug_assert!(
                    a.instructor != b.instructor,
                    "Instructor {} double-booked by {} and {}",
                    a.instructor,
                    a.id,
                    b.id
                );
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}
