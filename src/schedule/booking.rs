use crate::aircraft::Registration;
use crate::directory::{Directory, Resource};
use crate::error::BookingError;
use crate::flight::{FlightCategory, FlightId, FlightKind};
use crate::instructor::InstructorId;
use crate::schedule::availability::conflicting_flight;
use crate::schedule::schedule::{Command, Schedule};
use crate::schedule::store::ReservationStore;
use crate::time::Time;
use chrono::{NaiveDate, NaiveDateTime};

/// A booking as the caller picked it. Resource keys are unresolved: the
/// instructor may be given by id or by display name.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub date: Option<NaiveDate>,
    pub start: Time,
    pub end: Time,
    pub aircraft: Option<String>,
    pub instructor: Option<String>,
    pub student: String,
    pub kind: FlightKind,
    pub category: FlightCategory,
}

impl BookingRequest {
    pub fn new(
        date: NaiveDate,
        start: Time,
        end: Time,
        aircraft: impl Into<String>,
        instructor: impl Into<String>,
    ) -> BookingRequest {
        BookingRequest {
            date: Some(date),
            start,
            end,
            aircraft: Some(aircraft.into()),
            instructor: Some(instructor.into()),
            student: "You".to_string(),
            kind: FlightKind::default(),
            category: FlightCategory::default(),
        }
    }

    pub fn with_category(mut self, category: FlightCategory) -> BookingRequest {
        self.category = category;
        self
    }
}

/// A request whose resources resolved against the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub date: NaiveDate,
    pub start: Time,
    pub end: Time,
    pub aircraft: Registration,
    pub instructor: InstructorId,
    pub student: String,
    pub kind: FlightKind,
    pub category: FlightCategory,
}

pub fn parse_date(text: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| BookingError::InvalidInput {
        field: "date",
        reason: format!("'{}': {}", text, e),
    })
}

pub(crate) fn resolve_aircraft(
    directory: &Directory,
    key: Option<&str>,
) -> Result<Registration, BookingError> {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| BookingError::missing("aircraft"))?;
    directory
        .aircraft_by_registration(key)
        .map(|a| a.registration.clone())
        .ok_or_else(|| BookingError::UnknownResource(Resource::Aircraft(key.into())))
}

pub(crate) fn resolve_instructor(
    directory: &Directory,
    key: Option<&str>,
) -> Result<InstructorId, BookingError> {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| BookingError::missing("instructor"))?;
    directory
        .resolve_instructor(key)
        .map(|i| i.id.clone())
        .ok_or_else(|| BookingError::UnknownResource(Resource::Instructor(key.into())))
}

/// Checks a new booking against every rule, in order, stopping at the first failure:
/// a future date, known resources, a forward range, a free aircraft, a free
/// instructor, and an authorized pairing.
pub fn validate(
    request: &BookingRequest,
    directory: &Directory,
    store: &ReservationStore,
    now: NaiveDateTime,
) -> Result<ValidBooking, BookingError> {
    let date = request.date.ok_or_else(|| BookingError::missing("date"))?;
    if request.start.at(date) < now {
        return Err(BookingError::PastDateRejected {
            date,
            start: request.start,
        });
    }

    let booking = ValidBooking {
        date,
        start: request.start,
        end: request.end,
        aircraft: resolve_aircraft(directory, request.aircraft.as_deref())?,
        instructor: resolve_instructor(directory, request.instructor.as_deref())?,
        student: request.student.clone(),
        kind: request.kind,
        category: request.category,
    };
    check_placement(&booking, directory, store, None)?;
    Ok(booking)
}

/// Range, availability and authorization checks shared by new bookings,
/// edits (which pass themselves as `exclude`) and seeded flights.
pub(crate) fn check_placement(
    booking: &ValidBooking,
    directory: &Directory,
    store: &ReservationStore,
    exclude: Option<FlightId>,
) -> Result<(), BookingError> {
    if booking.start >= booking.end {
        return Err(BookingError::InvalidInput {
            field: "end",
            reason: format!("{} is not after start {}", booking.end, booking.start),
        });
    }

    for resource in [
        Resource::Aircraft(booking.aircraft.clone()),
        Resource::Instructor(booking.instructor.clone()),
    ] {
        if let Some(flight) = conflicting_flight(
            &resource,
            booking.start,
            booking.end,
            booking.date,
            store,
            exclude,
        ) {
            return Err(BookingError::ResourceConflict {
                resource,
                flight: flight.id,
            });
        }
    }

    if !directory.is_pair_authorized(&booking.aircraft, &booking.instructor) {
        return Err(BookingError::AuthorizationMismatch {
            instructor: directory.display_name(&Resource::Instructor(booking.instructor.clone())),
            aircraft: booking.aircraft.to_string(),
        });
    }
    Ok(())
}

/// Progress of one booking attempt.
///
/// `Empty -> ResourcesChosen -> Validated -> Committed`, with `Rejected`
/// reachable from the two middle states. A transition asked for from the
/// wrong state leaves the attempt where it was.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BookingState {
    #[default]
    Empty,
    ResourcesChosen(BookingRequest),
    Validated {
        request: BookingRequest,
        booking: ValidBooking,
    },
    Committed(FlightId),
    Rejected(BookingError),
}

impl BookingState {
    pub fn choose(self, request: BookingRequest) -> BookingState {
        match self {
            BookingState::Empty | BookingState::ResourcesChosen(_) => {
                BookingState::ResourcesChosen(request)
            }
            other => {
                log::warn!("cannot choose resources for a booking that is {}", other.label());
                other
            }
        }
    }

    pub fn validate(self, schedule: &Schedule, now: NaiveDateTime) -> BookingState {
        match self {
            BookingState::ResourcesChosen(request) => {
                match validate(&request, schedule.directory(), schedule.store(), now) {
                    Ok(booking) => BookingState::Validated { request, booking },
                    Err(err) => BookingState::Rejected(err),
                }
            }
            other => {
                log::warn!("cannot validate a booking that is {}", other.label());
                other
            }
        }
    }

    /// Re-checks against the schedule as it is now and appends the flight.
    pub fn commit(self, schedule: &mut Schedule, now: NaiveDateTime) -> BookingState {
        match self {
            BookingState::Validated { request, .. } => {
                match schedule.apply(Command::Book(request), now) {
                    Ok(id) => BookingState::Committed(id),
                    Err(err) => BookingState::Rejected(err),
                }
            }
            other => {
                log::warn!("cannot commit a booking that is {}", other.label());
                other
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingState::Committed(_) | BookingState::Rejected(_))
    }

    fn label(&self) -> &'static str {
        match self {
            BookingState::Empty => "empty",
            BookingState::ResourcesChosen(_) => "awaiting validation",
            BookingState::Validated { .. } => "validated",
            BookingState::Committed(_) => "committed",
            BookingState::Rejected(_) => "rejected",
        }
    }
}
