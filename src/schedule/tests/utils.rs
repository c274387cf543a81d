use crate::aircraft::Aircraft;
use crate::config::DayWindow;
use crate::directory::{Directory, Resource};
use crate::flight::FlightId;
use crate::instructor::Instructor;
use crate::schedule::booking::BookingRequest;
use crate::schedule::schedule::{Command, Schedule};
use crate::time::Time;
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn aircraft(aircraft_id: &str, registration: &str) -> Aircraft {
    Aircraft {
        id: id(aircraft_id),
        registration: id(registration),
        kind: "Cessna 172".to_string(),
        name: String::new(),
    }
}

pub fn instructor(instructor_id: &str, name: &str, authorized: &[&str]) -> Instructor {
    Instructor {
        id: id(instructor_id),
        name: name.to_string(),
        certifications: vec!["CFI".to_string()],
        authorized_aircraft: authorized.iter().map(|r| id(r)).collect(),
    }
}

pub fn ac(registration: &str) -> Resource {
    Resource::Aircraft(id(registration))
}

pub fn ins(instructor_id: &str) -> Resource {
    Resource::Instructor(id(instructor_id))
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, day).unwrap()
}

pub fn t(text: &str) -> Time {
    text.parse().unwrap()
}

/// A moment well before every date the tests book on.
pub fn now() -> NaiveDateTime {
    date(1).and_hms_opt(8, 0, 0).unwrap()
}

/// Two aircraft and three instructors. Ann flies both, Bob only N2, Cid nothing.
pub fn flight_school() -> Schedule {
    let directory = Directory::new(
        vec![aircraft("1", "N1"), aircraft("2", "N2")],
        vec![
            instructor("1", "Ann", &["N1", "N2"]),
            instructor("2", "Bob", &["N2"]),
            instructor("3", "Cid", &[]),
        ],
    )
    .unwrap();
    Schedule::new(directory, DayWindow::default())
}

pub fn request(day: u32, start: &str, end: &str, registration: &str, instructor: &str) -> BookingRequest {
    BookingRequest::new(date(day), t(start), t(end), registration, instructor)
}

pub fn book(
    schedule: &mut Schedule,
    day: u32,
    start: &str,
    end: &str,
    registration: &str,
    instructor: &str,
) -> FlightId {
    schedule
        .apply(Command::Book(request(day, start, end, registration, instructor)), now())
        .unwrap()
}

pub fn arb_registration() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("N1"), Just("N2")]
}

pub fn arb_instructor() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("1"), Just("2"), Just("3")]
}

/// A booking on 2030-06-02 or 03 between 06:00 and 22:00, 15-minute aligned.
pub fn arb_request() -> impl Strategy<Value = BookingRequest> {
    (
        2..4u32,
        0..60u32,
        1..16u32,
        arb_registration(),
        arb_instructor(),
    )
        .prop_map(|(day, slot, len, registration, instructor)| {
            let start = Time::hm(6, 0) + slot * 15;
            BookingRequest::new(date(day), start, start + len * 15, registration, instructor)
        })
}
