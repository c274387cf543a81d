use crate::flight::FlightId;
use crate::schedule::booking::BookingRequest;
use crate::schedule::schedule::Command;
use crate::schedule::shared::SharedSchedule;
use crate::schedule::tests::utils::{ac, date, flight_school, now, request, t};
use std::thread;

#[test]
fn test_one_of_many_racing_bookings_wins() {
    let shared = SharedSchedule::new(flight_school());

    let results = thread::scope(|scope| {
        let handles = (0..8)
            .map(|_| {
                let shared = shared.clone();
                scope.spawn(move || {
                    shared.apply(Command::Book(request(2, "10:00", "12:00", "N2", "2")), now())
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(1, results.iter().filter(|r| r.is_ok()).count());
    assert_eq!(1, shared.read(|s| s.store().len()));
}

#[test]
fn test_disjoint_bookings_all_commit() {
    let shared = SharedSchedule::new(flight_school());
    let starts = ["06:00", "08:00", "10:00", "12:00", "14:00", "16:00"];

    thread::scope(|scope| {
        for start in starts {
            let shared = shared.clone();
            scope.spawn(move || {
                let request = BookingRequest::new(date(2), t(start), t(start) + 120, "N2", "2");
                shared.apply(Command::Book(request), now()).unwrap();
            });
        }
    });

    let (len, free) = shared.read(|s| {
        (
            s.store().len(),
            s.is_available_for_range(&ac("N2"), t("06:00"), t("18:00"), date(2)),
        )
    });
    assert_eq!(starts.len(), len);
    assert!(!free);
    assert!(shared.read(|s| s.store().get(FlightId(6)).is_some()));
}
