use crate::flight::{CancelReason, Flight, FlightId};
use crate::schedule::schedule::Command;
use crate::schedule::tests::utils::{book, date, flight_school, now};

fn ids<'a>(flights: impl IntoIterator<Item = &'a Flight>) -> Vec<u64> {
    flights.into_iter().map(|f| f.id.0).collect()
}

#[test]
fn test_ids_follow_creation_order() {
    let mut schedule = flight_school();
    let a = book(&mut schedule, 3, "10:00", "11:00", "N1", "1");
    let b = book(&mut schedule, 2, "10:00", "11:00", "N1", "1");

    assert_eq!((FlightId(1), FlightId(2)), (a, b));
    assert_eq!(vec![1, 2], ids(schedule.store().iter()));
    assert_eq!(vec![2], ids(schedule.store().on(date(2))));
    assert!(schedule.store().get(FlightId(3)).is_none());
}

#[test]
fn test_upcoming_and_history_split() {
    let mut schedule = flight_school();
    let later = book(&mut schedule, 4, "10:00", "11:00", "N1", "1");
    let sooner = book(&mut schedule, 3, "14:00", "15:00", "N1", "1");
    let earliest = book(&mut schedule, 3, "09:00", "10:00", "N2", "2");
    let dropped = book(&mut schedule, 5, "09:00", "10:00", "N2", "2");
    let flown = book(&mut schedule, 2, "09:00", "10:00", "N2", "2");
    schedule
        .apply(
            Command::Cancel {
                flight: dropped,
                reason: CancelReason::ChangeOfPlans,
                comments: None,
            },
            now(),
        )
        .unwrap();

    let today = date(3);
    assert_eq!(
        vec![earliest.0, sooner.0, later.0],
        ids(schedule.store().upcoming(today))
    );
    assert_eq!(vec![dropped.0, flown.0], ids(schedule.store().history(today)));
}

#[test]
fn test_logged_hours_sum_completed_flights() {
    let mut schedule = flight_school();
    let a = book(&mut schedule, 2, "09:00", "10:00", "N2", "2");
    let b = book(&mut schedule, 2, "10:00", "12:00", "N2", "2");
    book(&mut schedule, 2, "12:00", "13:00", "N2", "2");

    schedule.apply(Command::Complete { flight: a, hobbs: 1.1 }, now()).unwrap();
    schedule.apply(Command::Complete { flight: b, hobbs: 2.0 }, now()).unwrap();

    assert!((schedule.store().logged_hours(0.0) - 3.1).abs() < 1e-9);
    assert!((schedule.store().logged_hours(40.5) - 43.6).abs() < 1e-9);
}
