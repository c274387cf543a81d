use crate::config::DayWindow;
use crate::directory::Directory;
use crate::error::{BookingError, Error};
use crate::flight::{CancelReason, FlightId, FlightStatus};
use crate::schedule::schedule::{Schedule, SeedFlight};
use crate::schedule::tests::utils::{ac, aircraft, date, id, instructor, t};

fn directory() -> Directory {
    Directory::new(
        vec![aircraft("1", "N1")],
        vec![instructor("1", "Ann", &["N1"]), instructor("2", "Bob", &[])],
    )
    .unwrap()
}

fn seeds(json: &str) -> Vec<SeedFlight> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_seeds_load_with_defaults() {
    let flights = seeds(
        r#"[
            {"date": "2030-06-02", "start": "10:00", "end": "12:00", "aircraft": "N1", "instructor": "Ann"},
            {"date": "2030-06-02", "start": "11:00", "end": "12:00", "aircraft": "N1", "instructor": "1",
             "status": {"state": "cancelled", "reason": "weather"}},
            {"date": "2030-06-03", "start": "8:00", "end": "9:30", "aircraft": "N1", "instructor": "1",
             "category": "bfr", "status": {"state": "completed", "hobbs": 1.4}}
        ]"#,
    );

    let schedule = Schedule::with_flights(directory(), DayWindow::default(), flights).unwrap();

    let store = schedule.store();
    assert_eq!(3, store.len());
    let first = store.get(FlightId(1)).unwrap();
    assert_eq!(id("1"), first.instructor);
    assert_eq!("You", first.student);
    assert_eq!(
        FlightStatus::Cancelled {
            reason: CancelReason::Weather,
            comments: None
        },
        store.get(FlightId(2)).unwrap().status
    );
    assert_eq!(t("08:00"), store.get(FlightId(3)).unwrap().start);
    assert!(!schedule.is_available(&ac("N1"), t("11:00"), date(2)));
}

#[test]
fn test_conflicting_seed_names_its_index() {
    let flights = seeds(
        r#"[
            {"date": "2030-06-02", "start": "10:00", "end": "12:00", "aircraft": "N1", "instructor": "1"},
            {"date": "2030-06-02", "start": "11:00", "end": "13:00", "aircraft": "N1", "instructor": "1"}
        ]"#,
    );

    let result = Schedule::with_flights(directory(), DayWindow::default(), flights);

    match result {
        Err(Error::Scenario { index, source }) => {
            assert_eq!(1, index);
            assert_eq!(
                BookingError::ResourceConflict {
                    resource: ac("N1"),
                    flight: FlightId(1)
                },
                source
            );
        }
        other => panic!("expected scenario error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unauthorized_seed_is_rejected() {
    let flights = seeds(
        r#"[{"date": "2030-06-02", "start": "10:00", "end": "12:00", "aircraft": "N1", "instructor": "Bob"}]"#,
    );

    let result = Schedule::with_flights(directory(), DayWindow::default(), flights);

    assert!(matches!(
        result,
        Err(Error::Scenario {
            index: 0,
            source: BookingError::AuthorizationMismatch { .. }
        })
    ));
}

#[test]
fn test_bad_day_window_is_rejected() {
    let day = DayWindow {
        start: t("22:00"),
        end: t("06:00"),
        ..DayWindow::default()
    };

    assert!(matches!(
        Schedule::with_flights(directory(), day, vec![]),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_load_bundled_scenario() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/default.json");

    let schedule = Schedule::load_from_file(&path).unwrap();

    assert!(!schedule.directory().aircraft().is_empty());
    assert!(!schedule.directory().instructors().is_empty());
    assert!(schedule.store().iter().all(|f| f.start < f.end));
}

#[test]
fn test_missing_scenario_file_is_io_error() {
    let result = Schedule::load_from_file(std::path::Path::new("does/not/exist.json"));

    assert!(matches!(result, Err(Error::Io(_))));
}
