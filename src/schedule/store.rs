use crate::directory::Resource;
use crate::flight::{Flight, FlightId, FlightStatus};
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Owns every flight. Read access is public; writes go through `Schedule::apply`.
#[derive(Debug, Default)]
pub struct ReservationStore {
    flights: Vec<Flight>,
    flights_index: HashMap<FlightId, usize>,
    next_id: u64,
}

impl ReservationStore {
    pub fn new() -> ReservationStore {
        ReservationStore {
            flights: vec![],
            flights_index: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// All flights in creation order, cancelled ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Flight> {
        self.flights.iter()
    }

    pub fn get(&self, id: FlightId) -> Option<&Flight> {
        self.flights_index.get(&id).map(|idx| &self.flights[*idx])
    }

    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Flight> {
        self.flights.iter().filter(move |f| f.date == date)
    }

    /// Non-cancelled flights holding `resource` on `date`.
    pub fn touching<'s>(
        &'s self,
        resource: &Resource,
        date: NaiveDate,
    ) -> impl Iterator<Item = &'s Flight> {
        self.flights
            .iter()
            .filter(move |f| f.date == date && f.status.is_active() && f.occupies(resource))
    }

    pub(crate) fn insert(&mut self, build: impl FnOnce(FlightId) -> Flight) -> FlightId {
        let id = FlightId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        let flight = build(id);
        debug_assert_eq!(id, flight.id);
        self.flights_index.insert(id, self.flights.len());
        self.flights.push(flight);
        id
    }

    pub(crate) fn get_mut(&mut self, id: FlightId) -> Option<&mut Flight> {
        let idx = *self.flights_index.get(&id)?;
        self.flights.get_mut(idx)
    }

    /// Scheduled flights from `today` on, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Flight> {
        let mut flights = self
            .flights
            .iter()
            .filter(|f| f.date >= today && f.status.is_scheduled())
            .collect::<Vec<_>>();
        flights.sort_by_key(|f| (f.date, f.start, f.id));
        flights
    }

    /// Everything that is not upcoming, most recent first.
    pub fn history(&self, today: NaiveDate) -> Vec<&Flight> {
        let mut flights = self
            .flights
            .iter()
            .filter(|f| f.date < today || !f.status.is_scheduled())
            .collect::<Vec<_>>();
        flights.sort_by_key(|f| Reverse((f.date, f.start, f.id)));
        flights
    }

    /// Completed hobbs hours plus hours flown before they were tracked here.
    pub fn logged_hours(&self, previous_experience: f64) -> f64 {
        self.flights
            .iter()
            .filter_map(|f| match f.status {
                FlightStatus::Completed { hobbs } => Some(hobbs),
                _ => None,
            })
            .sum::<f64>()
            + previous_experience
    }
}
