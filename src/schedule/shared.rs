use crate::error::BookingError;
use crate::flight::FlightId;
use crate::schedule::schedule::{Command, Schedule};
use chrono::NaiveDateTime;
use std::sync::{Arc, PoisonError, RwLock};

/// A schedule that several threads may query and book against.
///
/// Queries share a read lock. Commands run under the write lock, so a booking
/// re-checks availability and appends without another commit slipping in
/// between.
///
/// Every rule is checked before the store is touched, so a command either
/// applies whole or not at all. A poisoned lock is taken over as is. In debug
/// builds `Schedule::apply` asserts the no-overlap invariant after each
/// change; a panic there means the store was already inconsistent and the
/// flights stay as the failing command left them.
#[derive(Clone)]
pub struct SharedSchedule {
    inner: Arc<RwLock<Schedule>>,
}

impl SharedSchedule {
    pub fn new(schedule: Schedule) -> SharedSchedule {
        SharedSchedule {
            inner: Arc::new(RwLock::new(schedule)),
        }
    }

    pub fn read<R>(&self, query: impl FnOnce(&Schedule) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        query(&guard)
    }

    pub fn apply(&self, command: Command, now: NaiveDateTime) -> Result<FlightId, BookingError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.apply(command, now)
    }
}
