use crate::error::{Error, Result};
use crate::time::{MINUTES_PER_DAY, Time};
use serde::{Deserialize, Serialize};

/// Bookable part of the day and the lattice it is cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayWindow {
    pub start: Time,
    pub end: Time,
    /// Slot length in minutes.
    pub granularity: u32,
    /// Length in minutes of a window offered by `find_open_windows`.
    pub default_duration: u32,
}

impl Default for DayWindow {
    fn default() -> Self {
        DayWindow {
            start: Time::hm(6, 0),
            end: Time::hm(22, 0),
            granularity: 30,
            default_duration: 120,
        }
    }
}

impl DayWindow {
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(Error::Config(format!(
                "day starts at {} but ends at {}",
                self.start, self.end
            )));
        }
        if self.end.minutes() > MINUTES_PER_DAY {
            return Err(Error::Config(format!("day end {} is past midnight", self.end)));
        }
        if self.granularity == 0 {
            return Err(Error::Config("slot granularity must be positive".to_string()));
        }
        if self.default_duration == 0 {
            return Err(Error::Config("default duration must be positive".to_string()));
        }
        Ok(())
    }
}
