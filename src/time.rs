use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wall-clock time of day as minutes since local midnight.
///
/// Serialized as `"HH:MM"`. Values past `24:00` only appear as computed end
/// times (a window starting late in the day is never clipped).
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("'{0}' is not a HH:MM time")]
    Malformed(String),
    #[error("hour {0} is out of range (0-23)")]
    HourOutOfRange(u32),
    #[error("minute {0} is out of range (0-59)")]
    MinuteOutOfRange(u32),
}

impl Time {
    pub fn hm(hours: u32, minutes: u32) -> Time {
        Time(hours * 60 + minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hours(self) -> u32 {
        self.0 / 60
    }

    /// This time of day on `date`; minutes past 24:00 roll into the next day.
    pub fn at(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + TimeDelta::minutes(i64::from(self.0))
    }

    /// `[a, b)` and `[c, d)` share at least one minute.
    pub fn is_overlapping(time: &(Time, Time), window: &(Time, Time)) -> bool {
        time.0 < window.1 && time.1 > window.0
    }

    /// `9:00 AM` style label.
    pub fn to_12h(self) -> String {
        let hours = self.hours() % 24;
        let period = if hours >= 12 { "PM" } else { "AM" };
        let display = match hours {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        format!("{}:{:02} {}", display, self.0 % 60, period)
    }
}

impl FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeParseError::Malformed(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(malformed());
        }
        let hours: u32 = h.parse().map_err(|_| malformed())?;
        let minutes: u32 = m.parse().map_err(|_| malformed())?;
        if hours > 23 {
            return Err(TimeParseError::HourOutOfRange(hours));
        }
        if minutes > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minutes));
        }
        Ok(Time::hm(hours, minutes))
    }
}

impl TryFrom<String> for Time {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(value: Time) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Saturates at `u32::MAX` minutes, so a sum never lands before `self`.
impl Add<u32> for Time {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        Time(self.0.saturating_add(rhs))
    }
}

/// Minutes between two times of day.
impl Sub<Time> for Time {
    type Output = u32;

    fn sub(self, rhs: Time) -> Self::Output {
        self.0.saturating_sub(rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        assert_eq!(Ok(Time(570)), "09:30".parse::<Time>());
        assert_eq!(Ok(Time(540)), "9:00".parse::<Time>());
        assert_eq!(Ok(Time(0)), "00:00".parse::<Time>());
        assert_eq!(Ok(Time(1439)), "23:59".parse::<Time>());
        assert_eq!("06:05", Time(365).to_string());
        assert_eq!("24:00", Time(MINUTES_PER_DAY).to_string());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(Err(TimeParseError::HourOutOfRange(24)), "24:00".parse::<Time>());
        assert_eq!(Err(TimeParseError::MinuteOutOfRange(60)), "10:60".parse::<Time>());
        assert!(matches!("10".parse::<Time>(), Err(TimeParseError::Malformed(_))));
        assert!(matches!("10:5".parse::<Time>(), Err(TimeParseError::Malformed(_))));
        assert!(matches!("ab:cd".parse::<Time>(), Err(TimeParseError::Malformed(_))));
        assert!(matches!("-1:00".parse::<Time>(), Err(TimeParseError::Malformed(_))));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let booked = (Time::hm(9, 0), Time::hm(10, 0));
        assert!(!Time::is_overlapping(&(Time::hm(10, 0), Time::hm(11, 0)), &booked));
        assert!(!Time::is_overlapping(&(Time::hm(8, 0), Time::hm(9, 0)), &booked));
        assert!(Time::is_overlapping(&(Time::hm(9, 45), Time::hm(10, 15)), &booked));
        assert!(Time::is_overlapping(&(Time::hm(8, 0), Time::hm(12, 0)), &booked));
    }

    #[test]
    fn test_add_saturates_instead_of_wrapping() {
        let start = Time::hm(6, 0);
        assert_eq!(Time::hm(8, 0), start + 120);
        assert_eq!(Time(u32::MAX), start + u32::MAX);
        assert!(start + (u32::MAX - 300) > start);
    }

    #[test]
    fn test_at_combines_with_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let expected = date.and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(expected, Time::hm(9, 30).at(date));
        let next_day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(next_day.and_hms_opt(0, 30, 0).unwrap(), Time::hm(24, 30).at(date));
    }

    #[test]
    fn test_12h_labels() {
        assert_eq!("12:00 AM", Time::hm(0, 0).to_12h());
        assert_eq!("9:30 AM", Time::hm(9, 30).to_12h());
        assert_eq!("12:00 PM", Time::hm(12, 0).to_12h());
        assert_eq!("10:00 PM", Time::hm(22, 0).to_12h());
    }

    #[test]
    fn test_serde_uses_wall_clock_strings() {
        let json = serde_json::to_string(&Time::hm(6, 30)).unwrap();
        assert_eq!("\"06:30\"", json);
        let back: Time = serde_json::from_str("\"21:30\"").unwrap();
        assert_eq!(Time::hm(21, 30), back);
        assert!(serde_json::from_str::<Time>("\"25:00\"").is_err());
    }
}
