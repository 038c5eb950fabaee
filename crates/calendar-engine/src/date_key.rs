//! Calendar date keys -- the `YYYY-MM-DD` strings events are stored under.
//!
//! The browser date API hands out 0-based months while the key is 1-based, so
//! constructors that take a month are explicit about which convention they use.

use crate::error::{CalendarError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A local wall-clock calendar date used as a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Build a key from a year, a **0-based** month and a day of month.
    ///
    /// ```
    /// use calendar_engine::DateKey;
    ///
    /// let key = DateKey::from_ymd0(2024, 0, 5).unwrap();
    /// assert_eq!(key.to_string(), "2024-01-05");
    /// ```
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDate` when the components do not name a
    /// real date or the year falls outside `1..=9999`.
    pub fn from_ymd0(year: i32, month0: u32, day: u32) -> Result<Self> {
        let month = month0
            .checked_add(1)
            .ok_or_else(|| CalendarError::InvalidDate(format!("{}-{}-{}", year, month0, day)))?;
        Self::from_ymd(year, month, day)
    }

    /// Build a key from a year, a 1-based month and a day of month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1..=9999).contains(&year) {
            return Err(CalendarError::InvalidDate(format!(
                "{}-{}-{}",
                year, month, day
            )));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(DateKey)
            .ok_or_else(|| CalendarError::InvalidDate(format!("{}-{}-{}", year, month, day)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month, as written in the key.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// 0-based month, as the browser date API expects it.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = CalendarError;

    /// Parse a strict `YYYY-MM-DD` key. Unpadded components are rejected so that
    /// every key has exactly one text form.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CalendarError::InvalidDate(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !digits_ok {
            return Err(invalid());
        }

        let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..7].parse().map_err(|_| invalid())?;
        let day: u32 = s[8..10].parse().map_err(|_| invalid())?;
        DateKey::from_ymd(year, month, day).map_err(|_| invalid())
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
