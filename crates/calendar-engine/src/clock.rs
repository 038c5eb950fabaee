//! Clock sources for "today" and creation timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Supplies the current date and instant.
pub trait Clock {
    /// Today's local wall-clock date.
    fn today(&self) -> NaiveDate;

    /// The current instant, used for `createdAt` stamps.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock, read through chrono's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to midnight UTC of `today`.
    pub fn on(today: NaiveDate) -> Self {
        Self {
            today,
            now: today.and_time(NaiveTime::default()).and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
