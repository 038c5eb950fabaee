//! Month grid model -- what the calendar view draws for one month.
//!
//! The grid is Sunday-first. It starts with blank cells for the weekdays
//! before the 1st, followed by one cell per day.

use crate::date_key::DateKey;
use crate::error::{CalendarError, Result};
use crate::recurrence::occurrences_on;
use crate::store::EventMap;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A day cell shows at most this many color dots before collapsing the rest
/// into a "more" marker.
pub const MAX_PREVIEW_DOTS: usize = 3;

/// One day of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: DateKey,
    pub day: u32,
    pub is_today: bool,
    /// Stored events plus recurrence echoes.
    pub event_count: usize,
    /// Colors of the first few events, in query order.
    pub preview_colors: Vec<String>,
    /// More events than preview dots.
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    /// 0-based month.
    pub month0: u32,
    pub title: String,
    /// Blank cells before the 1st (Sunday = 0).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthView {
    /// Build the grid for `year` / `month0` (0-based).
    ///
    /// # Errors
    /// `InvalidDate` if the month is out of range.
    pub fn build(year: i32, month0: u32, events: &EventMap, today: NaiveDate) -> Result<Self> {
        let first = DateKey::from_ymd0(year, month0, 1)?;
        let title = month_title(month0)
            .ok_or_else(|| CalendarError::InvalidDate(format!("month {}", month0)))?;

        let days = first
            .date()
            .iter_days()
            .take_while(|d| d.month0() == month0)
            .map(|d| {
                let date = DateKey::from(d);
                let occurrences = occurrences_on(date, events);
                let preview_colors = occurrences
                    .iter()
                    .take(MAX_PREVIEW_DOTS)
                    .map(|o| o.event.color.clone())
                    .collect();
                DayCell {
                    date,
                    day: d.day(),
                    is_today: d == today,
                    event_count: occurrences.len(),
                    preview_colors,
                    has_more: occurrences.len() > MAX_PREVIEW_DOTS,
                }
            })
            .collect();

        Ok(Self {
            year,
            month0,
            title: title.to_string(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    /// The view for the month containing `today`.
    pub fn current(events: &EventMap, today: NaiveDate) -> Result<Self> {
        Self::build(today.year(), today.month0(), events, today)
    }

    /// Days that have at least one event.
    pub fn busy_days(&self) -> impl Iterator<Item = &DayCell> {
        self.days.iter().filter(|cell| cell.event_count > 0)
    }
}

/// English month name for a 0-based month.
pub fn month_title(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

/// Move `delta` months from `year` / `month0`, carrying into the year.
///
/// ```
/// use calendar_engine::month::shift_month;
///
/// assert_eq!(shift_month(2024, 0, -1), (2023, 11));
/// assert_eq!(shift_month(2024, 11, 1), (2025, 0));
/// ```
pub fn shift_month(year: i32, month0: u32, delta: i32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month0) + i64::from(delta);
    let year = total.div_euclid(12) as i32;
    let month0 = total.rem_euclid(12) as u32;
    (year, month0)
}
