//! Event and recurrence-rule value types, plus their persisted JSON shape.
//!
//! The blob layout is the one the browser widget has always written:
//! camelCase keys, `HH:MM` times, RFC 3339 `createdAt`, and a `recurrence`
//! object whose kind lives under `type`. Optional fields may be absent or
//! `null`; both decode to `None`.

use crate::date_key::DateKey;
use crate::error::{CalendarError, Result};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Color used when an event has none.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// A stored calendar event, anchored on the date-key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    /// Wall-clock start time to the minute. `None` means all-day.
    #[serde(default, with = "wall_time", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    /// An all-day, non-recurring event with the default color.
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            time: None,
            description: None,
            color: DEFAULT_COLOR.to_string(),
            created_at,
            recurrence: None,
        }
    }

    /// Set the start time. Seconds are dropped; stored times are `HH:MM`.
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(whole_minutes(time));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let color = Option::<String>::deserialize(deserializer)?;
    Ok(color
        .filter(|c| !c.is_empty())
        .unwrap_or_else(default_color))
}

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
}

impl RecurrenceKind {
    pub const ALL: [RecurrenceKind; 6] = [
        RecurrenceKind::Daily,
        RecurrenceKind::Weekly,
        RecurrenceKind::Monthly,
        RecurrenceKind::Yearly,
        RecurrenceKind::Weekdays,
        RecurrenceKind::Weekends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Yearly => "yearly",
            RecurrenceKind::Weekdays => "weekdays",
            RecurrenceKind::Weekends => "weekends",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        RecurrenceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalendarError::InvalidRecurrence(s.to_string()))
    }
}

/// A recurrence rule. `start_date` is always the date-key the owning event is
/// stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub start_date: DateKey,
    /// Last date (inclusive) the rule may produce an occurrence on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateKey>,
    /// Stable series identity. Blobs written before series ids existed lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<Uuid>,
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceKind, start_date: DateKey) -> Self {
        Self {
            kind,
            start_date,
            end_date: None,
            series_id: None,
        }
    }

    pub fn with_end_date(mut self, end_date: DateKey) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_series_id(mut self, series_id: Uuid) -> Self {
        self.series_id = Some(series_id);
        self
    }

    /// Whether two rules belong to the same series.
    ///
    /// Rules that both carry a series id are compared by id. Otherwise the
    /// legacy rule applies: same start date means same series.
    pub fn same_series(&self, other: &RecurrenceRule) -> bool {
        match (self.series_id, other.series_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.start_date == other.start_date,
        }
    }
}

/// One entry in a day's event list: either an event stored on that day, or an
/// echo of a recurring event anchored on `original_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    #[serde(flatten)]
    pub event: Event,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_date: Option<DateKey>,
    /// Position in the list stored under the anchor date (the queried date
    /// for stored events, `original_date` for echoes). Edits and deletes go
    /// through this position.
    pub index: usize,
}

impl Occurrence {
    pub fn stored(event: Event, index: usize) -> Self {
        Self {
            event,
            is_recurring: false,
            original_date: None,
            index,
        }
    }

    pub fn echo(event: Event, original_date: DateKey, index: usize) -> Self {
        Self {
            event,
            is_recurring: true,
            original_date: Some(original_date),
            index,
        }
    }

    /// The date-key the underlying event is stored under, given the date that
    /// was queried.
    pub fn anchor(&self, queried: DateKey) -> DateKey {
        self.original_date.unwrap_or(queried)
    }
}

/// Parse a wall-clock time as entered in a time input: `HH:MM`, optionally
/// with seconds (which are dropped).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map(whole_minutes)
        .map_err(|_| CalendarError::InvalidTime(s.to_string()))
}

/// Truncate `time` to the minute, the precision the blob stores.
pub(crate) fn whole_minutes(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Render a time the way the sidebar shows it: `2:05 PM`, `12:30 AM`, or
/// `All day` when there is no time.
pub fn display_time(time: Option<NaiveTime>) -> String {
    let Some(time) = time else {
        return "All day".to_string();
    };
    let (is_pm, hour12) = time.hour12();
    let period = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour12, time.minute(), period)
}

/// Serde adapter for `Option<NaiveTime>` stored as `HH:MM`.
mod wall_time {
    use super::parse_time;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => parse_time(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
