//! Form input for saving an event.
//!
//! An [`EventDraft`] carries the raw field values of the event dialog. It is
//! validated as a whole before the store is touched, so a rejected draft never
//! leaves a partial mutation behind.

use crate::date_key::DateKey;
use crate::error::{CalendarError, Result};
use crate::event::{parse_time, Event, RecurrenceKind, RecurrenceRule};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw event-dialog fields. Empty strings mean "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, or empty for an all-day event.
    pub time: String,
    pub description: String,
    pub color: String,
    /// Present when the "recurring" box is ticked.
    pub recurrence: Option<RecurrenceDraft>,
}

/// Recurrence fields of the event dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDraft {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    /// `YYYY-MM-DD`, or empty for an open-ended series.
    #[serde(default)]
    pub end_date: String,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    /// The dialog contents for editing `event`, stored under `date`.
    pub fn from_event(date: DateKey, event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: date.to_string(),
            time: event
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            description: event.description.clone().unwrap_or_default(),
            color: event.color.clone(),
            recurrence: event.recurrence.as_ref().map(|rule| RecurrenceDraft {
                kind: rule.kind,
                end_date: rule.end_date.map(|d| d.to_string()).unwrap_or_default(),
            }),
        }
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn repeat(mut self, kind: RecurrenceKind, end_date: impl Into<String>) -> Self {
        self.recurrence = Some(RecurrenceDraft {
            kind,
            end_date: end_date.into(),
        });
        self
    }

    /// Validate every field.
    ///
    /// # Errors
    /// `MissingTitle` / `MissingDate` for blank required fields, and
    /// `InvalidDate` / `InvalidTime` for values that do not parse or a series
    /// that ends before it starts.
    pub(crate) fn parse(&self) -> Result<ParsedDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CalendarError::MissingTitle);
        }
        let date_raw = self.date.trim();
        if date_raw.is_empty() {
            return Err(CalendarError::MissingDate);
        }
        let date: DateKey = date_raw.parse()?;

        let time = match self.time.trim() {
            "" => None,
            raw => Some(parse_time(raw)?),
        };

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let color = Some(self.color.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let recurrence = match &self.recurrence {
            None => None,
            Some(draft) => {
                let end_date = match draft.end_date.trim() {
                    "" => None,
                    raw => Some(raw.parse::<DateKey>()?),
                };
                if let Some(end) = end_date {
                    if end < date {
                        return Err(CalendarError::InvalidDate(format!(
                            "recurrence ends on {} before it starts on {}",
                            end, date
                        )));
                    }
                }
                Some((draft.kind, end_date))
            }
        };

        Ok(ParsedDraft {
            date,
            title: title.to_string(),
            time,
            description,
            color,
            recurrence,
        })
    }
}

/// A draft whose fields have all been validated.
#[derive(Debug, Clone)]
pub(crate) struct ParsedDraft {
    pub date: DateKey,
    pub title: String,
    pub time: Option<NaiveTime>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub recurrence: Option<(RecurrenceKind, Option<DateKey>)>,
}

impl ParsedDraft {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Build the stored event. The rule's start date is the draft date.
    pub fn into_event(
        self,
        created_at: DateTime<Utc>,
        series_id: Option<Uuid>,
        default_color: &str,
    ) -> Event {
        let recurrence = self.recurrence.map(|(kind, end_date)| RecurrenceRule {
            kind,
            start_date: self.date,
            end_date,
            series_id,
        });
        Event {
            title: self.title,
            time: self.time,
            description: self.description,
            color: self.color.unwrap_or_else(|| default_color.to_string()),
            created_at,
            recurrence,
        }
    }
}

/// Whether a save creates a new event or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    /// Replace the event at `index` in the list stored under `date`.
    Edit { date: DateKey, index: usize },
}
