//! Error types for calendar-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Unknown recurrence type: {0}")]
    InvalidRecurrence(String),

    #[error("Please enter a title for the event")]
    MissingTitle,

    #[error("Please enter a date for the event")]
    MissingDate,

    /// No event at `index` under `date`. The UI only hands back positions it
    /// just read from the store, so this means the two are out of sync.
    #[error("No event at index {index} on {date}")]
    UnknownEvent { date: String, index: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalendarError {
    /// Whether this error is a form validation failure that should be shown to
    /// the user rather than treated as a bug.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalendarError::MissingTitle
                | CalendarError::MissingDate
                | CalendarError::InvalidDate(_)
                | CalendarError::InvalidTime(_)
                | CalendarError::InvalidRecurrence(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
