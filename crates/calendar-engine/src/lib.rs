//! # calendar-engine
//!
//! Event storage and recurrence expansion for a month-grid calendar widget.
//!
//! Events live in a map from calendar date to the events anchored on that
//! date, persisted as a single JSON blob in a key-value backend. Recurring
//! events (daily, weekly, monthly, yearly, weekdays, weekends) are expanded on
//! demand: asking for a date returns the events stored on it followed by the
//! recurring events from other dates whose rule matches.
//!
//! ## Quick start
//!
//! ```rust
//! use calendar_engine::{
//!     events_for_display, DateKey, EventDraft, EventStore, FixedClock, MemoryBackend,
//!     RecurrenceKind, SaveTarget, StoreConfig,
//! };
//!
//! let mut store = EventStore::open(MemoryBackend::new(), StoreConfig::default());
//! let monday: DateKey = "2024-01-01".parse().unwrap();
//! let clock = FixedClock::on(monday.date());
//!
//! let draft = EventDraft::new("Standup", "2024-01-01")
//!     .time("09:30")
//!     .repeat(RecurrenceKind::Weekly, "");
//! store.save_event(SaveTarget::Create, &draft, &clock).unwrap();
//!
//! let next_monday: DateKey = "2024-01-08".parse().unwrap();
//! let day = events_for_display(next_monday, store.events());
//! assert_eq!(day.len(), 1);
//! assert!(day[0].is_recurring);
//! ```
//!
//! ## Modules
//!
//! - [`date_key`]: `YYYY-MM-DD` storage keys
//! - [`event`]: events, recurrence rules, query results
//! - [`draft`]: event-dialog input and save targets
//! - [`store`]: the persisted event map and its mutations
//! - [`recurrence`]: rule matching, merging and display order
//! - [`month`]: month grid model
//! - [`storage`]: key-value backends
//! - [`clock`]: current date sources
//! - [`config`]: store configuration
//! - [`error`]: error types

pub mod clock;
pub mod config;
pub mod date_key;
pub mod draft;
pub mod error;
pub mod event;
pub mod month;
pub mod recurrence;
pub mod storage;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StoreConfig;
pub use date_key::DateKey;
pub use draft::{EventDraft, RecurrenceDraft, SaveTarget};
pub use error::CalendarError;
pub use event::{display_time, Event, Occurrence, RecurrenceKind, RecurrenceRule, DEFAULT_COLOR};
pub use month::MonthView;
pub use recurrence::{events_for_display, matches, occurrences_on, sort_for_display};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{DeleteMode, EventMap, EventStore};
