//! The event store -- date-keyed event lists persisted as one JSON blob.
//!
//! Every mutation rewrites the whole blob. A missing or unreadable blob loads
//! as an empty store, and a single event that does not decode is dropped on
//! its own; corruption is logged, never surfaced.
//!
//! Invariants held by every mutation:
//! - no date-key maps to an empty list;
//! - a recurring event's `start_date` equals the key it is stored under.

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::date_key::DateKey;
use crate::draft::{EventDraft, SaveTarget};
use crate::error::{CalendarError, Result};
use crate::event::{whole_minutes, Event};
use crate::storage::StorageBackend;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Events keyed by the date they are anchored on.
pub type EventMap = BTreeMap<DateKey, Vec<Event>>;

/// What `delete` removes when the target event is recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Detach this one event from its series; other occurrences stay.
    #[default]
    Instance,
    /// Remove every stored event of the series, on every date.
    Series,
}

/// Read the blob under `key` and decode it.
///
/// Returns an empty map when nothing is stored, when the backend cannot be
/// read, or when the blob is not a JSON object. Inside a readable blob each
/// date and each event is decoded on its own: one that does not decode is
/// logged and skipped, and everything else is kept.
pub fn load<B: StorageBackend + ?Sized>(backend: &B, key: &str) -> EventMap {
    let blob = match backend.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return EventMap::new(),
        Err(e) => {
            warn!(key, error = %e, "could not read stored events, starting empty");
            return EventMap::new();
        }
    };

    let raw = match serde_json::from_str::<serde_json::Map<String, Value>>(&blob) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "stored events are corrupt, starting empty");
            return EventMap::new();
        }
    };

    let mut events = EventMap::new();
    for (date_raw, entries) in raw {
        let date = match date_raw.parse::<DateKey>() {
            Ok(date) => date,
            Err(e) => {
                warn!(key, date = %date_raw, error = %e, "skipping events under a bad date key");
                continue;
            }
        };
        let Value::Array(entries) = entries else {
            warn!(key, %date, "skipping a date whose events are not a list");
            continue;
        };
        let list: Vec<Event> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Event>(entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(key, %date, index, error = %e, "skipping an event that does not decode");
                    None
                }
            })
            .collect();
        if !list.is_empty() {
            events.insert(date, list);
        }
    }
    events
}

/// Serialize the whole map and overwrite the blob under `key`.
///
/// # Errors
/// Returns `CalendarError::Storage` if the backend rejects the write.
pub fn save<B: StorageBackend + ?Sized>(backend: &mut B, key: &str, events: &EventMap) -> Result<()> {
    let blob = serde_json::to_string(events)?;
    backend.set(key, &blob)?;
    debug!(key, dates = events.len(), bytes = blob.len(), "saved events");
    Ok(())
}

/// Owns the event map and the backend it persists to.
#[derive(Debug)]
pub struct EventStore<B: StorageBackend> {
    backend: B,
    config: StoreConfig,
    events: EventMap,
}

impl<B: StorageBackend> EventStore<B> {
    /// Load the store from `backend` under the configured key.
    pub fn open(backend: B, config: StoreConfig) -> Self {
        let events = load(&backend, &config.storage_key);
        debug!(
            key = %config.storage_key,
            dates = events.len(),
            "opened event store"
        );
        Self {
            backend,
            config,
            events,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All stored events by date.
    pub fn events(&self) -> &EventMap {
        &self.events
    }

    /// Events stored under `date`, in stored order. Recurrence echoes from
    /// other dates are not included.
    pub fn events_on(&self, date: DateKey) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, date: DateKey, index: usize) -> Option<&Event> {
        self.events.get(&date).and_then(|list| list.get(index))
    }

    /// Total number of stored events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_inner(self) -> (B, EventMap) {
        (self.backend, self.events)
    }

    /// Write the current map to the backend.
    pub fn persist(&mut self) -> Result<()> {
        save(&mut self.backend, &self.config.storage_key, &self.events)
    }

    /// Append `event` under `date` (`index == None`) or replace the event at
    /// `index`. Returns the position the event now occupies.
    ///
    /// A recurrence rule is re-anchored so its start date is `date`, and the
    /// time is truncated to the minute.
    ///
    /// # Errors
    /// `UnknownEvent` if `index` does not name a stored event; the store is
    /// left unchanged.
    pub fn upsert(&mut self, date: DateKey, index: Option<usize>, event: Event) -> Result<usize> {
        let event = anchored(date, event);
        let position = match index {
            None => {
                let list = self.events.entry(date).or_default();
                list.push(event);
                list.len() - 1
            }
            Some(i) => {
                let slot = self
                    .events
                    .get_mut(&date)
                    .and_then(|list| list.get_mut(i))
                    .ok_or_else(|| unknown(date, i))?;
                *slot = event;
                i
            }
        };
        debug!(%date, index = position, "upserted event");
        self.persist()?;
        Ok(position)
    }

    /// Delete the event at `index` under `date`.
    ///
    /// With [`DeleteMode::Instance`] a recurring event loses its rule and stays
    /// as a one-off; a one-off event is removed. With [`DeleteMode::Series`]
    /// every stored event of the same series is removed across all dates; a
    /// one-off target is simply removed. Dates left empty are dropped.
    ///
    /// # Errors
    /// `UnknownEvent` if nothing is stored at that position.
    pub fn delete(&mut self, date: DateKey, index: usize, mode: DeleteMode) -> Result<()> {
        let target = self.get(date, index).ok_or_else(|| unknown(date, index))?;

        match (mode, target.recurrence.clone()) {
            (DeleteMode::Series, Some(rule)) => {
                let mut removed = 0;
                for list in self.events.values_mut() {
                    let before = list.len();
                    list.retain(|e| !e.recurrence.as_ref().is_some_and(|r| r.same_series(&rule)));
                    removed += before - list.len();
                }
                debug!(%date, start = %rule.start_date, removed, "deleted series");
            }
            (DeleteMode::Instance, Some(_)) => {
                if let Some(event) = self.events.get_mut(&date).and_then(|l| l.get_mut(index)) {
                    event.recurrence = None;
                }
                debug!(%date, index, "detached event from its series");
            }
            (_, None) => {
                if let Some(list) = self.events.get_mut(&date) {
                    list.remove(index);
                }
                debug!(%date, index, "deleted event");
            }
        }

        self.prune();
        self.persist()
    }

    /// Validate a form draft and store it. Returns where the event now lives.
    ///
    /// Creating stamps `created_at` from `clock` and gives a new recurring
    /// event a fresh series id. Editing keeps the original `created_at` and
    /// series id; if the draft moves the event to another date it is appended
    /// there and removed from the old one.
    ///
    /// # Errors
    /// Validation errors (see [`CalendarError::is_validation`]) leave the store
    /// untouched. `UnknownEvent` if the edit target does not exist.
    pub fn save_event(
        &mut self,
        target: SaveTarget,
        draft: &EventDraft,
        clock: &dyn Clock,
    ) -> Result<(DateKey, usize)> {
        let parsed = draft.parse()?;
        let new_date = parsed.date;

        match target {
            SaveTarget::Create => {
                let series_id = parsed.is_recurring().then(Uuid::new_v4);
                let event = parsed.into_event(clock.now(), series_id, &self.config.default_color);
                let index = self.upsert(new_date, None, event)?;
                Ok((new_date, index))
            }
            SaveTarget::Edit { date, index } => {
                let existing = self.get(date, index).ok_or_else(|| unknown(date, index))?;
                let created_at = existing.created_at;
                let series_id = match &existing.recurrence {
                    Some(rule) => rule.series_id,
                    None => parsed.is_recurring().then(Uuid::new_v4),
                };
                let event = parsed.into_event(created_at, series_id, &self.config.default_color);

                if new_date == date {
                    self.upsert(date, Some(index), event)?;
                    return Ok((date, index));
                }

                if let Some(list) = self.events.get_mut(&date) {
                    list.remove(index);
                }
                self.prune();
                let new_index = self.upsert(new_date, None, event)?;
                debug!(from = %date, to = %new_date, "moved event");
                Ok((new_date, new_index))
            }
        }
    }

    fn prune(&mut self) {
        self.events.retain(|_, list| !list.is_empty());
    }
}

fn anchored(date: DateKey, mut event: Event) -> Event {
    if let Some(rule) = event.recurrence.as_mut() {
        rule.start_date = date;
    }
    event.time = event.time.map(whole_minutes);
    event
}

fn unknown(date: DateKey, index: usize) -> CalendarError {
    CalendarError::UnknownEvent {
        date: date.to_string(),
        index,
    }
}
