//! WASM bindings for calendar-engine.
//!
//! Exposes the event store, recurrence queries and the month grid model to the
//! browser widget via `wasm-bindgen`. Structured values cross the boundary as
//! JSON strings; errors are thrown as JS strings carrying the error message.
//!
//! The store persists through any JS object with `getItem` / `setItem`
//! methods, so `window.localStorage` can be passed in directly.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p calendar-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/calendar_engine_wasm.wasm
//! ```

use calendar_engine::month::shift_month;
use calendar_engine::{
    display_time, event::parse_time, CalendarError, Clock, DateKey, DeleteMode, EventDraft,
    EventStore, MonthView, SaveTarget, StorageBackend, StoreConfig, SystemClock,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JS storage adapter
// ---------------------------------------------------------------------------

#[wasm_bindgen]
extern "C" {
    /// Anything shaped like the Web Storage API.
    #[wasm_bindgen(typescript_type = "Storage")]
    pub type KeyValueStorage;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &KeyValueStorage, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &KeyValueStorage, key: &str, value: &str) -> Result<(), JsValue>;
}

struct JsStorage(KeyValueStorage);

fn js_error_text(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl StorageBackend for JsStorage {
    fn get(&self, key: &str) -> calendar_engine::error::Result<Option<String>> {
        self.0
            .get_item(key)
            .map_err(|e| CalendarError::Storage(js_error_text(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> calendar_engine::error::Result<()> {
        self.0
            .set_item(key, value)
            .map_err(|e| CalendarError::Storage(js_error_text(&e)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SavedPosition {
    date: String,
    index: usize,
}

fn to_js(e: CalendarError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_key(s: &str) -> Result<DateKey, JsValue> {
    s.parse().map_err(to_js)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// The calendar's event store, bound to a JS storage object.
#[wasm_bindgen]
pub struct Calendar {
    store: EventStore<JsStorage>,
}

#[wasm_bindgen]
impl Calendar {
    /// Load the store from `storage`. `key` overrides the default blob key.
    ///
    /// Missing or corrupt stored data opens an empty calendar.
    #[wasm_bindgen(constructor)]
    pub fn new(storage: KeyValueStorage, key: Option<String>) -> Calendar {
        let mut config = StoreConfig::default();
        if let Some(key) = key {
            config = config.with_storage_key(key);
        }
        Calendar {
            store: EventStore::open(JsStorage(storage), config),
        }
    }

    /// Display-ordered events on `date_key` as a JSON array. Recurrence echoes
    /// carry `isRecurring: true` and their `originalDate`.
    #[wasm_bindgen(js_name = "eventsOn")]
    pub fn events_on(&self, date_key: &str) -> Result<String, JsValue> {
        let date = parse_key(date_key)?;
        to_json(&calendar_engine::events_for_display(date, self.store.events()))
    }

    /// The stored event at `index` under `date_key`, as JSON, for filling the
    /// edit dialog. `undefined` if there is none.
    #[wasm_bindgen(js_name = "getEvent")]
    pub fn get_event(&self, date_key: &str, index: u32) -> Result<Option<String>, JsValue> {
        let date = parse_key(date_key)?;
        self.store.get(date, index as usize).map(to_json).transpose()
    }

    /// The month grid for `year` / `month0` (0-based) as JSON.
    #[wasm_bindgen(js_name = "monthView")]
    pub fn month_view(&self, year: i32, month0: u32) -> Result<String, JsValue> {
        let today = SystemClock.today();
        let view = MonthView::build(year, month0, self.store.events(), today).map_err(to_js)?;
        to_json(&view)
    }

    /// Save the event dialog.
    ///
    /// `draft_json` is an object with `title`, `date`, `time`, `description`,
    /// `color` and an optional `recurrence: {type, endDate}`. Pass
    /// `edit_date` and `edit_index` to replace an existing event; omit both to
    /// create one. Returns `{date, index}` of the saved event.
    ///
    /// Throws the validation message (e.g. a missing title) without touching
    /// the store.
    #[wasm_bindgen(js_name = "saveEvent")]
    pub fn save_event(
        &mut self,
        draft_json: &str,
        edit_date: Option<String>,
        edit_index: Option<u32>,
    ) -> Result<String, JsValue> {
        let draft: EventDraft = serde_json::from_str(draft_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid event JSON: {}", e)))?;

        let target = match (edit_date, edit_index) {
            (Some(date), Some(index)) => SaveTarget::Edit {
                date: parse_key(&date)?,
                index: index as usize,
            },
            (None, None) => SaveTarget::Create,
            _ => {
                return Err(JsValue::from_str(
                    "editDate and editIndex must be given together",
                ))
            }
        };

        let (date, index) = self
            .store
            .save_event(target, &draft, &SystemClock)
            .map_err(to_js)?;
        to_json(&SavedPosition {
            date: date.to_string(),
            index,
        })
    }

    /// Delete the event at `index` under `date_key`. With `series` set, a
    /// recurring event takes its whole series with it; otherwise only this
    /// instance is detached.
    #[wasm_bindgen(js_name = "deleteEvent")]
    pub fn delete_event(&mut self, date_key: &str, index: u32, series: bool) -> Result<(), JsValue> {
        let date = parse_key(date_key)?;
        let mode = if series {
            DeleteMode::Series
        } else {
            DeleteMode::Instance
        };
        self.store.delete(date, index as usize, mode).map_err(to_js)
    }

    /// The raw stored map as JSON.
    #[wasm_bindgen(js_name = "exportJson")]
    pub fn export_json(&self) -> Result<String, JsValue> {
        to_json(self.store.events())
    }
}

/// Storage key for a year, **0-based** month and day: `dateKey(2024, 0, 5)`
/// is `"2024-01-05"`.
#[wasm_bindgen(js_name = "dateKey")]
pub fn date_key(year: i32, month0: u32, day: u32) -> Result<String, JsValue> {
    DateKey::from_ymd0(year, month0, day)
        .map(|key| key.to_string())
        .map_err(to_js)
}

/// Today's storage key from the local clock.
#[wasm_bindgen(js_name = "todayKey")]
pub fn today_key() -> String {
    DateKey::from(SystemClock.today()).to_string()
}

/// `"14:05"` becomes `"2:05 PM"`; no time becomes `"All day"`.
#[wasm_bindgen(js_name = "formatTime")]
pub fn format_time(time: Option<String>) -> Result<String, JsValue> {
    let parsed = match time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_time(raw).map_err(to_js)?),
    };
    Ok(display_time(parsed))
}

/// Month navigation: returns `[year, month0]` after moving `delta` months.
#[wasm_bindgen(js_name = "shiftMonth")]
pub fn shift_month_js(year: i32, month0: u32, delta: i32) -> Vec<i32> {
    let (year, month0) = shift_month(year, month0, delta);
    vec![year, month0 as i32]
}
