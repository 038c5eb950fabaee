//! Store configuration.

use crate::event::DEFAULT_COLOR;
use serde::{Deserialize, Serialize};

/// Storage key the browser widget has always used for its blob.
pub const DEFAULT_STORAGE_KEY: &str = "rupertg_calendar_events";

/// Where the store persists and what it fills in for missing form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Key of the blob in the storage backend.
    pub storage_key: String,
    /// Color given to events saved without one.
    pub default_color: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
