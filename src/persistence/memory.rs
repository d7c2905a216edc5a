//! In-memory store (tests and headless runs)

use std::sync::{Arc, Mutex};

use super::{StoreError, UserStore};
use crate::users::UserBook;

#[derive(Debug, Default)]
struct Slot {
    json: Option<String>,
    fail_writes: bool,
}

/// Keeps the serialized records in memory; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with raw JSON
    pub fn with_contents(json: &str) -> Self {
        let store = Self::new();
        if let Ok(mut slot) = store.slot.lock() {
            slot.json = Some(json.to_string());
        }
        store
    }

    /// Make every subsequent save fail
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.fail_writes = fail;
        }
    }
}

impl UserStore for MemoryStore {
    fn load(&self) -> Result<UserBook, StoreError> {
        let slot = self.slot.lock().map_err(|_| StoreError::Unavailable)?;
        let json = slot.json.as_deref().ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_str(json)?)
    }

    fn save(&mut self, book: &UserBook) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Unavailable)?;
        if slot.fail_writes {
            return Err(StoreError::Unavailable);
        }
        slot.json = Some(serde_json::to_string(book)?);
        Ok(())
    }
}
