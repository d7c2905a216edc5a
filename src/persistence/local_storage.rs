//! LocalStorage store (web)

use super::{StoreError, UserStore};
use crate::users::UserBook;

/// Records kept as JSON under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new("pinch_snake_users")
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl UserStore for LocalStorageStore {
    fn load(&self) -> Result<UserBook, StoreError> {
        let json = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| StoreError::Unavailable)?
            .ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, book: &UserBook) -> Result<(), StoreError> {
        let json = serde_json::to_string(book)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|_| StoreError::Unavailable)
    }
}
