//! Player record storage
//!
//! Features:
//! - JSON array of records, compatible with hand-edited files
//! - Atomic writes on native (tmp file, then rename)
//! - LocalStorage backend on the web, in-memory backend for tests
//! - Every failure is reported as a `StoreError`; callers treat it as
//!   "no record" or "not saved" and keep playing

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::users::{UserBook, UserRecord};

/// Why a load or save failed
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no saved records")]
    NotFound,
    #[error("saved records are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// A place player records are kept
pub trait UserStore {
    fn load(&self) -> Result<UserBook, StoreError>;
    fn save(&mut self, book: &UserBook) -> Result<(), StoreError>;
}

/// Player records plus the store backing them
///
/// Reads come from memory; writes go through to the store best-effort.
pub struct UserDirectory {
    book: UserBook,
    store: Box<dyn UserStore>,
}

impl UserDirectory {
    /// Load records from `store`, starting empty if that fails
    pub fn open(store: Box<dyn UserStore>) -> Self {
        let book = match store.load() {
            Ok(book) => {
                log::info!("Loaded {} player records", book.len());
                book
            }
            Err(StoreError::NotFound) => {
                log::info!("No player records found, starting fresh");
                UserBook::new()
            }
            Err(e) => {
                log::warn!("Could not load player records: {}", e);
                UserBook::new()
            }
        };
        Self { book, store }
    }

    pub fn book(&self) -> &UserBook {
        &self.book
    }

    pub fn get_user(&self, username: &str) -> Option<&UserRecord> {
        self.book.get(username)
    }

    /// Register a player and persist; false if the name is taken or invalid
    pub fn add_user(&mut self, username: &str) -> bool {
        if !self.book.add(username) {
            return false;
        }
        self.persist();
        true
    }

    /// Raise a player's bests and persist; true if anything changed
    pub fn upsert_user(&mut self, username: &str, score: u64, level: u32, revive_count: u8) -> bool {
        let changed = self.book.update(username, score, level, revive_count);
        if changed {
            self.persist();
        }
        changed
    }

    /// Up to `count` records, best score first
    pub fn top_n(&self, count: usize) -> Vec<&UserRecord> {
        self.book.top(count)
    }

    fn persist(&mut self) {
        match self.store.save(&self.book) {
            Ok(()) => log::debug!("Player records saved ({} entries)", self.book.len()),
            Err(e) => log::warn!("Could not save player records: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_store_is_empty() {
        let dir = UserDirectory::open(Box::new(MemoryStore::new()));
        assert!(dir.book().is_empty());
    }

    #[test]
    fn test_open_corrupt_store_is_empty() {
        let store = MemoryStore::with_contents("{{{");
        let dir = UserDirectory::open(Box::new(store));
        assert!(dir.book().is_empty());
    }

    #[test]
    fn test_writes_go_through() {
        let store = MemoryStore::new();
        let mut dir = UserDirectory::open(Box::new(store.clone()));
        assert!(dir.add_user("alice"));
        assert!(dir.upsert_user("alice", 90, 2, 1));
        assert!(!dir.upsert_user("alice", 10, 1, 0));

        let reloaded = UserDirectory::open(Box::new(store));
        let rec = reloaded.get_user("alice").unwrap();
        assert_eq!(rec.best_score, 90);
        assert_eq!(rec.best_level, 2);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut dir = UserDirectory::open(Box::new(store.clone()));
        assert!(dir.add_user("bob"));
        assert!(dir.upsert_user("bob", 40, 1, 0));
        assert_eq!(dir.get_user("bob").unwrap().best_score, 40);
        assert!(matches!(store.load(), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_top_n() {
        let mut dir = UserDirectory::open(Box::new(MemoryStore::new()));
        dir.upsert_user("a", 5, 1, 0);
        dir.upsert_user("b", 50, 2, 0);
        let top = dir.top_n(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].username, "b");
    }
}
