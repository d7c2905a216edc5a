//! JSON file store (native)

use std::fs;
use std::path::{Path, PathBuf};

use super::{StoreError, UserStore};
use crate::users::UserBook;

/// Records kept as pretty JSON at `path`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl UserStore for JsonFileStore {
    fn load(&self) -> Result<UserBook, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, book: &UserBook) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(book)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pinch_snake_{}_{}.json", tag, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let store = JsonFileStore::new(temp_file("missing"));
        assert!(matches!(store.load(), Err(StoreError::NotFound)));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_file("roundtrip");
        let mut store = JsonFileStore::new(&path);
        let mut book = UserBook::new();
        book.update("alice", 75, 2, 1);
        store.save(&book).unwrap();
        assert_eq!(store.load().unwrap(), book);
        assert!(!store.tmp_path().exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file() {
        let path = temp_file("corrupt");
        fs::write(&path, "[{\"user\": ").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
        let _ = fs::remove_file(&path);
    }
}
