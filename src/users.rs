//! Player records and leaderboard
//!
//! One record per username holding the best score, level and revive
//! count seen. Updates only ever raise values.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_USERNAME_LEN;

/// A single player's bests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "score", default)]
    pub best_score: u64,
    #[serde(rename = "level", default)]
    pub best_level: u32,
    #[serde(rename = "revive_count", default)]
    pub best_revive_count: u8,
}

impl UserRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            best_score: 0,
            best_level: 0,
            best_revive_count: 0,
        }
    }
}

/// All known players, in creation order
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct UserBook {
    users: Vec<UserRecord>,
}

impl UserBook {
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    pub fn from_records(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Whether `name` is acceptable as a new username
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.chars().count() <= MAX_USERNAME_LEN
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }

    /// Register a new player; false if the name is taken or invalid
    pub fn add(&mut self, username: &str) -> bool {
        let username = username.trim();
        if !Self::is_valid_name(username) || self.get(username).is_some() {
            return false;
        }
        self.users.push(UserRecord::new(username));
        true
    }

    /// Raise a player's bests; true if anything changed
    ///
    /// Unknown players are created first.
    pub fn update(&mut self, username: &str, score: u64, level: u32, revive_count: u8) -> bool {
        let username = username.trim();
        if self.get(username).is_none() && !self.add(username) {
            return false;
        }
        let Some(user) = self.users.iter_mut().find(|u| u.username == username) else {
            return false;
        };

        let before = user.clone();
        user.best_score = user.best_score.max(score);
        user.best_level = user.best_level.max(level);
        user.best_revive_count = user.best_revive_count.max(revive_count);
        *user != before
    }

    /// Up to `count` records, best score first (ties keep creation order)
    pub fn top(&self, count: usize) -> Vec<&UserRecord> {
        let mut sorted: Vec<&UserRecord> = self.users.iter().collect();
        sorted.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        sorted.truncate(count);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicates_and_bad_names() {
        let mut book = UserBook::new();
        assert!(book.add("alice"));
        assert!(!book.add("alice"));
        assert!(!book.add(""));
        assert!(!book.add("has space"));
        assert!(!book.add("a_very_long_username"));
        assert!(book.add("  bob_2  "));
        assert!(book.get("bob_2").is_some());
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_update_is_monotonic() {
        let mut book = UserBook::new();
        book.add("alice");
        assert!(book.update("alice", 100, 3, 1));
        assert!(!book.update("alice", 50, 2, 0));
        let rec = book.get("alice").unwrap();
        assert_eq!(rec.best_score, 100);
        assert_eq!(rec.best_level, 3);

        // Higher level alone still counts as an improvement
        assert!(book.update("alice", 10, 4, 0));
        let rec = book.get("alice").unwrap();
        assert_eq!(rec.best_score, 100);
        assert_eq!(rec.best_level, 4);
        assert_eq!(rec.best_revive_count, 1);
    }

    #[test]
    fn test_update_creates_unknown_user() {
        let mut book = UserBook::new();
        assert!(book.update("carol", 15, 1, 3));
        assert_eq!(book.get("carol").unwrap().best_revive_count, 3);
    }

    #[test]
    fn test_top_orders_by_score() {
        let mut book = UserBook::new();
        for (name, score) in [("a", 10), ("b", 30), ("c", 20), ("d", 30)] {
            book.update(name, score, 1, 0);
        }
        let top: Vec<&str> = book.top(3).iter().map(|u| u.username.as_str()).collect();
        assert_eq!(top, vec!["b", "d", "c"]);
        assert_eq!(book.top(10).len(), 4);
    }

    #[test]
    fn test_json_layout() {
        let json = r#"[{"user": "p1", "score": 75, "level": 2}]"#;
        let book: UserBook = serde_json::from_str(json).unwrap();
        let rec = book.get("p1").unwrap();
        assert_eq!(rec.best_score, 75);
        assert_eq!(rec.best_revive_count, 0);
    }
}
