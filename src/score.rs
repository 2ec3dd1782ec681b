//! Best-attempts record per difficulty.
//!
//! Values are written through to a [`KeyValueStore`] under
//! `"{prefix}{difficulty}"` as decimal strings. A copy is kept in memory so a
//! failing store only loses persistence, never the score itself.

use std::collections::HashMap;

use log::{debug, warn};

use crate::difficulty::Difficulty;
use crate::store::KeyValueStore;

pub const DEFAULT_KEY_PREFIX: &str = "numguess_highscore_";

pub struct HighScoreBook {
    store: Box<dyn KeyValueStore>,
    prefix: String,
    cached: HashMap<Difficulty, u32>,
}

impl HighScoreBook {
    pub fn new(store: Box<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            cached: HashMap::new(),
        }
    }

    pub fn key(&self, difficulty: Difficulty) -> String {
        format!("{}{}", self.prefix, difficulty.name())
    }

    pub fn load(&mut self, difficulty: Difficulty) -> Option<u32> {
        let key = self.key(difficulty);
        match self.store.get(&key) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(v) if v > 0 => {
                    self.cached.insert(difficulty, v);
                    Some(v)
                }
                _ => {
                    warn!("ignoring unreadable high score '{}' under {}", raw, key);
                    self.cached.get(&difficulty).copied()
                }
            },
            Ok(None) => self.cached.get(&difficulty).copied(),
            Err(e) => {
                warn!("{}; using in-memory high score for {}", e, difficulty);
                self.cached.get(&difficulty).copied()
            }
        }
    }

    /// Records a win. Returns true when `attempts` beat (or set) the best.
    pub fn record_win(&mut self, difficulty: Difficulty, attempts: u32) -> bool {
        let best = match self.cached.get(&difficulty).copied() {
            Some(b) => Some(b),
            None => self.load(difficulty),
        };
        if best.is_some_and(|b| attempts >= b) {
            return false;
        }
        self.cached.insert(difficulty, attempts);
        let key = self.key(difficulty);
        match self.store.set(&key, &attempts.to_string()) {
            Ok(()) => debug!("saved high score {} for {}", attempts, difficulty),
            Err(e) => warn!("{}; high score for {} kept in memory only", e, difficulty),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write("quota exceeded".into()))
        }
    }

    #[test]
    fn writes_decimal_under_prefixed_key() {
        let store = MemoryStore::new();
        let mut book = HighScoreBook::new(Box::new(store.clone()), DEFAULT_KEY_PREFIX);
        assert!(book.record_win(Difficulty::Easy, 7));
        assert_eq!(
            store.get("numguess_highscore_Easy").unwrap(),
            Some("7".to_string())
        );
    }

    #[test]
    fn only_improvements_are_recorded() {
        let store = MemoryStore::new();
        let mut book = HighScoreBook::new(Box::new(store.clone()), DEFAULT_KEY_PREFIX);
        assert!(book.record_win(Difficulty::Hard, 9));
        assert!(!book.record_win(Difficulty::Hard, 9));
        assert!(!book.record_win(Difficulty::Hard, 12));
        assert!(book.record_win(Difficulty::Hard, 4));
        assert_eq!(book.load(Difficulty::Hard), Some(4));
        assert_eq!(book.load(Difficulty::Easy), None);
    }

    #[test]
    fn loads_existing_value_before_comparing() {
        let mut store = MemoryStore::new();
        store.set("numguess_highscore_Medium", "5").unwrap();
        let mut book = HighScoreBook::new(Box::new(store.clone()), DEFAULT_KEY_PREFIX);
        assert_eq!(book.load(Difficulty::Medium), Some(5));
        assert!(!book.record_win(Difficulty::Medium, 6));
        assert_eq!(store.get("numguess_highscore_Medium").unwrap(), Some("5".into()));
    }

    #[test]
    fn garbage_value_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("numguess_highscore_Easy", "abc").unwrap();
        store.set("numguess_highscore_Hard", "0").unwrap();
        let mut book = HighScoreBook::new(Box::new(store), DEFAULT_KEY_PREFIX);
        assert_eq!(book.load(Difficulty::Easy), None);
        assert_eq!(book.load(Difficulty::Hard), None);
    }

    #[test]
    fn broken_store_falls_back_to_memory() {
        let mut book = HighScoreBook::new(Box::new(BrokenStore), DEFAULT_KEY_PREFIX);
        assert_eq!(book.load(Difficulty::Easy), None);
        assert!(book.record_win(Difficulty::Easy, 3));
        assert_eq!(book.load(Difficulty::Easy), Some(3));
        assert!(!book.record_win(Difficulty::Easy, 8));
    }
}
