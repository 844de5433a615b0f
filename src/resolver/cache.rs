//! Process-lifetime memoization of resolution outcomes
//!
//! Fixed capacity without eviction: once `capacity` distinct keys are stored,
//! new keys are not cached and always re-query. Created empty at pipeline start
//! and passed explicitly to the resolver; nothing is persisted.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Confirmed outcome of a knowledge-base lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Knowledge-base identifier (e.g. "Q42"), `None` for a confirmed no-match
    pub identifier: Option<String>,
}

impl ResolutionResult {
    pub fn found(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
        }
    }

    pub fn not_found() -> Self {
        Self { identifier: None }
    }
}

/// Bounded map from normalized mention text to its resolution
#[derive(Debug)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<String, ResolutionResult>>,
    capacity: usize,
}

impl ResolutionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    // Entries are plain data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ResolutionResult>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<ResolutionResult> {
        self.lock().get(key).cloned()
    }

    /// Store a result. Returns false when the cache is full and `key` is new.
    pub fn insert(&self, key: impl Into<String>, result: ResolutionResult) -> bool {
        let key = key.into();
        let mut entries = self.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, result);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = ResolutionCache::new(4);
        assert!(cache.is_empty());

        assert!(cache.insert("Dostoevsky", ResolutionResult::found("Q991")));
        assert!(cache.insert("Nowhere", ResolutionResult::not_found()));

        assert_eq!(cache.get("Dostoevsky"), Some(ResolutionResult::found("Q991")));
        assert_eq!(cache.get("Nowhere"), Some(ResolutionResult::not_found()));
        assert_eq!(cache.get("Tolstoy"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_full_cache_rejects_new_keys() {
        let cache = ResolutionCache::new(2);
        assert!(cache.insert("a", ResolutionResult::found("Q1")));
        assert!(cache.insert("b", ResolutionResult::found("Q2")));
        assert!(cache.is_full());

        assert!(!cache.insert("c", ResolutionResult::found("Q3")));
        assert!(!cache.contains("c"));
        // Nothing is evicted
        assert!(cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn test_full_cache_overwrites_existing_key() {
        let cache = ResolutionCache::new(1);
        assert!(cache.insert("a", ResolutionResult::not_found()));
        assert!(cache.insert("a", ResolutionResult::found("Q1")));
        assert_eq!(cache.get("a"), Some(ResolutionResult::found("Q1")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let cache = ResolutionCache::new(0);
        assert!(!cache.insert("a", ResolutionResult::found("Q1")));
        assert!(cache.is_empty());
    }
}
