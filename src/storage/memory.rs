//! In-memory storage backend for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::storage::traits::KeyValueStore;

/// In-memory storage backend for testing.
///
/// Counts writes and can be switched into a failing mode to exercise
/// store-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
    fail_writes: AtomicBool,
    fail_reads_of: RwLock<Vec<String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` that asks for `key` fail.
    pub fn fail_reads_of(&self, key: &str) {
        if let Ok(mut keys) = self.fail_reads_of.write() {
            keys.push(key.to_string());
        }
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the stored value under `key`.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let failing = self
            .fail_reads_of
            .read()
            .map_err(|_| Error::Store("lock poisoned".to_string()))?;
        if keys.iter().any(|k| failing.iter().any(|f| f == k)) {
            return Err(Error::Store("read rejected".to_string()));
        }
        drop(failing);
        let values = self
            .values
            .read()
            .map_err(|_| Error::Store("lock poisoned".to_string()))?;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| ((*k).to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        self.check_writable()?;
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Store("lock poisoned".to_string()))?;
        values.extend(entries);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        self.check_writable()?;
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Store("lock poisoned".to_string()))?;
        for key in keys {
            values.remove(*key);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
