//! Storage trait definitions.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Key-value store holding JSON values, shaped like an extension's local
/// storage area.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read `keys`. Keys with no stored value are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;

    /// Write every entry in one operation. Either all entries land or none.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<()>;

    /// Delete `keys`. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// Read a list stored under `key`; missing means empty.
///
/// # Errors
///
/// Returns an error if the read fails or the stored value is not a list of `T`.
pub async fn read_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>> {
    let mut values = store.get(&[key]).await?;
    match values.remove(key) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Replace the list stored under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_list<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    list: &[T],
) -> Result<()> {
    let mut entries = HashMap::new();
    entries.insert(key.to_string(), serde_json::to_value(list)?);
    store.set(entries).await
}

/// Write a single value.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn write_value(store: &dyn KeyValueStore, key: &str, value: Value) -> Result<()> {
    let mut entries = HashMap::new();
    entries.insert(key.to_string(), value);
    store.set(entries).await
}
