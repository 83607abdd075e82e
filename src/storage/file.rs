//! File-based storage backend.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::traits::KeyValueStore;

/// Name of the store file inside the base directory.
const STORE_FILE: &str = "storage.json";

/// File-based storage backend with atomic writes.
///
/// All keys live in one JSON object on disk. Every `set` rewrites the whole
/// file through a temp file and a rename, so readers never see a half
/// written store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a new file store under `base_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(STORE_FILE),
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Store(format!(
                "{} does not hold a JSON object (found {})",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    async fn save(&self, map: Map<String, Value>) -> Result<()> {
        let temp = self.path.with_extension("tmp");

        // Write to temp file first
        let contents = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&temp, &contents).await?;

        // Atomic rename - prevents corruption if process crashes mid-write
        fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = contents.len(), "store written");
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let mut map = self.load().await?;
        Ok(keys
            .iter()
            .filter_map(|k| map.remove(*k).map(|v| ((*k).to_string(), v)))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.extend(entries);
        self.save(map).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before {
            return Ok(());
        }
        self.save(map).await
    }
}

/// Get the default tabkeep home directory.
///
/// Uses `TABKEEP_HOME` environment variable if set, otherwise `~/.tabkeep`.
#[must_use]
pub fn get_tabkeep_home() -> PathBuf {
    if let Ok(home) = std::env::var("TABKEEP_HOME") {
        PathBuf::from(home)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".tabkeep")
    } else {
        PathBuf::from(".tabkeep")
    }
}
