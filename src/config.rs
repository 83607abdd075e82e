//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`TABKEEP_*`)
//! 2. Config file (`$TABKEEP_HOME/config.toml`, default `~/.tabkeep`)
//! 3. Defaults
//!
//! This is process configuration for the native host. User preferences
//! (caps, intervals, theme) live in the key-value store, see
//! [`crate::core::settings`].

use crate::core::capacity::DEFAULT_IMPORT_CAP;
use crate::error::{Error, Result};
use crate::storage::file::get_tabkeep_home;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Browser adapter configuration.
    pub browser: BrowserConfig,

    /// Restoration configuration.
    pub restore: RestoreConfig,

    /// Capture configuration.
    pub capture: CaptureConfig,

    /// Import/export configuration.
    pub transfer: TransferConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `storage.json`.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_tabkeep_home(),
        }
    }
}

/// Browser adapter configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserConfig {
    /// Browser executable.
    pub command: String,

    /// Arguments placed before the URL when opening a window.
    pub new_window_args: Vec<String>,

    /// Arguments placed before the URL when opening a tab.
    pub new_tab_args: Vec<String>,

    /// JSON dump of open windows maintained by the extension.
    pub windows_file: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            command: "firefox".to_string(),
            new_window_args: vec!["--new-window".to_string()],
            new_tab_args: vec!["--new-tab".to_string()],
            windows_file: Some(get_tabkeep_home().join("windows.json")),
        }
    }
}

/// Restoration configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Delay between successive window creations, in milliseconds.
    pub stagger_ms: u64,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self { stagger_ms: 900 }
    }
}

/// Capture configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Quiet period after the last tab/window change before capturing.
    pub debounce_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

/// Import/export configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Cap applied to each category after an import merge.
    pub import_cap: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            import_cap: DEFAULT_IMPORT_CAP,
        }
    }
}

/// Timing and limits used by the background service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub stagger: Duration,
    pub debounce: Duration,
    pub import_cap: usize,
}

impl Default for Options {
    fn default() -> Self {
        Config::default().options()
    }
}

impl Config {
    /// Service options derived from this configuration.
    #[must_use]
    pub fn options(&self) -> Options {
        Options {
            stagger: Duration::from_millis(self.restore.stagger_ms),
            debounce: Duration::from_millis(self.capture.debounce_ms),
            import_cap: self.transfer.import_cap,
        }
    }
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Try to load config file
    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
    }

    // Override with environment variables
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("TABKEEP_CONFIG") {
        return PathBuf::from(path);
    }

    get_tabkeep_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    // Storage path
    if let Ok(path) = env::var("TABKEEP_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    }

    // Browser
    if let Ok(command) = env::var("TABKEEP_BROWSER") {
        config.browser.command = command;
    }

    if let Ok(path) = env::var("TABKEEP_WINDOWS_FILE") {
        config.browser.windows_file = Some(PathBuf::from(path));
    }

    // Timing
    if let Ok(val) = env::var("TABKEEP_STAGGER_MS") {
        if let Ok(ms) = val.parse() {
            config.restore.stagger_ms = ms;
        }
    }

    if let Ok(val) = env::var("TABKEEP_DEBOUNCE_MS") {
        if let Ok(ms) = val.parse() {
            config.capture.debounce_ms = ms;
        }
    }

    // Import
    if let Ok(val) = env::var("TABKEEP_IMPORT_CAP") {
        if let Ok(cap) = val.parse() {
            config.transfer.import_cap = cap;
        }
    }
}
