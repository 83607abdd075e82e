//! User settings persisted in the key-value store.
//!
//! Every setting lives under its own key. Missing or out-of-range values fall
//! back to defaults on read, so a fresh store behaves like a configured one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::core::capacity::DEFAULT_MAX_SESSIONS;
use crate::core::session::Category;
use crate::error::{Error, Result};

pub const THEME_KEY: &str = "theme";
pub const NOTIFICATIONS_KEY: &str = "notificationsEnabled";
pub const AUTO_BACKUP_INTERVAL_KEY: &str = "autoBackupInterval";
pub const SINGLE_WINDOW_KEY: &str = "openInSingleWindow";

/// Default minutes between auto-backups.
pub const DEFAULT_AUTO_BACKUP_MINUTES: u32 = 10;

/// Popup colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Capture settings for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySettings {
    pub enabled: bool,
    pub max: usize,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Snapshot of every user setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub notifications_enabled: bool,
    /// Minutes, at least 1.
    pub auto_backup_interval: u32,
    /// Custom links open as tabs of one new window rather than separately.
    pub open_in_single_window: bool,
    pub manual: CategorySettings,
    pub auto: CategorySettings,
    pub change: CategorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications_enabled: true,
            auto_backup_interval: DEFAULT_AUTO_BACKUP_MINUTES,
            open_in_single_window: true,
            manual: CategorySettings::default(),
            auto: CategorySettings::default(),
            change: CategorySettings::default(),
        }
    }
}

impl Settings {
    /// Every key read by [`Settings::from_values`].
    #[must_use]
    pub fn keys() -> Vec<&'static str> {
        let mut keys = vec![
            THEME_KEY,
            NOTIFICATIONS_KEY,
            AUTO_BACKUP_INTERVAL_KEY,
            SINGLE_WINDOW_KEY,
        ];
        for category in Category::ALL {
            keys.push(category.enabled_key());
            keys.push(category.max_key());
        }
        keys
    }

    /// Build settings from raw stored values, applying defaults.
    #[must_use]
    pub fn from_values(values: &HashMap<String, Value>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            values.get(key).and_then(Value::as_bool).unwrap_or(default)
        };
        let max = |key: &str| {
            values
                .get(key)
                .and_then(Value::as_i64)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_SESSIONS)
        };
        let category = |c: Category| CategorySettings {
            enabled: flag(c.enabled_key(), true),
            max: max(c.max_key()),
        };

        Self {
            theme: values
                .get(THEME_KEY)
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or(defaults.theme),
            notifications_enabled: flag(NOTIFICATIONS_KEY, defaults.notifications_enabled),
            auto_backup_interval: values
                .get(AUTO_BACKUP_INTERVAL_KEY)
                .and_then(Value::as_i64)
                .filter(|n| *n >= 1)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.auto_backup_interval),
            open_in_single_window: flag(SINGLE_WINDOW_KEY, defaults.open_in_single_window),
            manual: category(Category::Manual),
            auto: category(Category::Auto),
            change: category(Category::Change),
        }
    }

    /// Settings for `category`.
    #[must_use]
    pub fn category(&self, category: Category) -> CategorySettings {
        match category {
            Category::Manual => self.manual,
            Category::Auto => self.auto,
            Category::Change => self.change,
        }
    }

    /// Stored form of every setting.
    #[must_use]
    pub fn to_values(&self) -> HashMap<String, Value> {
        let mut values = HashMap::new();
        values.insert(
            THEME_KEY.to_string(),
            serde_json::to_value(self.theme).unwrap_or(Value::Null),
        );
        values.insert(
            NOTIFICATIONS_KEY.to_string(),
            Value::Bool(self.notifications_enabled),
        );
        values.insert(
            AUTO_BACKUP_INTERVAL_KEY.to_string(),
            Value::from(self.auto_backup_interval),
        );
        values.insert(
            SINGLE_WINDOW_KEY.to_string(),
            Value::Bool(self.open_in_single_window),
        );
        for category in Category::ALL {
            let s = self.category(category);
            values.insert(category.enabled_key().to_string(), Value::Bool(s.enabled));
            values.insert(category.max_key().to_string(), Value::from(s.max));
        }
        values
    }
}

/// Parse a textual setting value into its stored form.
///
/// Out-of-range numbers are clamped the way the settings form clamps them:
/// `autoBackupInterval` to at least 1 and category maxima to at least 0.
///
/// # Errors
///
/// Returns `Validation` for unknown keys or unparseable values.
pub fn parse_setting(key: &str, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    let invalid = || Error::Validation(format!("invalid value for {key}: {raw}"));

    if key == THEME_KEY {
        let theme: Theme =
            serde_json::from_value(Value::String(raw.to_lowercase())).map_err(|_| invalid())?;
        return Ok(serde_json::to_value(theme)?);
    }

    if key == AUTO_BACKUP_INTERVAL_KEY {
        let minutes: i64 = raw.parse().map_err(|_| invalid())?;
        return Ok(Value::from(minutes.max(1)));
    }

    if key == NOTIFICATIONS_KEY
        || key == SINGLE_WINDOW_KEY
        || Category::ALL.iter().any(|c| c.enabled_key() == key)
    {
        let flag: bool = raw.parse().map_err(|_| invalid())?;
        return Ok(Value::Bool(flag));
    }

    if Category::ALL.iter().any(|c| c.max_key() == key) {
        let max: i64 = raw.parse().map_err(|_| invalid())?;
        return Ok(Value::from(max.max(0)));
    }

    Err(Error::Validation(format!("unknown setting: {key}")))
}
