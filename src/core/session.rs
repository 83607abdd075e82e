//! Session snapshot records and their categories.

use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Bucket a snapshot was captured into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Periodic auto-backup.
    Auto,
    /// Debounced capture after tab/window churn.
    Change,
    /// User-requested save.
    Manual,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [Category::Manual, Category::Auto, Category::Change];

    /// Short name used as the session id prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Change => "change",
            Self::Manual => "manual",
        }
    }

    /// Key of the persisted list holding this category.
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Auto => "autoSessions",
            Self::Change => "changeSessions",
            Self::Manual => "manualSessions",
        }
    }

    /// Key of the persisted "enabled" flag.
    #[must_use]
    pub fn enabled_key(self) -> &'static str {
        match self {
            Self::Auto => "autoSessionsEnabled",
            Self::Change => "changeSessionsEnabled",
            Self::Manual => "manualSessionsEnabled",
        }
    }

    /// Key of the persisted capacity.
    #[must_use]
    pub fn max_key(self) -> &'static str {
        match self {
            Self::Auto => "autoSessionsMax",
            Self::Change => "changeSessionsMax",
            Self::Manual => "manualSessionsMax",
        }
    }

    /// Look up a category by its short name (`auto`).
    #[must_use]
    pub fn from_short(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Look up a category by its storage key (`autoSessions`).
    #[must_use]
    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.storage_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::from_short(&lower)
            .or_else(|| Self::from_storage_key(s.trim()))
            .ok_or_else(|| Error::Validation(format!("unknown category: {s}")))
    }
}

/// A captured set of windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// `{category}_{epochMillis}`. Older exports may omit it.
    #[serde(default)]
    pub id: String,

    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Creation time.
    #[serde(with = "crate::core::timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Windows in capture order.
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
}

impl SessionRecord {
    /// Create a record. The timestamp is truncated to milliseconds so it
    /// survives a trip through the persisted format unchanged.
    #[must_use]
    pub fn new(id: String, timestamp: DateTime<Utc>, windows: Vec<WindowSnapshot>) -> Self {
        Self {
            id,
            name: None,
            timestamp: timestamp.trunc_subsecs(3),
            windows,
        }
    }

    /// Attach a display label; blank labels are dropped.
    #[must_use]
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        self
    }

    /// Fill in a missing id from the category and timestamp.
    pub fn ensure_id(&mut self, category: Category) {
        if self.id.trim().is_empty() {
            self.id = format!("{}_{}", category.as_str(), self.timestamp.timestamp_millis());
        }
    }

    /// Label shown in listings: the name, or the local capture time.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let local: DateTime<Local> = self.timestamp.into();
                local.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
    }

    /// Total tabs across all windows.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.windows.iter().map(|w| w.tabs.len()).sum()
    }
}

/// One captured window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    /// Tabs in strip order.
    #[serde(default)]
    pub tabs: Vec<TabSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incognito: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl WindowSnapshot {
    /// Window holding the given tabs and no metadata.
    #[must_use]
    pub fn from_tabs(tabs: Vec<TabSnapshot>) -> Self {
        Self {
            tabs,
            ..Self::default()
        }
    }

    /// A window with no tabs is never restored.
    #[must_use]
    pub fn is_restorable(&self) -> bool {
        !self.tabs.is_empty()
    }
}

/// One captured tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TabSnapshot {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }
}
