//! Capability interfaces provided by the host browser.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Browser-assigned window id.
pub type WindowId = i64;

/// Browser-assigned tab id.
pub type TabId = i64;

/// A window currently open in the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenWindow {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub tabs: Vec<OpenTab>,
}

/// A tab currently open in the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTab {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TabId>,
    /// Absent when the extension lacks permission to see it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
}

/// Parameters for opening a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWindow {
    pub url: String,
}

/// Parameters for opening a new tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTab {
    /// Target window; `None` opens in the current window.
    pub window_id: Option<WindowId>,
    pub url: String,
    /// Position in the tab strip.
    pub index: Option<usize>,
    pub active: bool,
}

/// Window and tab management.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Every open window with its tabs.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the browser cannot be queried.
    async fn windows(&self) -> Result<Vec<OpenWindow>>;

    /// Open a window showing one URL.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the window could not be created.
    async fn create_window(&self, window: NewWindow) -> Result<WindowId>;

    /// Open a tab.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the tab could not be created.
    async fn create_tab(&self, tab: NewTab) -> Result<TabId>;
}

/// When an alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSchedule {
    /// First firing. `None` means one period from now.
    pub when: Option<DateTime<Utc>>,
    /// Repeat interval; `None` for one-shot alarms.
    pub period: Option<Duration>,
}

impl AlarmSchedule {
    /// Fire once at `when`.
    #[must_use]
    pub fn at(when: DateTime<Utc>) -> Self {
        Self {
            when: Some(when),
            period: None,
        }
    }

    /// Fire every `period`, starting one period from now.
    #[must_use]
    pub fn every(period: Duration) -> Self {
        Self {
            when: None,
            period: Some(period),
        }
    }

    #[must_use]
    pub fn is_periodic(&self) -> bool {
        self.period.is_some()
    }
}

/// Named wake-ups. Creating an alarm replaces any alarm of the same name.
#[async_trait]
pub trait Alarms: Send + Sync {
    /// Arm `name`.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the alarm could not be armed.
    async fn create(&self, name: &str, schedule: AlarmSchedule) -> Result<()>;

    /// Schedule of `name` if it is armed.
    async fn get(&self, name: &str) -> Option<AlarmSchedule>;

    /// Disarm `name`. Returns whether an armed alarm was cleared.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the alarm service failed.
    async fn clear(&self, name: &str) -> Result<bool>;
}

/// User-facing notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the notification could not be shown.
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}
