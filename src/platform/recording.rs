//! In-memory platform doubles for testing.
//!
//! They record every call so tests can assert on what the background
//! service asked the browser to do, and when.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::platform::traits::{
    AlarmSchedule, Alarms, Browser, NewTab, NewWindow, Notifier, OpenTab, OpenWindow, TabId,
    WindowId,
};

/// A browser call as issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCall {
    CreateWindow {
        url: String,
    },
    CreateTab {
        window_id: Option<WindowId>,
        url: String,
        index: Option<usize>,
    },
}

/// A browser call and the (tokio) instant it was issued.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub call: BrowserCall,
    pub at: Instant,
}

/// Build an open window with one tab per URL.
#[must_use]
pub fn open_window(id: WindowId, urls: &[&str]) -> OpenWindow {
    OpenWindow {
        id,
        kind: Some("normal".to_string()),
        tabs: urls
            .iter()
            .enumerate()
            .map(|(i, url)| OpenTab {
                id: Some(id * 100 + i64::try_from(i).unwrap_or(0)),
                url: Some((*url).to_string()),
                title: Some(format!("Title of {url}")),
                ..OpenTab::default()
            })
            .collect(),
        ..OpenWindow::default()
    }
}

/// Browser that records calls instead of opening anything.
#[derive(Debug)]
pub struct RecordingBrowser {
    open: Mutex<Vec<OpenWindow>>,
    calls: Mutex<Vec<RecordedCall>>,
    failing_urls: Mutex<HashSet<String>>,
    fail_query: AtomicBool,
    next_id: AtomicI64,
}

impl Default for RecordingBrowser {
    fn default() -> Self {
        Self {
            open: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing_urls: Mutex::new(HashSet::new()),
            fail_query: AtomicBool::new(false),
            next_id: AtomicI64::new(1000),
        }
    }
}

impl RecordingBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Browser reporting `windows` as open.
    #[must_use]
    pub fn with_windows(windows: Vec<OpenWindow>) -> Self {
        let browser = Self::default();
        browser.set_windows(windows);
        browser
    }

    /// Replace the set of open windows.
    pub fn set_windows(&self, windows: Vec<OpenWindow>) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = windows;
    }

    /// Make window or tab creation for `url` fail.
    pub fn fail_url(&self, url: &str) {
        self.failing_urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string());
    }

    /// Make window enumeration fail.
    pub fn fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    /// Every call issued, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<BrowserCall> {
        self.timed_calls().into_iter().map(|c| c.call).collect()
    }

    /// Every call issued with its timestamp.
    #[must_use]
    pub fn timed_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs passed to window creation.
    #[must_use]
    pub fn window_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BrowserCall::CreateWindow { url } => Some(url),
                BrowserCall::CreateTab { .. } => None,
            })
            .collect()
    }

    /// URLs passed to tab creation.
    #[must_use]
    pub fn tab_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BrowserCall::CreateTab { url, .. } => Some(url),
                BrowserCall::CreateWindow { .. } => None,
            })
            .collect()
    }

    fn record(&self, call: BrowserCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                call,
                at: Instant::now(),
            });
    }

    fn fails(&self, url: &str) -> bool {
        self.failing_urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }
}

#[async_trait]
impl Browser for RecordingBrowser {
    async fn windows(&self) -> Result<Vec<OpenWindow>> {
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(Error::Platform("window query failed".to_string()));
        }
        Ok(self
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn create_window(&self, window: NewWindow) -> Result<WindowId> {
        let failing = self.fails(&window.url);
        self.record(BrowserCall::CreateWindow {
            url: window.url.clone(),
        });
        if failing {
            return Err(Error::Platform(format!("cannot open window for {}", window.url)));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn create_tab(&self, tab: NewTab) -> Result<TabId> {
        let failing = self.fails(&tab.url);
        self.record(BrowserCall::CreateTab {
            window_id: tab.window_id,
            url: tab.url.clone(),
            index: tab.index,
        });
        if failing {
            return Err(Error::Platform(format!("cannot open tab for {}", tab.url)));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// Alarm service that only remembers what is armed. Tests fire alarms by
/// hand with [`ManualAlarms::fire`].
#[derive(Debug, Default)]
pub struct ManualAlarms {
    armed: Mutex<HashMap<String, AlarmSchedule>>,
}

impl ManualAlarms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every armed alarm.
    #[must_use]
    pub fn armed(&self) -> HashMap<String, AlarmSchedule> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Simulate `name` firing. One-shot alarms disarm. Returns whether the
    /// alarm was armed.
    pub fn fire(&self, name: &str) -> bool {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        match armed.get(name).copied() {
            Some(schedule) if schedule.is_periodic() => true,
            Some(_) => {
                armed.remove(name);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Alarms for ManualAlarms {
    async fn create(&self, name: &str, schedule: AlarmSchedule) -> Result<()> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), schedule);
        Ok(())
    }

    async fn get(&self, name: &str) -> Option<AlarmSchedule> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    async fn clear(&self, name: &str) -> Result<bool> {
        Ok(self
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some())
    }
}

/// Notifier that keeps every notification.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(title, message)` pairs in order.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}
