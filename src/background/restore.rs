//! Restoration engine: recreate windows and tabs from snapshots.

use std::ops::AddAssign;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use super::Background;
use crate::core::key::SessionKey;
use crate::core::session::{SessionRecord, TabSnapshot, WindowSnapshot};
use crate::error::{Error, Result};
use crate::platform::{NewTab, NewWindow};
use crate::storage::read_list;

/// What a restoration created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub windows_created: usize,
    pub tabs_created: usize,
    pub windows_failed: usize,
    pub tabs_failed: usize,
    /// Windows with no tabs.
    pub windows_skipped: usize,
}

impl AddAssign for RestoreSummary {
    fn add_assign(&mut self, other: Self) {
        self.windows_created += other.windows_created;
        self.tabs_created += other.tabs_created;
        self.windows_failed += other.windows_failed;
        self.tabs_failed += other.tabs_failed;
        self.windows_skipped += other.windows_skipped;
    }
}

impl Background {
    /// Open one window: the first URL creates it, the rest become tabs at
    /// positions `1..`. An empty list does nothing.
    ///
    /// # Errors
    ///
    /// Returns `Platform` if the window itself could not be created. Tab
    /// failures are logged and counted, not returned.
    pub async fn restore_window(&self, tabs: &[TabSnapshot]) -> Result<RestoreSummary> {
        let mut summary = RestoreSummary::default();
        let Some((first, rest)) = tabs.split_first() else {
            summary.windows_skipped = 1;
            return Ok(summary);
        };

        let window_id = match self
            .browser()
            .create_window(NewWindow {
                url: first.url.clone(),
            })
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(url = %first.url, error = %e, "window creation failed");
                self.notify("Restore failed", &format!("Could not open a window for {}", first.url))
                    .await;
                return Err(e);
            }
        };
        summary.windows_created = 1;
        summary.tabs_created = 1;

        for (i, tab) in rest.iter().enumerate() {
            let result = self
                .browser()
                .create_tab(NewTab {
                    window_id: Some(window_id),
                    url: tab.url.clone(),
                    index: Some(i + 1),
                    active: false,
                })
                .await;
            match result {
                Ok(_) => summary.tabs_created += 1,
                Err(e) => {
                    warn!(url = %tab.url, window_id, error = %e, "tab creation failed");
                    summary.tabs_failed += 1;
                }
            }
        }
        debug!(window_id, tabs = summary.tabs_created, "window restored");
        Ok(summary)
    }

    /// Restore every window, one at a time. Window `k` is started no
    /// earlier than `stagger * k` after the call begins.
    pub async fn restore_all_windows(&self, windows: &[WindowSnapshot]) -> RestoreSummary {
        let start = Instant::now();
        let stagger = self.options().stagger;
        let mut summary = RestoreSummary::default();

        for (k, window) in windows.iter().enumerate() {
            if !window.is_restorable() {
                summary.windows_skipped += 1;
                continue;
            }
            let offset = stagger.saturating_mul(u32::try_from(k).unwrap_or(u32::MAX));
            sleep_until(start + offset).await;
            match self.restore_window(&window.tabs).await {
                Ok(s) => summary += s,
                Err(_) => summary.windows_failed += 1,
            }
        }
        summary
    }

    /// Look up a stored session by key against the current list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key does not resolve.
    pub async fn resolve_session(&self, key: &SessionKey) -> Result<SessionRecord> {
        let list: Vec<SessionRecord> = read_list(self.store(), key.category.storage_key()).await?;
        key.resolve(&list)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("session {key}")))
    }

    /// Restore every window of a stored session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key does not resolve; the user is notified.
    pub async fn restore_session(&self, key: &SessionKey) -> Result<RestoreSummary> {
        let record = match self.resolve_session(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(%key, error = %e, "cannot restore session");
                self.notify("Restore failed", &format!("Session {key} not found"))
                    .await;
                return Err(e);
            }
        };
        Ok(self.restore_record(&record).await)
    }

    /// Restore a session record that is already in hand.
    pub async fn restore_record(&self, record: &SessionRecord) -> RestoreSummary {
        let summary = self.restore_all_windows(&record.windows).await;
        info!(
            id = %record.id,
            windows = summary.windows_created,
            tabs = summary.tabs_created,
            failed = summary.windows_failed + summary.tabs_failed,
            "session restored"
        );
        summary
    }

    /// Restore one window of a stored session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key or window index does not resolve, or
    /// `Platform` if the window could not be created.
    pub async fn restore_session_window(
        &self,
        key: &SessionKey,
        window: usize,
    ) -> Result<RestoreSummary> {
        let record = self.resolve_session(key).await?;
        let snapshot = record
            .windows
            .get(window)
            .ok_or_else(|| Error::NotFound(format!("window {window} of session {key}")))?;
        self.restore_window(&snapshot.tabs).await
    }

    /// Open ad-hoc URLs, either as one window or as independent background
    /// tabs.
    ///
    /// # Errors
    ///
    /// In single-window mode, returns `Platform` if the window could not be
    /// created.
    pub async fn open_custom_urls(
        &self,
        urls: &[String],
        single_window: bool,
    ) -> Result<RestoreSummary> {
        debug!(count = urls.len(), single_window, "opening custom urls");
        if single_window {
            let tabs: Vec<TabSnapshot> = urls.iter().map(TabSnapshot::new).collect();
            return self.restore_window(&tabs).await;
        }

        let mut summary = RestoreSummary::default();
        for url in urls {
            let result = self
                .browser()
                .create_tab(NewTab {
                    window_id: None,
                    url: url.clone(),
                    index: None,
                    active: false,
                })
                .await;
            match result {
                Ok(_) => summary.tabs_created += 1,
                Err(e) => {
                    warn!(%url, error = %e, "tab creation failed");
                    summary.tabs_failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{harness, harness_with};
    use super::*;
    use crate::config::Options;
    use crate::core::session::Category;
    use crate::platform::RecordingBrowser;
    use crate::platform::recording::BrowserCall;
    use crate::storage::write_list;
    use chrono::Utc;
    use std::time::Duration;

    fn window(urls: &[&str]) -> WindowSnapshot {
        WindowSnapshot::from_tabs(urls.iter().map(|u| TabSnapshot::new(*u)).collect())
    }

    #[tokio::test]
    async fn window_then_tabs_in_order() {
        let h = harness();
        let summary = h
            .background
            .restore_window(&window(&["https://a.test", "https://b.test", "https://c.test"]).tabs)
            .await
            .unwrap();

        assert_eq!(summary.tabs_created, 3);
        let calls = h.browser.calls();
        assert_eq!(
            calls[0],
            BrowserCall::CreateWindow {
                url: "https://a.test".to_string()
            }
        );
        assert!(matches!(
            &calls[2],
            BrowserCall::CreateTab { url, index: Some(2), window_id: Some(_) } if url == "https://c.test"
        ));
    }

    #[tokio::test]
    async fn empty_window_makes_no_calls() {
        let h = harness();
        let summary = h.background.restore_window(&[]).await.unwrap();
        assert_eq!(summary.windows_skipped, 1);
        assert!(h.browser.calls().is_empty());
    }

    #[tokio::test]
    async fn tab_failure_does_not_stop_siblings() {
        let browser = RecordingBrowser::new();
        browser.fail_url("https://b.test");
        let h = harness_with(browser, Options::default());

        let summary = h
            .background
            .restore_window(&window(&["https://a.test", "https://b.test", "https://c.test"]).tabs)
            .await
            .unwrap();

        assert_eq!(summary.tabs_created, 2);
        assert_eq!(summary.tabs_failed, 1);
        assert_eq!(h.browser.tab_urls(), vec!["https://b.test", "https://c.test"]);
    }

    #[tokio::test]
    async fn window_failure_is_surfaced() {
        let browser = RecordingBrowser::new();
        browser.fail_url("https://a.test");
        let h = harness_with(browser, Options::default());

        let result = h
            .background
            .restore_window(&window(&["https://a.test", "https://b.test"]).tabs)
            .await;
        assert!(matches!(result, Err(Error::Platform(_))));
        assert!(h.browser.tab_urls().is_empty());
        assert_eq!(h.notifier.sent()[0].0, "Restore failed");
    }

    #[tokio::test(start_paused = true)]
    async fn windows_are_staggered() {
        let h = harness();
        let start = Instant::now();
        h.background
            .restore_all_windows(&[
                window(&["https://a.test"]),
                window(&["https://b.test"]),
                window(&["https://c.test"]),
            ])
            .await;

        let calls = h.browser.timed_calls();
        assert_eq!(calls.len(), 3);
        for (k, call) in calls.iter().enumerate() {
            let k = u32::try_from(k).unwrap();
            assert!(call.at - start >= Duration::from_millis(900) * k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_windows_are_skipped_in_bulk() {
        let h = harness();
        let summary = h
            .background
            .restore_all_windows(&[window(&[]), window(&["https://a.test"])])
            .await;
        assert_eq!(summary.windows_skipped, 1);
        assert_eq!(summary.windows_created, 1);
        assert_eq!(h.browser.window_urls(), vec!["https://a.test"]);
    }

    #[tokio::test(start_paused = true)]
    async fn restoring_twice_opens_two_sets() {
        let h = harness();
        let record = SessionRecord::new(
            "manual_1".to_string(),
            Utc::now(),
            vec![window(&["https://a.test", "https://b.test"])],
        );
        write_list(h.store.as_ref(), "manualSessions", &[record])
            .await
            .unwrap();

        let key = SessionKey::index(Category::Manual, 0);
        h.background.restore_session(&key).await.unwrap();
        h.background.restore_session(&key).await.unwrap();
        assert_eq!(h.browser.window_urls().len(), 2);
        assert_eq!(h.browser.tab_urls().len(), 2);
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let h = harness();
        let err = h
            .background
            .restore_session(&SessionKey::index(Category::Auto, 4))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(h.browser.calls().is_empty());
    }

    #[tokio::test]
    async fn single_window_of_session() {
        let h = harness();
        let record = SessionRecord::new(
            "auto_1".to_string(),
            Utc::now(),
            vec![window(&["https://a.test"]), window(&["https://b.test"])],
        );
        write_list(h.store.as_ref(), "autoSessions", &[record])
            .await
            .unwrap();

        let key = SessionKey::id(Category::Auto, "auto_1");
        h.background.restore_session_window(&key, 1).await.unwrap();
        assert_eq!(h.browser.window_urls(), vec!["https://b.test"]);
        assert!(h.background.restore_session_window(&key, 2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn custom_urls_as_independent_tabs() {
        let h = harness();
        let urls = vec!["https://a.test".to_string(), "https://b.test".to_string()];
        let summary = h.background.open_custom_urls(&urls, false).await.unwrap();

        assert_eq!(summary.tabs_created, 2);
        assert!(h.browser.window_urls().is_empty());
        assert!(h.browser.calls().iter().all(|c| matches!(
            c,
            BrowserCall::CreateTab { window_id: None, index: None, .. }
        )));
    }
}
