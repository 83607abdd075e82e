//! Snapshot capture.

use chrono::Utc;
use tracing::{debug, error, info};

use super::Background;
use crate::core::capacity;
use crate::core::session::{Category, SessionRecord, TabSnapshot, WindowSnapshot};
use crate::error::Result;
use crate::platform::{OpenWindow, WindowId};
use crate::storage::{read_list, write_list};

/// Options for a single capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Display label for the record.
    pub name: Option<String>,
    /// Only include these windows. `None` includes every window.
    pub window_ids: Option<Vec<WindowId>>,
}

fn snapshot(window: OpenWindow) -> WindowSnapshot {
    let tabs = window
        .tabs
        .into_iter()
        .filter_map(|tab| {
            // Tabs the extension cannot see have no url.
            let url = tab.url?;
            Some(TabSnapshot {
                url,
                title: tab.title,
            })
        })
        .collect();
    WindowSnapshot {
        tabs,
        focused: Some(window.focused),
        incognito: Some(window.incognito),
        state: window.state,
        kind: window.kind,
    }
}

impl Background {
    /// Capture every open window into `category`.
    ///
    /// Returns `None` when captures for the category are disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be queried or the store
    /// cannot be read or written. Nothing is written on failure.
    pub async fn capture_session(&self, category: Category) -> Result<Option<SessionRecord>> {
        self.capture_with(category, CaptureRequest::default()).await
    }

    /// Capture into `category` with a name and/or a window filter.
    ///
    /// # Errors
    ///
    /// See [`Background::capture_session`].
    pub async fn capture_with(
        &self,
        category: Category,
        request: CaptureRequest,
    ) -> Result<Option<SessionRecord>> {
        let settings = self.settings().await?.category(category);
        if !settings.enabled {
            debug!(%category, "capture disabled");
            return Ok(None);
        }

        let windows: Vec<WindowSnapshot> = self
            .browser()
            .windows()
            .await?
            .into_iter()
            .filter(|w| {
                request
                    .window_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&w.id))
            })
            .map(snapshot)
            .collect();

        let now = Utc::now();
        let id = self.ids().session_id(category, now);
        let record =
            SessionRecord::new(id, now, windows).with_name(request.name.as_deref());

        let mut list: Vec<SessionRecord> = read_list(self.store(), category.storage_key()).await?;
        list.push(record.clone());
        let evicted = capacity::enforce(&mut list, settings.max);
        write_list(self.store(), category.storage_key(), &list).await?;

        info!(
            %category,
            id = %record.id,
            windows = record.windows.len(),
            tabs = record.tab_count(),
            evicted,
            "session captured"
        );
        Ok(Some(record))
    }

    /// Capture and tell the user how it went. Failures are logged and
    /// notified, never retried.
    ///
    /// # Errors
    ///
    /// See [`Background::capture_session`].
    pub async fn capture_notified(
        &self,
        category: Category,
        request: CaptureRequest,
    ) -> Result<Option<SessionRecord>> {
        let result = self.capture_with(category, request).await;
        match &result {
            Ok(Some(record)) => {
                self.notify(
                    "Session saved",
                    &format!("Saved {} ({} tabs)", record.display_name(), record.tab_count()),
                )
                .await;
            }
            Ok(None) => {}
            Err(e) => {
                error!(%category, error = %e, "capture failed");
                self.notify("Session not saved", &e.to_string()).await;
            }
        }
        result
    }

    /// [`Background::capture_notified`] for timer-driven captures, where
    /// nobody waits on the outcome.
    pub async fn capture_and_report(
        &self,
        category: Category,
        request: CaptureRequest,
    ) -> Option<SessionRecord> {
        self.capture_notified(category, request).await.ok().flatten()
    }
}
