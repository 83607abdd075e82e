//! Change-triggered captures.
//!
//! Tab and window events restart a single pending timer. A `change`
//! capture runs only once the timer elapses with no further events.

use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use tracing::trace;

use super::{Background, CaptureRequest};
use crate::core::session::Category;
use crate::platform::{TabId, WindowId};

/// Browser event forwarded by the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum BrowserEvent {
    TabCreated {
        #[serde(default, rename = "tabId")]
        tab_id: Option<TabId>,
    },
    TabRemoved {
        #[serde(default, rename = "tabId")]
        tab_id: Option<TabId>,
    },
    #[serde(rename_all = "camelCase")]
    TabUpdated {
        #[serde(default)]
        tab_id: Option<TabId>,
        /// The update carried a new url.
        #[serde(default)]
        url_changed: bool,
        /// The tab finished loading.
        #[serde(default)]
        complete: bool,
    },
    TabMoved {
        #[serde(default, rename = "tabId")]
        tab_id: Option<TabId>,
    },
    TabActivated {
        #[serde(default, rename = "tabId")]
        tab_id: Option<TabId>,
    },
    WindowCreated {
        #[serde(default, rename = "windowId")]
        window_id: Option<WindowId>,
    },
    WindowRemoved {
        #[serde(default, rename = "windowId")]
        window_id: Option<WindowId>,
    },
    WindowFocusChanged {
        #[serde(default, rename = "windowId")]
        window_id: Option<WindowId>,
    },
}

impl BrowserEvent {
    /// Whether the event changes what a snapshot would contain.
    #[must_use]
    pub fn qualifies(&self) -> bool {
        match self {
            Self::TabUpdated {
                url_changed,
                complete,
                ..
            } => *url_changed || *complete,
            Self::TabCreated { .. }
            | Self::TabRemoved { .. }
            | Self::TabMoved { .. }
            | Self::WindowCreated { .. }
            | Self::WindowRemoved { .. } => true,
            Self::TabActivated { .. } | Self::WindowFocusChanged { .. } => false,
        }
    }
}

impl Background {
    /// Feed a browser event into the debouncer.
    ///
    /// Returns whether the event (re)started the timer.
    pub fn on_browser_event(&self, event: &BrowserEvent) -> bool {
        if !event.qualifies() {
            return false;
        }
        trace!(?event, "change event");

        let delay = self.options().debounce;
        let this = self.clone();
        let mut slot = self
            .inner
            .pending_capture
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so a later event cannot abort a capture in progress.
            tokio::spawn(async move {
                this.capture_and_report(Category::Change, CaptureRequest::default())
                    .await;
            });
        }));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness_with;
    use super::*;
    use crate::config::Options;
    use crate::core::session::SessionRecord;
    use crate::platform::RecordingBrowser;
    use crate::platform::recording::open_window;
    use std::time::Duration;

    fn setup() -> super::super::testing::Harness {
        harness_with(
            RecordingBrowser::with_windows(vec![open_window(1, &["https://a.test"])]),
            Options::default(),
        )
    }

    async fn stored(h: &super::super::testing::Harness) -> Vec<SessionRecord> {
        h.background.list_sessions(Category::Change).await.unwrap()
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn event_wire_format() {
        let event: BrowserEvent =
            serde_json::from_str(r#"{"event": "tabUpdated", "tabId": 4, "urlChanged": true}"#)
                .unwrap();
        assert!(event.qualifies());

        let event: BrowserEvent =
            serde_json::from_str(r#"{"event": "tabUpdated", "tabId": 4}"#).unwrap();
        assert!(!event.qualifies());

        let event: BrowserEvent =
            serde_json::from_str(r#"{"event": "windowRemoved", "windowId": 2}"#).unwrap();
        assert!(event.qualifies());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_captures_once() {
        let h = setup();
        for _ in 0..5 {
            assert!(h.background.on_browser_event(&BrowserEvent::TabCreated { tab_id: None }));
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert!(stored(&h).await.is_empty());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert_eq!(stored(&h).await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_events_capture_each_time() {
        let h = setup();
        h.background.on_browser_event(&BrowserEvent::WindowCreated { window_id: Some(1) });
        tokio::time::sleep(Duration::from_millis(1100)).await;
        settle().await;
        h.background.on_browser_event(&BrowserEvent::WindowRemoved { window_id: Some(1) });
        tokio::time::sleep(Duration::from_millis(1100)).await;
        settle().await;
        assert_eq!(stored(&h).await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_changes_are_ignored() {
        let h = setup();
        assert!(!h.background.on_browser_event(&BrowserEvent::WindowFocusChanged { window_id: Some(1) }));
        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert!(stored(&h).await.is_empty());
    }
}
