//! Messages from the extension UI.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Background, CaptureRequest};
use crate::core::schedule::ScheduledEntry;
use crate::core::session::Category;
use crate::error::{Error, Result};
use crate::platform::WindowId;

/// Every request the service accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    SaveSessionManually {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, rename = "windowIds", skip_serializing_if = "Option::is_none")]
        window_ids: Option<Vec<WindowId>>,
    },
    ScheduleSession {
        #[serde(rename = "scheduledSession")]
        scheduled_session: ScheduledEntry,
    },
    CancelScheduledSession {
        #[serde(rename = "scheduleId")]
        schedule_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// Reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            error: None,
        }
    }

    /// Failure with no reason attached, e.g. a cancel that found nothing.
    #[must_use]
    pub fn refused() -> Self {
        Self {
            status: Status::Failure,
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: &Error) -> Self {
        Self {
            status: Status::Failure,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<()>> for Response {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(&e),
        }
    }
}

impl Background {
    /// Handle one request.
    pub async fn handle(&self, request: Request) -> Response {
        debug!(?request, "request");
        let result = match request {
            Request::SaveSessionManually { name, window_ids } => self
                .capture_notified(Category::Manual, CaptureRequest { name, window_ids })
                .await
                .map(|_| ()),
            Request::ScheduleSession { scheduled_session } => {
                self.schedule_entry(scheduled_session).await.map(|_| ())
            }
            Request::CancelScheduledSession { schedule_id } => {
                match self.cancel_entry(&schedule_id).await {
                    Ok(false) => {
                        debug!(id = %schedule_id, "nothing to cancel");
                        return Response::refused();
                    }
                    other => other.map(|_| ()),
                }
            }
        };
        if let Err(e) = &result {
            warn!(error = %e, "request failed");
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::harness_with;
    use super::*;
    use crate::config::Options;
    use crate::platform::RecordingBrowser;
    use crate::platform::recording::open_window;
    use crate::storage::write_value;
    use serde_json::Value;

    fn setup() -> super::super::testing::Harness {
        harness_with(
            RecordingBrowser::with_windows(vec![open_window(1, &["https://a.test"])]),
            Options::default(),
        )
    }

    #[test]
    fn request_wire_format() {
        let request: Request = serde_json::from_str(
            r#"{"action": "cancelScheduledSession", "scheduleId": "schedule_1"}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::CancelScheduledSession {
                schedule_id: "schedule_1".to_string()
            }
        );

        let request: Request =
            serde_json::from_str(r#"{"action": "saveSessionManually"}"#).unwrap();
        assert!(matches!(
            request,
            Request::SaveSessionManually { name: None, window_ids: None }
        ));

        assert!(serde_json::from_str::<Request>(r#"{"action": "formatDisk"}"#).is_err());
    }

    #[test]
    fn response_wire_format() {
        let ok = serde_json::to_value(Response::success()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "success"}));

        let failed = Response::failure(&Error::NotFound("session x".to_string()));
        let value = serde_json::to_value(failed).unwrap();
        assert_eq!(value["status"], "failure");
        assert!(value["error"].as_str().unwrap().contains("session x"));
    }

    #[tokio::test]
    async fn save_manually() {
        let h = setup();
        let response = h
            .background
            .handle(Request::SaveSessionManually {
                name: Some("Inbox".to_string()),
                window_ids: None,
            })
            .await;
        assert_eq!(response, Response::success());

        let stored = h.background.list_sessions(Category::Manual).await.unwrap();
        assert_eq!(stored[0].name.as_deref(), Some("Inbox"));
        assert_eq!(h.notifier.sent()[0].0, "Session saved");
    }

    #[tokio::test]
    async fn schedule_in_the_past_fails() {
        let h = setup();
        let request: Request = serde_json::from_str(
            r#"{"action": "scheduleSession", "scheduledSession": {
                "id": "schedule_1", "type": "custom",
                "urls": ["https://a.test"], "time": "2001-01-01T00:00:00.000Z"
            }}"#,
        )
        .unwrap();

        let response = h.background.handle(request).await;
        assert_eq!(response.status, Status::Failure);
        assert!(h.background.scheduled_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_while_disabled_reports_success_silently() {
        let h = setup();
        write_value(h.store.as_ref(), "manualSessionsEnabled", Value::Bool(false))
            .await
            .unwrap();
        let writes = h.store.writes();

        let response = h
            .background
            .handle(Request::SaveSessionManually {
                name: None,
                window_ids: None,
            })
            .await;
        assert_eq!(response, Response::success());
        assert_eq!(h.store.writes(), writes);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn cancel_unknown_is_refused() {
        let h = setup();
        let response = h
            .background
            .handle(Request::CancelScheduledSession {
                schedule_id: "schedule_404".to_string(),
            })
            .await;
        assert_eq!(response, Response::refused());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"status": "failure"})
        );
    }

    #[tokio::test]
    async fn cancel_pending_succeeds() {
        let h = setup();
        let entry = h
            .background
            .schedule(
                crate::core::schedule::ScheduleKind::Custom {
                    urls: vec!["https://a.test".to_string()],
                },
                chrono::Utc::now() + chrono::Duration::hours(1),
            )
            .await
            .unwrap();

        let response = h
            .background
            .handle(Request::CancelScheduledSession {
                schedule_id: entry.id,
            })
            .await;
        assert_eq!(response, Response::success());
        assert!(h.background.scheduled_entries().await.unwrap().is_empty());
    }
}
