//! Scheduled restorations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::key::SessionKey;
use crate::core::session::SessionRecord;

/// Persisted key of the scheduled-entry list.
pub const SCHEDULED_KEY: &str = "scheduledSessions";

/// A one-shot restoration waiting for its alarm.
///
/// The alarm that triggers it is keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    /// `schedule_{epochMillis}`
    pub id: String,

    #[serde(flatten)]
    pub kind: ScheduleKind,

    /// When to fire.
    #[serde(with = "crate::core::timestamp")]
    pub time: DateTime<Utc>,
}

/// What a scheduled entry does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleKind {
    /// Restore a stored session.
    Session {
        #[serde(rename = "sessionId")]
        session_id: SessionKey,

        /// Copy of the record taken when the entry was created. When
        /// present it is restored instead of re-resolving `session_id`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session: Option<SessionRecord>,
    },
    /// Open a fixed list of links.
    Custom { urls: Vec<String> },
}

impl ScheduledEntry {
    /// Entry restoring a stored session.
    #[must_use]
    pub fn session(id: String, session_id: SessionKey, time: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: ScheduleKind::Session {
                session_id,
                session: None,
            },
            time,
        }
    }

    /// Entry opening links.
    #[must_use]
    pub fn custom(id: String, urls: Vec<String>, time: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: ScheduleKind::Custom { urls },
            time,
        }
    }

    /// Whether the entry should have fired by `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.time <= now
    }

    /// One-line description for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            ScheduleKind::Session {
                session_id,
                session,
            } => match session.as_ref().and_then(|s| s.name.as_deref()) {
                Some(name) => format!("Session: {session_id} ({name})"),
                None => format!("Session: {session_id}"),
            },
            ScheduleKind::Custom { urls } => format!("Custom links ({})", urls.len()),
        }
    }
}
