//! Scheduled restorations.
//!
//! An entry lives in the `scheduledSessions` list and has a one-shot alarm
//! named after its id. When the alarm fires the entry is executed and then
//! removed from the list.

use chrono::{SubsecRound, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Background, RestoreSummary};
use crate::core::schedule::{SCHEDULED_KEY, ScheduleKind, ScheduledEntry};
use crate::core::settings::{self, AUTO_BACKUP_INTERVAL_KEY, Settings};
use crate::core::validate;
use crate::error::Result;
use crate::platform::AlarmSchedule;
use crate::storage::{read_list, write_list, write_value};

impl Background {
    /// Every pending entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn scheduled_entries(&self) -> Result<Vec<ScheduledEntry>> {
        read_list(self.store(), SCHEDULED_KEY).await
    }

    /// Store an entry and arm its alarm.
    ///
    /// Session entries get a copy of the referenced record, taken now, so a
    /// later eviction cannot change what is restored. An entry with an id
    /// that is already pending replaces it.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for past times or bad URLs and `NotFound` for an
    /// unknown session. Nothing is written in either case.
    pub async fn schedule_entry(&self, mut entry: ScheduledEntry) -> Result<ScheduledEntry> {
        validate::ensure_future(entry.time, Utc::now())?;
        entry.time = entry.time.trunc_subsecs(3);

        match &mut entry.kind {
            ScheduleKind::Custom { urls } => {
                *urls = validate::validate_urls(urls)?;
            }
            ScheduleKind::Session {
                session_id,
                session,
            } => {
                if session.is_none() {
                    *session = Some(self.resolve_session(session_id).await?);
                }
            }
        }

        let mut entries = self.scheduled_entries().await?;
        entries.retain(|e| e.id != entry.id);
        entries.push(entry.clone());
        write_list(self.store(), SCHEDULED_KEY, &entries).await?;

        self.alarms()
            .create(&entry.id, AlarmSchedule::at(entry.time))
            .await?;
        info!(id = %entry.id, time = %entry.time, what = %entry.describe(), "entry scheduled");
        Ok(entry)
    }

    /// Build an entry with a fresh id and schedule it.
    ///
    /// # Errors
    ///
    /// See [`Background::schedule_entry`].
    pub async fn schedule(
        &self,
        kind: ScheduleKind,
        time: chrono::DateTime<Utc>,
    ) -> Result<ScheduledEntry> {
        let id = self.ids().schedule_id(Utc::now());
        self.schedule_entry(ScheduledEntry { id, kind, time }).await
    }

    /// Drop an entry and disarm its alarm. Both steps are attempted even if
    /// the other fails.
    ///
    /// Returns whether anything was cancelled: a stored entry removed or an
    /// armed alarm cleared.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the two steps.
    pub async fn cancel_entry(&self, id: &str) -> Result<bool> {
        let removed = self.remove_entry(id).await;
        let cleared = self.alarms().clear(id).await;

        if let Err(e) = &removed {
            warn!(id, error = %e, "cannot remove scheduled entry");
        }
        if let Err(e) = &cleared {
            warn!(id, error = %e, "cannot clear alarm");
        }
        let removed = removed?;
        let cleared = cleared?;
        info!(id, removed, cleared, "scheduled entry cancelled");
        Ok(removed || cleared)
    }

    async fn remove_entry(&self, id: &str) -> Result<bool> {
        let mut entries = self.scheduled_entries().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        write_list(self.store(), SCHEDULED_KEY, &entries).await?;
        Ok(true)
    }

    /// Execute the entry whose alarm fired, then remove it.
    ///
    /// Returns `None` if no such entry is pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or the
    /// restoration could not start.
    pub async fn fire_scheduled(&self, id: &str) -> Result<Option<RestoreSummary>> {
        let entries = self.scheduled_entries().await?;
        let Some(entry) = entries.into_iter().find(|e| e.id == id) else {
            warn!(id, "fired alarm has no scheduled entry");
            return Ok(None);
        };
        debug!(id, what = %entry.describe(), "scheduled entry due");

        let outcome = match &entry.kind {
            ScheduleKind::Session {
                session: Some(record),
                ..
            } => Ok(self.restore_record(record).await),
            ScheduleKind::Session {
                session_id,
                session: None,
            } => self.restore_session(session_id).await,
            ScheduleKind::Custom { urls } => {
                let single = match self.settings().await {
                    Ok(settings) => settings.open_in_single_window,
                    Err(e) => {
                        warn!(id, error = %e, "settings unavailable; using defaults");
                        Settings::default().open_in_single_window
                    }
                };
                self.open_custom_urls(urls, single).await
            }
        };

        // Consumed whether or not the restoration went through.
        self.remove_entry(id).await?;
        let summary = outcome?;
        info!(id, "scheduled entry executed");
        Ok(Some(summary))
    }

    /// Persist a setting from its textual form. Changing the auto-backup
    /// interval re-arms the periodic alarm.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for unknown keys or values.
    pub async fn set_setting(&self, key: &str, raw: &str) -> Result<Value> {
        let value = settings::parse_setting(key, raw)?;
        write_value(self.store(), key, value.clone()).await?;
        if key == AUTO_BACKUP_INTERVAL_KEY {
            let minutes = self.settings().await?.auto_backup_interval;
            self.arm_auto_backup(minutes).await?;
            info!(minutes, "auto-backup interval changed");
        }
        Ok(value)
    }
}
