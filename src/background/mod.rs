//! The background service.
//!
//! [`Background`] owns every piece of process-wide state: capability
//! handles, the id generator and the pending change-capture timer. It is
//! cheap to clone; clones share the same context.

pub mod capture;
pub mod debounce;
pub mod groups;
pub mod messages;
pub mod restore;
pub mod scheduler;
pub mod sessions;
pub mod transfer;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Options;
use crate::core::ids::IdGenerator;
use crate::core::schedule::ScheduledEntry;
use crate::core::settings::Settings;
use crate::error::Result;
use crate::platform::{AlarmReceiver, AlarmSchedule, Alarms, Browser, Notifier};
use crate::storage::KeyValueStore;

pub use capture::CaptureRequest;
pub use debounce::BrowserEvent;
pub use messages::{Request, Response, Status};
pub use restore::RestoreSummary;
pub use transfer::{ExportDocument, ImportSummary};

/// Name of the periodic auto-backup alarm.
pub const AUTO_BACKUP_ALARM: &str = "autoBackup";

/// Capability handles the service runs against.
#[derive(Clone)]
pub struct Capabilities {
    pub store: Arc<dyn KeyValueStore>,
    pub browser: Arc<dyn Browser>,
    pub alarms: Arc<dyn Alarms>,
    pub notifier: Arc<dyn Notifier>,
}

struct Context {
    caps: Capabilities,
    options: Options,
    ids: IdGenerator,
    pending_capture: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to the background service.
#[derive(Clone)]
pub struct Background {
    inner: Arc<Context>,
}

impl Background {
    #[must_use]
    pub fn new(caps: Capabilities, options: Options) -> Self {
        Self {
            inner: Arc::new(Context {
                caps,
                options,
                ids: IdGenerator::new(),
                pending_capture: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.inner.caps.store.as_ref()
    }

    pub(crate) fn browser(&self) -> &dyn Browser {
        self.inner.caps.browser.as_ref()
    }

    pub(crate) fn alarms(&self) -> &dyn Alarms {
        self.inner.caps.alarms.as_ref()
    }

    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.inner.ids
    }

    #[must_use]
    pub fn options(&self) -> Options {
        self.inner.options
    }

    /// Current user settings with defaults applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn settings(&self) -> Result<Settings> {
        let values = self.store().get(&Settings::keys()).await?;
        Ok(Settings::from_values(&values))
    }

    /// Show a notification if the user has them enabled. Best-effort: a
    /// failure here is logged and otherwise ignored.
    pub async fn notify(&self, title: &str, message: &str) {
        let enabled = match self.settings().await {
            Ok(settings) => settings.notifications_enabled,
            Err(e) => {
                debug!(error = %e, "settings unavailable; notifying anyway");
                true
            }
        };
        if !enabled {
            return;
        }
        if let Err(e) = self.inner.caps.notifier.notify(title, message).await {
            warn!(error = %e, title, "notification failed");
        }
    }

    /// Arm the auto-backup alarm and re-arm every pending scheduled entry.
    ///
    /// # Errors
    ///
    /// Returns an error if settings or the schedule list cannot be read, or
    /// an alarm cannot be armed.
    pub async fn start(&self) -> Result<()> {
        let settings = self.settings().await?;
        self.arm_auto_backup(settings.auto_backup_interval).await?;
        let rearmed = self.sync_alarms().await?;
        info!(
            interval_minutes = settings.auto_backup_interval,
            rearmed, "background service started"
        );
        Ok(())
    }

    pub(crate) async fn arm_auto_backup(&self, minutes: u32) -> Result<()> {
        let period = Duration::from_secs(u64::from(minutes.max(1)) * 60);
        self.alarms()
            .create(AUTO_BACKUP_ALARM, AlarmSchedule::every(period))
            .await
    }

    /// Arm an alarm for every stored entry that has none. Entries already
    /// past their time fire as soon as the alarm loop runs.
    ///
    /// Returns how many alarms were armed.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule list cannot be read or an alarm
    /// cannot be armed.
    pub async fn sync_alarms(&self) -> Result<usize> {
        let entries: Vec<ScheduledEntry> = self.scheduled_entries().await?;
        let mut armed = 0;
        for entry in entries {
            if self.alarms().get(&entry.id).await.is_some() {
                continue;
            }
            debug!(id = %entry.id, time = %entry.time, "arming scheduled entry");
            self.alarms()
                .create(&entry.id, AlarmSchedule::at(entry.time))
                .await?;
            armed += 1;
        }
        Ok(armed)
    }

    /// Dispatch a fired alarm by name.
    pub async fn on_alarm(&self, name: &str) {
        if name == AUTO_BACKUP_ALARM {
            debug!("auto-backup alarm fired");
            self.capture_and_report(crate::core::Category::Auto, CaptureRequest::default())
                .await;
            return;
        }
        if let Err(e) = self.fire_scheduled(name).await {
            warn!(alarm = name, error = %e, "scheduled entry failed");
        }
    }

    /// Handle fired alarms until the alarm service goes away.
    pub async fn run(&self, mut alarms: AlarmReceiver) {
        while let Some(name) = alarms.recv().await {
            self.on_alarm(&name).await;
        }
        debug!("alarm channel closed");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::platform::{ManualAlarms, MemoryNotifier, RecordingBrowser};
    use crate::storage::MemoryStore;

    /// Service wired to in-memory doubles, with direct handles to each.
    pub struct Harness {
        pub background: Background,
        pub store: Arc<MemoryStore>,
        pub browser: Arc<RecordingBrowser>,
        pub alarms: Arc<ManualAlarms>,
        pub notifier: Arc<MemoryNotifier>,
    }

    pub fn harness() -> Harness {
        harness_with(RecordingBrowser::new(), Options::default())
    }

    pub fn harness_with(browser: RecordingBrowser, options: Options) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let browser = Arc::new(browser);
        let alarms = Arc::new(ManualAlarms::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let background = Background::new(
            Capabilities {
                store: store.clone(),
                browser: browser.clone(),
                alarms: alarms.clone(),
                notifier: notifier.clone(),
            },
            options,
        );
        Harness {
            background,
            store,
            browser,
            alarms,
            notifier,
        }
    }
}
