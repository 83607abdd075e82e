//! Alarm service backed by tokio timers.
//!
//! Each armed alarm is a spawned task that sleeps until its first firing and
//! then sends the alarm name down a channel. The background service drains
//! that channel and dispatches by name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::Result;
use crate::platform::traits::{AlarmSchedule, Alarms};

/// Receiving end for names of fired alarms.
pub type AlarmReceiver = mpsc::UnboundedReceiver<String>;

/// Shortest repeat interval accepted for periodic alarms.
const MIN_PERIOD: Duration = Duration::from_secs(1);

struct Armed {
    generation: u64,
    schedule: AlarmSchedule,
    handle: JoinHandle<()>,
}

struct Inner {
    armed: Mutex<HashMap<String, Armed>>,
    next_generation: AtomicU64,
    fired: mpsc::UnboundedSender<String>,
}

impl Inner {
    /// Forget a one-shot alarm after it fired, unless it was re-armed.
    fn finish(&self, name: &str, generation: u64) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if armed.get(name).is_some_and(|a| a.generation == generation) {
            armed.remove(name);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let armed = self.armed.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, alarm) in armed.drain() {
            alarm.handle.abort();
        }
    }
}

/// Alarm service running on the tokio runtime.
///
/// Dropping the service disarms every alarm.
pub struct TokioAlarms {
    inner: Arc<Inner>,
}

impl TokioAlarms {
    /// Create the service and the channel fired alarm names arrive on.
    #[must_use]
    pub fn new() -> (Self, AlarmReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            armed: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
            fired: tx,
        });
        (Self { inner }, rx)
    }

    /// Names of every armed alarm.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let armed = self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
        armed.keys().cloned().collect()
    }
}

fn delay_until(when: DateTime<Utc>) -> Duration {
    (when - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}

async fn run_alarm(
    name: String,
    generation: u64,
    first: Duration,
    period: Option<Duration>,
    fired: mpsc::UnboundedSender<String>,
    inner: Weak<Inner>,
) {
    tokio::time::sleep(first).await;
    match period {
        None => {
            if let Some(inner) = inner.upgrade() {
                inner.finish(&name, generation);
            }
            trace!(alarm = %name, "one-shot alarm fired");
            let _ = fired.send(name);
        }
        Some(period) => loop {
            trace!(alarm = %name, "periodic alarm fired");
            if fired.send(name.clone()).is_err() {
                break;
            }
            tokio::time::sleep(period).await;
        },
    }
}

#[async_trait]
impl Alarms for TokioAlarms {
    async fn create(&self, name: &str, schedule: AlarmSchedule) -> Result<()> {
        let period = schedule.period.map(|p| p.max(MIN_PERIOD));
        let first = match (schedule.when, period) {
            (Some(when), _) => delay_until(when),
            (None, Some(period)) => period,
            (None, None) => Duration::ZERO,
        };
        let generation = self.inner.next_generation.fetch_add(1, Ordering::SeqCst);

        // Hold the lock across spawn so a zero-delay alarm cannot finish
        // before it is registered.
        let mut armed = self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = tokio::spawn(run_alarm(
            name.to_string(),
            generation,
            first,
            period,
            self.inner.fired.clone(),
            Arc::downgrade(&self.inner),
        ));
        let replaced = armed.insert(
            name.to_string(),
            Armed {
                generation,
                schedule,
                handle,
            },
        );
        drop(armed);

        if let Some(old) = replaced {
            old.handle.abort();
        }
        debug!(alarm = %name, delay = ?first, periodic = period.is_some(), "alarm armed");
        Ok(())
    }

    async fn get(&self, name: &str) -> Option<AlarmSchedule> {
        let armed = self.inner.armed.lock().unwrap_or_else(PoisonError::into_inner);
        armed
            .get(name)
            .filter(|a| !a.handle.is_finished())
            .map(|a| a.schedule)
    }

    async fn clear(&self, name: &str) -> Result<bool> {
        let removed = self
            .inner
            .armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        let Some(alarm) = removed else {
            return Ok(false);
        };
        let live = !alarm.handle.is_finished();
        alarm.handle.abort();
        debug!(alarm = %name, live, "alarm cleared");
        Ok(live)
    }
}
