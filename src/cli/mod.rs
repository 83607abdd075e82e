//! CLI command implementations.

pub mod group;
pub mod list;
pub mod message;
pub mod restore;
pub mod save;
pub mod schedule;
pub mod service;
pub mod settings;
pub mod stats;
pub mod transfer;

use std::sync::Arc;

use crate::background::{Background, Capabilities};
use crate::config::Config;
use crate::error::Result;
use crate::platform::{AlarmReceiver, CommandBrowser, LogNotifier, TokioAlarms};
use crate::storage::FileStore;

/// Wire the background service to the file store and the configured
/// browser.
///
/// Alarms armed here live only as long as the process. One-shot commands
/// leave scheduled entries in the store; `tabkeep run` arms them.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created.
pub fn open(config: &Config) -> Result<(Background, AlarmReceiver)> {
    let store = FileStore::new(&config.storage.path)?;
    let (alarms, fired) = TokioAlarms::new();
    let background = Background::new(
        Capabilities {
            store: Arc::new(store),
            browser: Arc::new(CommandBrowser::new(config.browser.clone())),
            alarms: Arc::new(alarms),
            notifier: Arc::new(LogNotifier),
        },
        config.options(),
    );
    Ok((background, fired))
}
