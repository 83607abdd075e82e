//! Notifier that writes to the log.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::platform::traits::Notifier;

/// Emits notifications as `info` events on the `tabkeep::notify` target.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        info!(target: "tabkeep::notify", title, message, "notification");
        Ok(())
    }
}
