//! `tabkeep restore` and `tabkeep delete` command implementations.

use crate::background::{Background, RestoreSummary};
use crate::core::key::SessionKey;
use crate::error::Result;

/// Run the restore command.
///
/// Restores a whole session, or one of its windows when `window` is set.
///
/// # Errors
///
/// Returns an error if the key is malformed or does not resolve, or the
/// browser fails.
pub async fn run(background: &Background, key: &str, window: Option<usize>) -> Result<()> {
    let key: SessionKey = key.parse()?;
    let summary = match window {
        Some(index) => background.restore_session_window(&key, index).await?,
        None => background.restore_session(&key).await?,
    };
    println!("{}", describe(&summary));
    Ok(())
}

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the key is malformed or does not resolve.
pub async fn delete(background: &Background, key: &str) -> Result<()> {
    let key: SessionKey = key.parse()?;
    let removed = background.delete_session(&key).await?;
    println!("Deleted {} ({})", removed.id, removed.display_name());
    Ok(())
}

pub(crate) fn describe(summary: &RestoreSummary) -> String {
    let mut line = format!(
        "Opened {} window(s), {} tab(s)",
        summary.windows_created, summary.tabs_created
    );
    let failed = summary.windows_failed + summary.tabs_failed;
    if failed > 0 {
        line.push_str(&format!(", {failed} failed"));
    }
    if summary.windows_skipped > 0 {
        line.push_str(&format!(", {} empty window(s) skipped", summary.windows_skipped));
    }
    line
}
