//! `tabkeep schedule`, `scheduled` and `cancel` command implementations.

use chrono::{DateTime, Local};

use crate::background::Background;
use crate::core::key::SessionKey;
use crate::core::schedule::{ScheduleKind, ScheduledEntry};
use crate::core::validate;
use crate::error::{Error, Result};

/// Run the schedule command.
///
/// Exactly one of `session` and `urls` must be given. The entry is stored
/// and fires while `tabkeep run` is running.
///
/// # Errors
///
/// Returns `Validation` for a bad time or target, `NotFound` for an
/// unknown session.
pub async fn run(
    background: &Background,
    at: &str,
    session: Option<&str>,
    urls: Vec<String>,
) -> Result<()> {
    let time = validate::parse_time(at)?;
    let kind = match (session, urls.is_empty()) {
        (Some(key), true) => ScheduleKind::Session {
            session_id: key.parse::<SessionKey>()?,
            session: None,
        },
        (None, false) => ScheduleKind::Custom { urls },
        _ => {
            return Err(Error::Validation(
                "give either --session or at least one --url".to_string(),
            ));
        }
    };

    let entry = background.schedule(kind, time).await?;
    println!("Scheduled {}: {}", entry.id, format_entry(&entry));
    Ok(())
}

/// Run the scheduled command: list pending entries.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn list(background: &Background) -> Result<()> {
    let entries = background.scheduled_entries().await?;
    if entries.is_empty() {
        println!("No scheduled sessions.");
        return Ok(());
    }
    for entry in &entries {
        println!("{:<24} {}", entry.id, format_entry(entry));
    }
    Ok(())
}

/// Run the cancel command.
///
/// # Errors
///
/// Returns `NotFound` if nothing was scheduled under `id`, or an error if
/// the store or alarm service fails.
pub async fn cancel(background: &Background, id: &str) -> Result<()> {
    if background.cancel_entry(id).await? {
        println!("Cancelled {id}.");
        Ok(())
    } else {
        Err(Error::NotFound(format!("scheduled entry {id}")))
    }
}

fn format_entry(entry: &ScheduledEntry) -> String {
    let local: DateTime<Local> = entry.time.into();
    format!("{}, at {}", entry.describe(), local.format("%Y-%m-%d %H:%M"))
}
