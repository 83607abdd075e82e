//! `tabkeep run` command implementation.
//!
//! The long-lived native host. Each stdin line is either a request
//! (`{"action": …}`), answered with one JSON line on stdout, or a browser
//! event (`{"event": …}`) fed to the change debouncer.

use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::message::write_json;
use crate::background::{Background, BrowserEvent, Request, Response};
use crate::error::{Error, Result};
use crate::platform::AlarmReceiver;

/// How often the store is checked for entries scheduled by other processes.
const RESYNC_PERIOD: Duration = Duration::from_secs(30);

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
    Request(Request),
    Event(BrowserEvent),
}

/// Run the service until stdin closes.
///
/// # Errors
///
/// Returns an error if the service cannot start or stdin/stdout fail.
pub async fn run(background: &Background, alarms: AlarmReceiver) -> Result<()> {
    background.start().await?;

    let alarm_loop = tokio::spawn({
        let background = background.clone();
        async move { background.run(alarms).await }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut resync = tokio::time::interval(RESYNC_PERIOD);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Some(response) = handle_line(background, &line).await {
                    write_json(&response)?;
                }
            }
            _ = resync.tick() => {
                match background.sync_alarms().await {
                    Ok(0) => {}
                    Ok(armed) => debug!(armed, "picked up scheduled entries"),
                    Err(e) => warn!(error = %e, "cannot sync alarms"),
                }
            }
        }
    }

    info!("stdin closed; stopping");
    alarm_loop.abort();
    Ok(())
}

/// Handle one input line. Requests and malformed lines get a response;
/// events and blank lines do not.
pub async fn handle_line(background: &Background, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<Incoming>(line) {
        Ok(Incoming::Request(request)) => Some(background.handle(request).await),
        Ok(Incoming::Event(event)) => {
            background.on_browser_event(&event);
            None
        }
        Err(e) => {
            warn!(error = %e, "unparseable input line");
            Some(Response::failure(&Error::Validation(format!(
                "invalid input: {e}"
            ))))
        }
    }
}
