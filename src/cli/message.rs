//! `tabkeep message` command implementation.

use serde::Serialize;
use std::io::{self, Read, Write};
use tracing::warn;

use crate::background::{Background, Request, Response};
use crate::error::{Error, Result};

/// Run the message command.
///
/// Reads one JSON request from stdin, handles it, and writes the JSON
/// response to stdout. Unparseable input gets a failure response.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or stdout cannot be written.
pub async fn run(background: &Background) -> Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let response = respond(background, &input).await;
    write_json(&response)
}

/// Handle one raw request.
pub async fn respond(background: &Background, input: &str) -> Response {
    match serde_json::from_str::<Request>(input) {
        Ok(request) => background.handle(request).await,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            Response::failure(&Error::Validation(format!("invalid request: {e}")))
        }
    }
}

/// Write a serializable value as one JSON line on stdout.
pub(crate) fn write_json<T: Serialize>(output: &T) -> Result<()> {
    let json = serde_json::to_string(output)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
