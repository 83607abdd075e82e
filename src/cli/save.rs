//! `tabkeep save` command implementation.

use crate::background::{Background, CaptureRequest};
use crate::core::session::Category;
use crate::error::{Error, Result};
use crate::platform::WindowId;

/// Run the save command.
///
/// Captures the open windows into `category` (manual by default).
///
/// # Errors
///
/// Returns an error if the category is unknown or the capture fails.
pub async fn run(
    background: &Background,
    category: Option<&str>,
    name: Option<String>,
    windows: Vec<WindowId>,
) -> Result<()> {
    let category = category.map_or(Ok(Category::Manual), |c| c.parse::<Category>())?;
    let request = CaptureRequest {
        name,
        window_ids: (!windows.is_empty()).then_some(windows),
    };

    match background.capture_with(category, request).await? {
        Some(record) => {
            println!(
                "Saved {} ({} window(s), {} tab(s))",
                record.id,
                record.windows.len(),
                record.tab_count()
            );
            Ok(())
        }
        None => Err(Error::Validation(format!(
            "{category} sessions are disabled (set {} to true)",
            category.enabled_key()
        ))),
    }
}
