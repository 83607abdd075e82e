//! `tabkeep list` command implementation.

use crate::background::Background;
use crate::core::key::SessionKey;
use crate::core::session::{Category, SessionRecord};
use crate::error::Result;
use crate::storage::file::get_tabkeep_home;

/// Run the list command.
///
/// Shows stored sessions per category with the key that addresses each.
/// With a query, only sessions whose name matches are shown.
///
/// # Errors
///
/// Returns an error if the category is unknown or the store fails.
pub async fn run(
    background: &Background,
    category: Option<&str>,
    query: Option<&str>,
) -> Result<()> {
    let rows: Vec<(SessionKey, SessionRecord)> = match query {
        Some(query) => background.find_sessions(query).await?,
        None => {
            let categories = match category {
                Some(c) => vec![c.parse::<Category>()?],
                None => Category::ALL.to_vec(),
            };
            let mut rows = Vec::new();
            for category in categories {
                for (i, record) in background.list_sessions(category).await?.into_iter().enumerate() {
                    rows.push((SessionKey::index(category, i), record));
                }
            }
            rows
        }
    };

    if rows.is_empty() {
        println!("No sessions found.");
        println!("\nSessions are stored in: {}", get_tabkeep_home().display());
        return Ok(());
    }

    println!("{:<20} {:<26} {:>7} {:>5}", "Key", "Name", "Windows", "Tabs");
    println!("{}", "─".repeat(61));
    for (key, record) in &rows {
        println!("{}", format_row(key, record));
    }
    println!("{}", "─".repeat(61));
    println!("Showing {} session(s)", rows.len());

    Ok(())
}

/// Maximum length for the name column.
const NAME_LEN: usize = 26;

fn format_row(key: &SessionKey, record: &SessionRecord) -> String {
    let mut name = record.display_name();
    if name.chars().count() > NAME_LEN {
        name = name.chars().take(NAME_LEN - 3).collect::<String>() + "...";
    }
    format!(
        "{:<20} {:<26} {:>7} {:>5}",
        key.to_string(),
        name,
        record.windows.len(),
        record.tab_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn long_names_are_truncated() {
        let record = SessionRecord::new("manual_1".to_string(), Utc::now(), vec![])
            .with_name(Some("a very long session name that keeps going"));
        let row = format_row(&SessionKey::index(Category::Manual, 0), &record);
        assert!(row.starts_with("manualSessions_0"));
        assert!(row.contains("..."));
    }

    #[test]
    fn multibyte_names_do_not_panic() {
        let record = SessionRecord::new("manual_1".to_string(), Utc::now(), vec![])
            .with_name(Some(&"сессия".repeat(10)));
        let row = format_row(&SessionKey::index(Category::Manual, 0), &record);
        assert!(row.contains("..."));
    }
}
