//! `tabkeep stats` command implementation.

use crate::background::Background;
use crate::core::stats::SessionStats;
use crate::error::Result;

/// Run the stats command.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn run(background: &Background) -> Result<()> {
    let stats = background.statistics().await?;
    print!("{}", render(&stats));
    Ok(())
}

fn render(stats: &SessionStats) -> String {
    format!(
        "Total sessions:      {}\nTotal tabs:          {}\nMost frequent site:  {}\n",
        stats.total_sessions,
        stats.total_tabs,
        stats.most_frequent_site.as_deref().unwrap_or("-")
    )
}
