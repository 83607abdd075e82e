//! Usage statistics over stored sessions.

use std::collections::HashMap;
use tracing::debug;
use url::Url;

use crate::core::session::SessionRecord;

/// Aggregate numbers shown on the statistics page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_tabs: usize,
    /// Host seen in the most tabs. Ties go to the host seen first.
    pub most_frequent_site: Option<String>,
}

impl SessionStats {
    /// Compute statistics over `sessions`.
    pub fn collect<'a>(sessions: impl IntoIterator<Item = &'a SessionRecord>) -> Self {
        let mut stats = Self::default();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for session in sessions {
            stats.total_sessions += 1;
            for tab in session.windows.iter().flat_map(|w| &w.tabs) {
                stats.total_tabs += 1;
                let host = match Url::parse(&tab.url) {
                    Ok(url) => url.host_str().map(String::from),
                    Err(e) => {
                        debug!(url = %tab.url, error = %e, "skipping unparseable tab url");
                        None
                    }
                };
                if let Some(host) = host {
                    let count = counts.entry(host.clone()).or_insert(0);
                    if *count == 0 {
                        order.push(host);
                    }
                    *count += 1;
                }
            }
        }

        let mut best: Option<(&String, usize)> = None;
        for host in &order {
            let count = counts[host];
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((host, count));
            }
        }
        stats.most_frequent_site = best.map(|(host, _)| host.clone());
        stats
    }
}
