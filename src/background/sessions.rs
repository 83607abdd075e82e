//! Browsing and managing stored sessions.

use tracing::info;

use super::Background;
use crate::core::key::SessionKey;
use crate::core::session::{Category, SessionRecord};
use crate::core::stats::SessionStats;
use crate::error::{Error, Result};
use crate::storage::{read_list, write_list};

impl Background {
    /// Stored sessions of `category`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn list_sessions(&self, category: Category) -> Result<Vec<SessionRecord>> {
        read_list(self.store(), category.storage_key()).await
    }

    /// Delete the session `key` resolves to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key does not resolve.
    pub async fn delete_session(&self, key: &SessionKey) -> Result<SessionRecord> {
        let mut list = self.list_sessions(key.category).await?;
        let index = key
            .position(&list)
            .ok_or_else(|| Error::NotFound(format!("session {key}")))?;
        let removed = list.remove(index);
        write_list(self.store(), key.category.storage_key(), &list).await?;
        info!(%key, id = %removed.id, "session deleted");
        Ok(removed)
    }

    /// Sessions whose display name contains `query`, ignoring case, with
    /// the key that addresses each.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn find_sessions(&self, query: &str) -> Result<Vec<(SessionKey, SessionRecord)>> {
        let needle = query.trim().to_lowercase();
        let mut found = Vec::new();
        for category in Category::ALL {
            for (i, record) in self.list_sessions(category).await?.into_iter().enumerate() {
                if record.display_name().to_lowercase().contains(&needle) {
                    found.push((SessionKey::index(category, i), record));
                }
            }
        }
        Ok(found)
    }

    /// Statistics over every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn statistics(&self) -> Result<SessionStats> {
        let mut all = Vec::new();
        for category in Category::ALL {
            all.extend(self.list_sessions(category).await?);
        }
        Ok(SessionStats::collect(&all))
    }
}
