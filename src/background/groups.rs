//! User-managed groups of sessions or links.

use chrono::Utc;
use tracing::{info, warn};

use super::{Background, RestoreSummary};
use crate::core::group::{GROUPS_KEY, Group, GroupKind};
use crate::error::{Error, Result};
use crate::storage::{read_list, write_list};

impl Background {
    /// Every stored group.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn groups(&self) -> Result<Vec<Group>> {
        read_list(self.store(), GROUPS_KEY).await
    }

    /// Validate and store a new group.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, no members or bad links.
    pub async fn create_group(&self, name: &str, kind: GroupKind) -> Result<Group> {
        let group = Group::new(self.ids().group_id(Utc::now()), name, kind)?;
        let mut groups = self.groups().await?;
        groups.push(group.clone());
        write_list(self.store(), GROUPS_KEY, &groups).await?;
        info!(id = %group.id, name = %group.name, members = group.len(), "group created");
        Ok(group)
    }

    /// Delete a group by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no group has that id.
    pub async fn delete_group(&self, id: &str) -> Result<Group> {
        let mut groups = self.groups().await?;
        let index = groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("group {id}")))?;
        let removed = groups.remove(index);
        write_list(self.store(), GROUPS_KEY, &groups).await?;
        info!(id, "group deleted");
        Ok(removed)
    }

    /// Open everything a group refers to. Session members that no longer
    /// resolve are skipped.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no group has that id.
    pub async fn restore_group(&self, id: &str) -> Result<RestoreSummary> {
        let group = self
            .groups()
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("group {id}")))?;

        match &group.kind {
            GroupKind::Session { sessions } => {
                let mut summary = RestoreSummary::default();
                for key in sessions {
                    match self.restore_session(key).await {
                        Ok(s) => summary += s,
                        Err(e) => warn!(group = id, %key, error = %e, "group member skipped"),
                    }
                }
                Ok(summary)
            }
            GroupKind::Custom { custom_links } => {
                let single = self.settings().await?.open_in_single_window;
                self.open_custom_urls(custom_links, single).await
            }
        }
    }
}
