//! User-defined groups of sessions or links.

use serde::{Deserialize, Serialize};

use crate::core::key::SessionKey;
use crate::core::validate;
use crate::error::{Error, Result};

/// Persisted key of the group list.
pub const GROUPS_KEY: &str = "groups";

/// A named collection restored together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// `group_{epochMillis}`
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: GroupKind,
}

/// Group members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GroupKind {
    /// Stored sessions, resolved when the group is restored.
    Session { sessions: Vec<SessionKey> },
    /// Fixed links.
    Custom {
        #[serde(rename = "customLinks")]
        custom_links: Vec<String>,
    },
}

impl Group {
    /// Validate user input and build a group.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, an empty member list or any
    /// link that does not parse.
    pub fn new(id: String, name: &str, kind: GroupKind) -> Result<Self> {
        let name = validate::require_name(name)?;
        let kind = match kind {
            GroupKind::Session { sessions } => {
                if sessions.is_empty() {
                    return Err(Error::Validation(
                        "select at least one session".to_string(),
                    ));
                }
                GroupKind::Session { sessions }
            }
            GroupKind::Custom { custom_links } => GroupKind::Custom {
                custom_links: validate::validate_urls(&custom_links)?,
            },
        };
        Ok(Self { id, name, kind })
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.kind {
            GroupKind::Session { sessions } => sessions.len(),
            GroupKind::Custom { custom_links } => custom_links.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
