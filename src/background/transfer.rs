//! Export and import of stored sessions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use super::Background;
use crate::core::capacity;
use crate::core::key::SessionKey;
use crate::core::session::{Category, SessionRecord};
use crate::error::{Error, Result};
use crate::storage::read_list;

/// Document written by export and read by import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_sessions: Option<Vec<SessionRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_sessions: Option<Vec<SessionRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_sessions: Option<Vec<SessionRecord>>,
}

impl ExportDocument {
    /// Parse an import file.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the text is not JSON of the right shape or
    /// carries none of the three lists.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(text)
            .map_err(|e| Error::Validation(format!("invalid import file: {e}")))?;
        if Category::ALL.iter().all(|c| doc.list(*c).is_none()) {
            return Err(Error::Validation(
                "import file has no session lists".to_string(),
            ));
        }
        Ok(doc)
    }

    #[must_use]
    pub fn list(&self, category: Category) -> Option<&Vec<SessionRecord>> {
        match category {
            Category::Auto => self.auto_sessions.as_ref(),
            Category::Change => self.change_sessions.as_ref(),
            Category::Manual => self.manual_sessions.as_ref(),
        }
    }

    fn slot(&mut self, category: Category) -> &mut Option<Vec<SessionRecord>> {
        match category {
            Category::Auto => &mut self.auto_sessions,
            Category::Change => &mut self.change_sessions,
            Category::Manual => &mut self.manual_sessions,
        }
    }
}

/// Per-category counts after an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: HashMap<Category, usize>,
    pub stored: HashMap<Category, usize>,
}

impl Background {
    /// Every category in one document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn export_all(&self) -> Result<ExportDocument> {
        let mut doc = ExportDocument::default();
        for category in Category::ALL {
            *doc.slot(category) = Some(self.list_sessions(category).await?);
        }
        Ok(doc)
    }

    /// One session, under its category's key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key does not resolve.
    pub async fn export_session(&self, key: &SessionKey) -> Result<ExportDocument> {
        let record = self.resolve_session(key).await?;
        let mut doc = ExportDocument::default();
        *doc.slot(key.category) = Some(vec![record]);
        Ok(doc)
    }

    /// Append imported records to each category, then cap. All three lists
    /// are written in a single store operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn import(&self, doc: ExportDocument) -> Result<ImportSummary> {
        let cap = self.options().import_cap;
        let mut summary = ImportSummary::default();
        let mut entries = HashMap::new();

        for category in Category::ALL {
            let Some(incoming) = doc.list(category) else {
                continue;
            };
            let mut incoming = incoming.clone();
            for record in &mut incoming {
                record.ensure_id(category);
            }
            let existing: Vec<SessionRecord> = read_list(self.store(), category.storage_key()).await?;
            summary.imported.insert(category, incoming.len());

            let merged = capacity::merge(existing, incoming, cap);
            summary.stored.insert(category, merged.len());
            entries.insert(
                category.storage_key().to_string(),
                serde_json::to_value(&merged)?,
            );
        }

        if !entries.is_empty() {
            self.store().set(entries).await?;
        }
        info!(imported = ?summary.imported, "sessions imported");
        Ok(summary)
    }
}

/// Pretty JSON for an export file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_pretty_json(doc: &ExportDocument) -> Result<String> {
    let value: Value = serde_json::to_value(doc)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
