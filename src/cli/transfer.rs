//! `tabkeep export` and `tabkeep import` command implementations.

use std::path::Path;

use crate::background::Background;
use crate::background::transfer::{ExportDocument, to_pretty_json};
use crate::core::key::SessionKey;
use crate::core::session::Category;
use crate::error::Result;

/// Run the export command.
///
/// Writes every category, or the one session `key` names, as JSON to
/// `output` or stdout.
///
/// # Errors
///
/// Returns an error if the key does not resolve or the file cannot be
/// written.
pub async fn export(background: &Background, key: Option<&str>, output: Option<&Path>) -> Result<()> {
    let doc = match key {
        Some(key) => background.export_session(&key.parse::<SessionKey>()?).await?,
        None => background.export_all().await?,
    };
    let json = to_pretty_json(&doc)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json + "\n").await?;
            println!("Exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Run the import command.
///
/// # Errors
///
/// Returns `Validation` if the file is not an export document, or an
/// error if it cannot be read or the store fails.
pub async fn import(background: &Background, input: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(input).await?;
    let doc = ExportDocument::parse(&text)?;
    let summary = background.import(doc).await?;

    for category in Category::ALL {
        if let Some(imported) = summary.imported.get(&category) {
            let stored = summary.stored.get(&category).copied().unwrap_or_default();
            println!("{category}: imported {imported}, now {stored} stored");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::testing::harness;
    use crate::error::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("export.json");

        let source = harness();
        source
            .background
            .capture_session(Category::Manual)
            .await
            .unwrap();
        export(&source.background, None, Some(&path)).await.unwrap();

        let target = harness();
        import(&target.background, &path).await.unwrap();
        assert_eq!(
            target.background.list_sessions(Category::Manual).await.unwrap(),
            source.background.list_sessions(Category::Manual).await.unwrap()
        );
    }

    #[tokio::test]
    async fn import_rejects_other_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("other.json");
        std::fs::write(&path, r#"{"groups": []}"#).unwrap();

        let h = harness();
        assert!(matches!(
            import(&h.background, &path).await,
            Err(Error::Validation(_))
        ));
    }
}
