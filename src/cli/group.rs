//! `tabkeep group` subcommand implementations.

use crate::background::Background;
use crate::cli::restore::describe;
use crate::core::group::{Group, GroupKind};
use crate::core::key::SessionKey;
use crate::error::{Error, Result};

/// Create a group from session keys or links (not both).
///
/// # Errors
///
/// Returns `Validation` for a bad name, no members, or both kinds given;
/// `InvalidKey` for a malformed session key.
pub async fn create(
    background: &Background,
    name: &str,
    sessions: &[String],
    urls: Vec<String>,
) -> Result<()> {
    let kind = match (sessions.is_empty(), urls.is_empty()) {
        (false, true) => GroupKind::Session {
            sessions: sessions
                .iter()
                .map(|s| s.parse::<SessionKey>())
                .collect::<Result<_>>()?,
        },
        (true, _) => GroupKind::Custom { custom_links: urls },
        (false, false) => {
            return Err(Error::Validation(
                "a group holds either sessions or links, not both".to_string(),
            ));
        }
    };
    let group = background.create_group(name, kind).await?;
    println!("Created {} ({})", group.id, group.name);
    Ok(())
}

/// List groups.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn list(background: &Background) -> Result<()> {
    let groups = background.groups().await?;
    if groups.is_empty() {
        println!("No groups.");
        return Ok(());
    }
    for group in &groups {
        println!("{}", format_group(group));
    }
    Ok(())
}

/// Restore a group.
///
/// # Errors
///
/// Returns `NotFound` for an unknown group.
pub async fn restore(background: &Background, id: &str) -> Result<()> {
    let summary = background.restore_group(id).await?;
    println!("{}", describe(&summary));
    Ok(())
}

/// Delete a group.
///
/// # Errors
///
/// Returns `NotFound` for an unknown group.
pub async fn delete(background: &Background, id: &str) -> Result<()> {
    let group = background.delete_group(id).await?;
    println!("Deleted {} ({})", group.id, group.name);
    Ok(())
}

fn format_group(group: &Group) -> String {
    let what = match &group.kind {
        GroupKind::Session { sessions } => format!("{} session(s)", sessions.len()),
        GroupKind::Custom { custom_links } => format!("{} link(s)", custom_links.len()),
    };
    format!("{:<20} {:<24} {what}", group.id, group.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::testing::harness;

    #[tokio::test]
    async fn session_group_from_keys() {
        let h = harness();
        create(
            &h.background,
            "Morning",
            &["autoSessions_0".to_string(), "manual_1700000000000".to_string()],
            vec![],
        )
        .await
        .unwrap();

        let groups = h.background.groups().await.unwrap();
        assert_eq!(groups[0].len(), 2);
        assert!(format_group(&groups[0]).ends_with("2 session(s)"));
    }

    #[tokio::test]
    async fn both_kinds_rejected() {
        let h = harness();
        let result = create(
            &h.background,
            "Mixed",
            &["autoSessions_0".to_string()],
            vec!["https://a.test".to_string()],
        )
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn empty_group_rejected() {
        let h = harness();
        assert!(create(&h.background, "Empty", &[], vec![]).await.is_err());
    }
}
