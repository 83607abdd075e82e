//! `tabkeep settings` subcommand implementations.

use crate::background::Background;
use crate::core::session::Category;
use crate::core::settings::Settings;
use crate::error::Result;

/// Show every setting.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn show(background: &Background) -> Result<()> {
    let settings = background.settings().await?;
    print!("{}", render(&settings));
    Ok(())
}

/// Change one setting by its stored key.
///
/// # Errors
///
/// Returns `Validation` for unknown keys or values.
pub async fn set(background: &Background, key: &str, value: &str) -> Result<()> {
    let stored = background.set_setting(key, value).await?;
    println!("{key} = {stored}");
    Ok(())
}

fn render(settings: &Settings) -> String {
    let mut out = format!(
        "theme                 {:?}\nnotificationsEnabled  {}\nautoBackupInterval    {} min\nopenInSingleWindow    {}\n",
        settings.theme,
        settings.notifications_enabled,
        settings.auto_backup_interval,
        settings.open_in_single_window
    );
    for category in Category::ALL {
        let c = settings.category(category);
        out.push_str(&format!(
            "{:<8} enabled={} max={}\n",
            category.as_str(),
            c.enabled,
            c.max
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::testing::harness;

    #[tokio::test]
    async fn set_then_show() {
        let h = harness();
        set(&h.background, "manualSessionsMax", "-3").await.unwrap();
        let settings = h.background.settings().await.unwrap();
        assert_eq!(settings.manual.max, 0);
        assert!(render(&settings).contains("manual   enabled=true max=0"));
    }
}
