//! Browser adapter that drives a browser executable from the command line.
//!
//! Opening windows and tabs spawns the configured browser command with the
//! configured arguments. Enumerating windows reads the JSON dump the
//! extension side keeps in `windows_file` (the output of a `getAll` query
//! with tabs populated).

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::BrowserConfig;
use crate::error::{Error, Result};
use crate::platform::traits::{Browser, NewTab, NewWindow, OpenWindow, TabId, WindowId};

/// [`Browser`] backed by a browser executable.
#[derive(Debug)]
pub struct CommandBrowser {
    config: BrowserConfig,
    next_id: AtomicI64,
}

impl CommandBrowser {
    #[must_use]
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            next_id: AtomicI64::new(1),
        }
    }

    async fn launch(&self, args: &[String], url: &str) -> Result<()> {
        debug!(command = %self.config.command, ?args, url, "launching browser");
        let status = Command::new(&self.config.command)
            .args(args)
            .arg(url)
            .status()
            .await
            .map_err(|e| Error::Platform(format!("failed to run {}: {e}", self.config.command)))?;

        if !status.success() {
            return Err(Error::Platform(format!(
                "{} exited with {status} opening {url}",
                self.config.command
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Browser for CommandBrowser {
    async fn windows(&self) -> Result<Vec<OpenWindow>> {
        let Some(path) = &self.config.windows_file else {
            warn!("no windows file configured; nothing to capture");
            return Ok(Vec::new());
        };
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "windows file missing; nothing to capture");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::Platform(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_str(&contents)
            .map_err(|e| Error::Platform(format!("malformed {}: {e}", path.display())))
    }

    async fn create_window(&self, window: NewWindow) -> Result<WindowId> {
        self.launch(&self.config.new_window_args, &window.url).await?;
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn create_tab(&self, tab: NewTab) -> Result<TabId> {
        self.launch(&self.config.new_tab_args, &tab.url).await?;
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(windows_file: Option<std::path::PathBuf>) -> BrowserConfig {
        BrowserConfig {
            command: "true".to_string(),
            new_window_args: vec![],
            new_tab_args: vec![],
            windows_file,
        }
    }

    #[tokio::test]
    async fn missing_windows_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let browser = CommandBrowser::new(config(Some(temp.path().join("windows.json"))));
        assert!(browser.windows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_windows_dump() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("windows.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "focused": true, "type": "normal",
                 "tabs": [{"id": 10, "url": "https://a.test", "title": "A"}]}]"#,
        )
        .unwrap();

        let browser = CommandBrowser::new(config(Some(path)));
        let windows = browser.windows().await.unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].tabs[0].url.as_deref(), Some("https://a.test"));
    }

    #[tokio::test]
    async fn malformed_dump_is_platform_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("windows.json");
        std::fs::write(&path, "{").unwrap();

        let browser = CommandBrowser::new(config(Some(path)));
        assert!(matches!(browser.windows().await, Err(Error::Platform(_))));
    }

    #[tokio::test]
    async fn missing_command_is_platform_error() {
        let mut cfg = config(None);
        cfg.command = "/nonexistent/tabkeep-browser".to_string();
        let browser = CommandBrowser::new(cfg);
        let result = browser
            .create_window(NewWindow {
                url: "https://a.test".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::Platform(_))));
    }
}
