use crate::domain_port::{BrowserError, BrowserSession};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    #[error("screenshot io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes viewport captures into one directory with timestamped names,
/// typically from a test-failure hook.
pub struct ScreenshotHelper {
    dir: PathBuf,
}

impl ScreenshotHelper {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ScreenshotError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(ScreenshotHelper { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(
        &self,
        session: &dyn BrowserSession,
        label: &str,
    ) -> Result<PathBuf, ScreenshotError> {
        let bytes = session.screenshot().await?;

        let safe_label: String = label
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = self.dir.join(format!("{safe_label}_{stamp}.png"));

        fs::write(&path, bytes)?;
        info!(label, path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Failure-hook variant: a screenshot that cannot be taken must not turn
    /// into a second failure, so errors are logged and dropped.
    pub async fn try_save(&self, session: &dyn BrowserSession, label: &str) -> Option<PathBuf> {
        match self.save(session, label).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(label, error = %e, "screenshot not saved");
                None
            }
        }
    }
}
