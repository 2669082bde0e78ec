use crate::domain_model::*;
use crate::domain_port::*;
use crate::settings::Settings;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const STATE_FILE_SUFFIX: &str = "_state.json";

#[derive(Debug, thiserror::Error)]
pub enum AuthCacheError {
    #[error("no valid auth state for key {0:?}")]
    Missing(String),
    #[error("stored session for key {0:?} was rejected by the application")]
    Rejected(String),
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    #[error("auth state io error: {0}")]
    Io(#[from] io::Error),
    #[error("auth state codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Non-sensitive view of one cached record, for listings and diagnostics.
#[derive(Debug, Clone)]
pub struct AuthStateInfo {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
    pub cookie_count: usize,
    pub url: Option<String>,
}

/// File-per-key store for captured browser sessions. A record is valid while
/// `now - saved_at < ttl`; expired records are treated as absent and purged
/// on the check that finds them.
pub struct AuthStateCache {
    dir: PathBuf,
    ttl_secs: u64,
}

impl AuthStateCache {
    /// `dir` is the record directory, created if missing. The directory is an
    /// explicit argument on purpose: no process-global location.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AuthCacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(AuthStateCache {
            dir,
            ttl_secs: DEFAULT_TTL_SECS,
        })
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AuthCacheError> {
        Ok(Self::new(&settings.auth.dir)?.with_ttl_secs(settings.auth.ttl_hours * 3600))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn state_file(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe_key}{STATE_FILE_SUFFIX}"))
    }

    /// Absent maps to `None`. A file that no longer parses is treated as
    /// absent as well, so a corrupt record sends the caller back to a fresh
    /// login instead of wedging every run.
    fn read_record(&self, key: &str) -> Result<Option<AuthStateRecord>, AuthCacheError> {
        let path = self.state_file(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "unreadable auth state record");
                Ok(None)
            }
        }
    }

    fn remove_record(&self, key: &str) -> Result<(), AuthCacheError> {
        match fs::remove_file(self.state_file(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// True iff a non-expired record exists for `key`. An expired record
    /// found here is deleted before returning false.
    pub fn is_valid(&self, key: &str) -> Result<bool, AuthCacheError> {
        match self.read_record(key)? {
            None => Ok(false),
            Some(record) if record.is_expired() => {
                info!(key, "auth state expired, purging");
                self.remove_record(key)?;
                Ok(false)
            }
            Some(_) => Ok(true),
        }
    }

    /// Capture the live session and overwrite the record for `key`, stamped
    /// with the current time.
    pub async fn save(
        &self,
        session: &dyn BrowserSession,
        key: &str,
    ) -> Result<(), AuthCacheError> {
        let payload = session.capture().await?;
        if payload.is_empty() {
            warn!(key, "captured session payload is empty");
        }
        let url = session.current_url().await.ok();
        let record = AuthStateRecord::new(payload, self.ttl_secs, url);

        let path = self.state_file(key);
        fs::write(&path, serde_json::to_vec_pretty(&record)?)?;
        info!(key, path = %path.display(), "auth state saved");
        Ok(())
    }

    /// Restore the record for `key` into a fresh context and navigate to
    /// `base_url`. `Missing` when no valid record exists, `Rejected` when the
    /// application bounces the restored session; the record is purged in the
    /// rejected case so the next validity check sees a miss.
    pub async fn load(
        &self,
        session: &dyn BrowserSession,
        key: &str,
        base_url: &str,
    ) -> Result<(), AuthCacheError> {
        let record = match self.read_record(key)? {
            None => return Err(AuthCacheError::Missing(key.to_string())),
            Some(record) if record.is_expired() => {
                info!(key, "auth state expired, purging");
                self.remove_record(key)?;
                return Err(AuthCacheError::Missing(key.to_string()));
            }
            Some(record) => record,
        };

        match session.restore(&record.payload, base_url).await? {
            SessionAcceptance::Accepted => {
                debug!(key, base_url, "auth state restored");
                Ok(())
            }
            SessionAcceptance::Rejected => {
                warn!(key, base_url, "stored session rejected, purging");
                self.remove_record(key)?;
                Err(AuthCacheError::Rejected(key.to_string()))
            }
        }
    }

    /// Delete the record for `key`; absent is not an error.
    pub fn clear(&self, key: &str) -> Result<(), AuthCacheError> {
        self.remove_record(key)?;
        info!(key, "auth state cleared");
        Ok(())
    }

    /// Delete every record in the directory.
    pub fn clear_all(&self) -> Result<(), AuthCacheError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_state_file(&path) {
                fs::remove_file(&path)?;
            }
        }
        info!(dir = %self.dir.display(), "all auth states cleared");
        Ok(())
    }

    pub fn info(&self, key: &str) -> Result<Option<AuthStateInfo>, AuthCacheError> {
        Ok(self.read_record(key)?.map(|record| AuthStateInfo {
            key: key.to_string(),
            saved_at: record.saved_at,
            expires_at: record.expires_at(),
            expired: record.is_expired(),
            cookie_count: record.payload.cookies.len(),
            url: record.url,
        }))
    }

    /// Metadata for every record on disk, expired ones included. Keys are the
    /// sanitized form used in the file names.
    pub fn list(&self) -> Result<Vec<AuthStateInfo>, AuthCacheError> {
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !is_state_file(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = name.trim_end_matches(STATE_FILE_SUFFIX);
            if let Some(info) = self.info(key)? {
                infos.push(info);
            }
        }
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(infos)
    }
}

fn is_state_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(STATE_FILE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::FakeBrowserSession;
    use tempfile::tempdir;

    const BASE: &str = "https://demo.local";

    fn cache_in(dir: &Path) -> AuthStateCache {
        AuthStateCache::new(dir).unwrap()
    }

    #[tokio::test]
    async fn unknown_key_is_invalid_and_load_reports_missing() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        assert!(!cache.is_valid("admin").unwrap());
        let err = cache.load(&browser, "admin", BASE).await.unwrap_err();
        assert!(matches!(err, AuthCacheError::Missing(_)));
    }

    #[tokio::test]
    async fn save_then_load_restores_an_authenticated_session() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        cache.save(&browser, "admin").await.unwrap();
        assert!(cache.is_valid("admin").unwrap());

        browser.logout();
        cache.load(&browser, "admin", BASE).await.unwrap();
        assert_eq!(
            browser.current_url().await.unwrap(),
            format!("{BASE}/dashboard")
        );
    }

    #[tokio::test]
    async fn loaded_payload_matches_saved_payload() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        let saved = browser.capture().await.unwrap();
        cache.save(&browser, "admin").await.unwrap();
        browser.logout();

        cache.load(&browser, "admin", BASE).await.unwrap();
        assert_eq!(browser.capture().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn expired_record_is_invalid_and_purged() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path()).with_ttl_secs(1);
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        cache.save(&browser, "admin").await.unwrap();

        // Rewrite the record as if it had been saved ttl+1 seconds ago.
        let path = cache.state_file("admin");
        let mut record: AuthStateRecord =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        record.saved_at = Utc::now() - chrono::Duration::seconds(2);
        fs::write(&path, serde_json::to_vec_pretty(&record).unwrap()).unwrap();

        assert!(!cache.is_valid("admin").unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_and_clear_all_invalidate_keys() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        for key in ["admin", "teacher"] {
            browser.login(BASE, key);
            cache.save(&browser, key).await.unwrap();
        }

        cache.clear("admin").unwrap();
        assert!(!cache.is_valid("admin").unwrap());
        assert!(cache.is_valid("teacher").unwrap());

        // Clearing an absent key is not an error.
        cache.clear("admin").unwrap();

        cache.clear_all().unwrap();
        assert!(!cache.is_valid("teacher").unwrap());
        assert!(cache.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_session_is_reported_and_purged() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        cache.save(&browser, "admin").await.unwrap();
        browser.revoke_all();

        let err = cache.load(&browser, "admin", BASE).await.unwrap_err();
        assert!(matches!(err, AuthCacheError::Rejected(_)));
        assert!(!cache.is_valid("admin").unwrap());
    }

    #[tokio::test]
    async fn keys_are_sanitized_for_file_names() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        cache.save(&browser, "role/admin:1").await.unwrap();

        assert!(cache.is_valid("role/admin:1").unwrap());
        assert!(dir.path().join("role_admin_1_state.json").exists());
    }

    #[tokio::test]
    async fn corrupt_record_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        fs::write(cache.state_file("admin"), b"not json").unwrap();
        assert!(!cache.is_valid("admin").unwrap());
    }

    #[tokio::test]
    async fn list_reports_saved_records() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());
        let browser = FakeBrowserSession::new();

        browser.login(BASE, "admin");
        cache.save(&browser, "admin").await.unwrap();

        let infos = cache.list().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].key, "admin");
        assert_eq!(infos[0].cookie_count, 1);
        assert!(!infos[0].expired);
    }
}
