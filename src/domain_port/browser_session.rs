use crate::domain_model::SessionPayload;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("no live session to capture")]
    NoSession,
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("driver error: {0}")]
    Driver(String),
}

/// Whether the application honored a restored session after navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAcceptance {
    Accepted,
    /// Bounced, typically redirected back to a login page.
    Rejected,
}

/// The narrow seam between this crate and whatever drives the browser.
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    /// Snapshot cookies and web storage from the live context.
    async fn capture(&self) -> Result<SessionPayload, BrowserError>;

    /// Seed a fresh context with `payload`, navigate to `base_url`, and
    /// report whether the application accepted the session.
    async fn restore(
        &self,
        payload: &SessionPayload,
        base_url: &str,
    ) -> Result<SessionAcceptance, BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    /// PNG bytes of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;
}
