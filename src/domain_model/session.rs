use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single browser cookie, shaped the way drivers export them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix seconds; `None` for session cookies.
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
}

impl Cookie {
    pub fn session(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            expires: None,
            http_only: false,
            secure: false,
        }
    }
}

/// Cookies plus web storage captured from an authenticated browser context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub cookies: Vec<Cookie>,
    pub local_storage: BTreeMap<String, String>,
    pub session_storage: BTreeMap<String, String>,
}

impl SessionPayload {
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.local_storage.is_empty() && self.session_storage.is_empty()
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }
}

pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// One persisted auth state: the payload plus enough metadata to decide
/// whether it is still worth restoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateRecord {
    pub payload: SessionPayload,
    pub saved_at: DateTime<Utc>,
    pub ttl_secs: u64,
    /// URL the session was captured at, kept for diagnostics.
    #[serde(default)]
    pub url: Option<String>,
}

impl AuthStateRecord {
    pub fn new(payload: SessionPayload, ttl_secs: u64, url: Option<String>) -> Self {
        AuthStateRecord {
            payload,
            saved_at: Utc::now(),
            ttl_secs,
            url,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.saved_at + Duration::seconds(self.ttl_secs as i64)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
