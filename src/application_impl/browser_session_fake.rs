use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashSet;
use std::sync::Mutex;

pub const FAKE_SESSION_COOKIE: &str = "fake-sid";

// PNG magic followed by filler; enough for helpers that only move bytes.
const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

#[derive(Default)]
struct FakeState {
    current: Option<SessionPayload>,
    current_url: String,
    valid_sids: HashSet<String>,
    login_seq: u32,
}

/// In-memory stand-in for a real driver. `login` issues a session cookie and
/// remembers it server-side; `restore` accepts any payload whose cookie is
/// still remembered. `revoke_all` simulates the application invalidating
/// every stored session.
// Minimal fake implementation for basic use only.
// Extend to simulate more error cases and configurable responses when needed.
pub struct FakeBrowserSession {
    state: Mutex<FakeState>,
}

impl FakeBrowserSession {
    pub fn new() -> Self {
        FakeBrowserSession {
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn login(&self, base_url: &str, username: &str) {
        let mut state = self.state.lock().unwrap();
        state.login_seq += 1;
        let sid = format!("{}:{}", username, state.login_seq);
        state.valid_sids.insert(sid.clone());

        let mut payload = SessionPayload::default();
        payload
            .cookies
            .push(Cookie::session(FAKE_SESSION_COOKIE, sid, domain_of(base_url)));
        payload
            .local_storage
            .insert("username".to_string(), username.to_string());
        state.current = Some(payload);
        state.current_url = format!("{}/dashboard", base_url.trim_end_matches('/'));
    }

    /// Drop the live context without invalidating the issued cookie.
    pub fn logout(&self) {
        let mut state = self.state.lock().unwrap();
        state.current = None;
        state.current_url.clear();
    }

    /// Server-side invalidation: every previously issued session is rejected
    /// from now on.
    pub fn revoke_all(&self) {
        let mut state = self.state.lock().unwrap();
        state.valid_sids.clear();
    }
}

impl Default for FakeBrowserSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeBrowserSession {
    async fn capture(&self) -> Result<SessionPayload, BrowserError> {
        let state = self.state.lock().unwrap();
        state.current.clone().ok_or(BrowserError::NoSession)
    }

    async fn restore(
        &self,
        payload: &SessionPayload,
        base_url: &str,
    ) -> Result<SessionAcceptance, BrowserError> {
        if base_url.is_empty() {
            return Err(BrowserError::Navigation("empty base url".to_string()));
        }
        let base = base_url.trim_end_matches('/');

        let accepted = payload
            .cookie(FAKE_SESSION_COOKIE)
            .is_some_and(|c| self.state.lock().unwrap().valid_sids.contains(&c.value));

        let mut state = self.state.lock().unwrap();
        if accepted {
            state.current = Some(payload.clone());
            state.current_url = format!("{base}/dashboard");
            Ok(SessionAcceptance::Accepted)
        } else {
            state.current = None;
            state.current_url = format!("{base}/login");
            Ok(SessionAcceptance::Rejected)
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let state = self.state.lock().unwrap();
        if state.current_url.is_empty() {
            Err(BrowserError::NoSession)
        } else {
            Ok(state.current_url.clone())
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let state = self.state.lock().unwrap();
        if state.current_url.is_empty() {
            return Err(BrowserError::NoSession);
        }
        Ok(FAKE_PNG.to_vec())
    }
}

fn domain_of(base_url: &str) -> String {
    base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
