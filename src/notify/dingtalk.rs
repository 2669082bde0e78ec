use crate::domain_model::RunSummary;
use crate::settings::Notify;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, KeyInit, Mac};
use reqwest::Client;
use serde_json::{Value, json};
use sha2::Sha256;
use std::time::Duration;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook rejected message: {0}")]
    Rejected(String),
    #[error("invalid webhook secret")]
    Secret,
}

/// DingTalk group-robot webhook client. When a signing secret is configured,
/// each request carries `timestamp` and `sign` query parameters as the robot
/// API requires.
///
/// All public send methods swallow delivery failures: they log and return a
/// success flag, so a dead webhook can never fail a test run.
pub struct DingTalkNotifier {
    webhook: String,
    secret: Option<String>,
    client: Client,
}

impl DingTalkNotifier {
    pub fn new(webhook: impl Into<String>, secret: Option<String>) -> Self {
        DingTalkNotifier {
            webhook: webhook.into(),
            secret,
            client: Client::new(),
        }
    }

    pub fn from_settings(notify: &Notify) -> Self {
        Self::new(notify.webhook.clone(), notify.secret.clone())
    }

    /// `base64(hmac_sha256(secret, "{timestamp_ms}\n{secret}"))`, the robot
    /// API's signing scheme. URL-encoding is left to the query serializer.
    fn sign(secret: &str, timestamp_ms: i64) -> Result<String, NotifyError> {
        let string_to_sign = format!("{timestamp_ms}\n{secret}");
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| NotifyError::Secret)?;
        mac.update(string_to_sign.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    async fn post(&self, body: Value) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.webhook).timeout(SEND_TIMEOUT);

        if let Some(secret) = &self.secret {
            let timestamp = Utc::now().timestamp_millis();
            let sign = Self::sign(secret, timestamp)?;
            request = request.query(&[("timestamp", timestamp.to_string()), ("sign", sign)]);
        }

        let response: Value = request.json(&body).send().await?.json().await?;
        let errcode = response.get("errcode").and_then(Value::as_i64).unwrap_or(-1);
        if errcode == 0 {
            Ok(())
        } else {
            let errmsg = response
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            Err(NotifyError::Rejected(format!("errcode {errcode}: {errmsg}")))
        }
    }

    async fn send(&self, kind: &str, body: Value) -> bool {
        match self.post(body).await {
            Ok(()) => {
                info!(kind, "chat notification delivered");
                true
            }
            Err(e) => {
                warn!(kind, error = %e, "chat notification not delivered");
                false
            }
        }
    }

    pub async fn send_text(&self, content: &str, at_all: bool) -> bool {
        let body = json!({
            "msgtype": "text",
            "text": { "content": content },
            "at": { "isAtAll": at_all },
        });
        self.send("text", body).await
    }

    pub async fn send_markdown(&self, title: &str, text: &str) -> bool {
        let body = json!({
            "msgtype": "markdown",
            "markdown": { "title": title, "text": text },
        });
        self.send("markdown", body).await
    }

    /// Render and deliver an end-of-run report; @all when anything failed.
    pub async fn send_run_report(&self, summary: &RunSummary) -> bool {
        let body = json!({
            "msgtype": "markdown",
            "markdown": {
                "title": summary.title(),
                "text": summary.render_markdown(),
            },
            "at": { "isAtAll": !summary.all_passed() },
        });
        self.send("run-report", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_deterministic_per_timestamp() {
        let a = DingTalkNotifier::sign("SECxyz", 1_700_000_000_000).unwrap();
        let b = DingTalkNotifier::sign("SECxyz", 1_700_000_000_000).unwrap();
        let c = DingTalkNotifier::sign("SECxyz", 1_700_000_000_001).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sign_is_base64_of_a_sha256_mac() {
        let sign = DingTalkNotifier::sign("SECxyz", 1_700_000_000_000).unwrap();
        let raw = BASE64.decode(&sign).unwrap();
        assert_eq!(raw.len(), 32);
    }

    #[tokio::test]
    async fn unreachable_webhook_is_swallowed() {
        let notifier = DingTalkNotifier::new("http://127.0.0.1:1/robot/send", None);
        assert!(!notifier.send_text("ping", false).await);
    }
}
