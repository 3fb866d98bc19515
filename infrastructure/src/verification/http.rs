//! HTTP email verification adapter
//!
//! Talks to a pair of JSON endpoints: one that emails a code and one that
//! checks the entered code. Both answer 2xx on success; any other status
//! means the attempt failed.

use async_trait::async_trait;
use neetchat_application::{RemoteError, VerificationService};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Verification backed by two HTTP endpoints.
pub struct HttpVerificationService {
    send_code_url: String,
    verify_code_url: String,
    client: Client,
}

impl HttpVerificationService {
    pub fn new(send_code_url: impl Into<String>, verify_code_url: impl Into<String>) -> Self {
        Self {
            send_code_url: send_code_url.into(),
            verify_code_url: verify_code_url.into(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::new(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::new(failure_message(status.as_u16(), &body)))
    }
}

#[async_trait]
impl VerificationService for HttpVerificationService {
    async fn send_code(&self, email: &str) -> Result<(), RemoteError> {
        debug!("Requesting verification code");
        self.post(&self.send_code_url, serde_json::json!({ "email": email }))
            .await
    }

    async fn check_code(&self, email: &str, code: &str) -> Result<(), RemoteError> {
        debug!("Checking verification code");
        self.post(
            &self.verify_code_url,
            serde_json::json!({ "email": email, "code": code }),
        )
        .await
    }
}

/// Prefer the endpoint's own `message` field; fall back to the status code.
fn failure_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<FailureBody>(body).unwrap_or_default();
    match parsed.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => format!("verification service returned status {status}"),
    }
}

#[derive(Debug, Deserialize, Default)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}
