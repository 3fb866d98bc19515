//! Chat-completions HTTP adapter
//!
//! Speaks the OpenAI-compatible `/v1/chat/completions` wire format used by
//! both supported presets. Each request carries exactly one user message;
//! conversation history never leaves the process.

use async_trait::async_trait;
use chrono::Utc;
use neetchat_application::{CompletionBackend, CompletionError, ProviderReply};
use neetchat_domain::ApiKey;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the endpoint expects the API key to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>`
    XApiKey,
    /// Custom header name
    Custom(String),
}

impl AuthScheme {
    /// Map a configured header name onto a scheme. `None` means Bearer.
    pub fn from_header_name(header: Option<&str>) -> Self {
        match header {
            None => Self::Bearer,
            Some(name) if name.eq_ignore_ascii_case("authorization") => Self::Bearer,
            Some(name) if name.eq_ignore_ascii_case("x-api-key") => Self::XApiKey,
            Some(name) => Self::Custom(name.to_string()),
        }
    }
}

/// Everything the adapter needs to know about one completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub auth_scheme: AuthScheme,
    /// Append `?t=<millis>` to every request URL to defeat response caches.
    pub cache_busting: bool,
}

impl ProviderConfig {
    pub fn openai() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: None,
            max_tokens: None,
            auth_scheme: AuthScheme::Bearer,
            cache_busting: true,
        }
    }

    pub fn deepseek() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: Some(0.7),
            max_tokens: Some(2000),
            auth_scheme: AuthScheme::Bearer,
            cache_busting: false,
        }
    }

    pub fn custom(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
            auth_scheme: AuthScheme::Bearer,
            cache_busting: false,
        }
    }
}

/// Completion backend that POSTs to an OpenAI-compatible endpoint.
pub struct ChatCompletionsBackend {
    config: ProviderConfig,
    client: Client,
}

impl ChatCompletionsBackend {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn request_url(&self, now_millis: i64) -> String {
        if self.config.cache_busting {
            format!("{}?t={}", self.config.endpoint, now_millis)
        } else {
            self.config.endpoint.clone()
        }
    }

    fn with_auth_header(
        &self,
        req: reqwest::RequestBuilder,
        credential: &ApiKey,
    ) -> reqwest::RequestBuilder {
        match &self.config.auth_scheme {
            AuthScheme::Bearer => {
                req.header("Authorization", format!("Bearer {}", credential.expose()))
            }
            AuthScheme::XApiKey => req.header("x-api-key", credential.expose()),
            AuthScheme::Custom(header) => req.header(header.as_str(), credential.expose()),
        }
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletionsBackend {
    async fn complete(
        &self,
        prompt: &str,
        credential: &ApiKey,
    ) -> Result<ProviderReply, CompletionError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![WireMessage::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.request_url(Utc::now().timestamp_millis());
        debug!(model = %self.config.model, "Requesting completion");

        let req = self.with_auth_header(self.client.post(&url).json(&request), credential);
        let response = req
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Protocol(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;
        Ok(parse_reply(&body))
    }
}

/// Extract the first choice's message content from a success body.
///
/// Anything short of a non-empty string (bad JSON, no choices, null or
/// empty content) yields a contentless reply.
fn parse_reply(body: &str) -> ProviderReply {
    match serde_json::from_str::<ChatResponse>(body) {
        Ok(parsed) => {
            let content = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content);
            ProviderReply::new(content.unwrap_or_default())
        }
        Err(e) => {
            warn!("Completion body was not valid JSON: {e}");
            ProviderReply::empty()
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl WireMessage {
    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize, Default)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_preset() {
        let config = ProviderConfig::openai();
        assert_eq!(config.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, None);
        assert_eq!(config.auth_scheme, AuthScheme::Bearer);
        assert!(config.cache_busting);
    }

    #[test]
    fn test_deepseek_preset() {
        let config = ProviderConfig::deepseek();
        assert_eq!(config.endpoint, "https://api.deepseek.com/v1/chat/completions");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(2000));
        assert!(!config.cache_busting);
    }

    #[test]
    fn test_custom_preset_starts_plain() {
        let config = ProviderConfig::custom("https://llm.example.com/chat", "my-model");
        assert_eq!(config.endpoint, "https://llm.example.com/chat");
        assert_eq!(config.model, "my-model");
        assert_eq!(config.auth_scheme, AuthScheme::Bearer);
        assert!(!config.cache_busting);
    }

    #[test]
    fn test_auth_scheme_from_header_name() {
        assert_eq!(AuthScheme::from_header_name(None), AuthScheme::Bearer);
        assert_eq!(
            AuthScheme::from_header_name(Some("Authorization")),
            AuthScheme::Bearer
        );
        assert_eq!(
            AuthScheme::from_header_name(Some("x-api-key")),
            AuthScheme::XApiKey
        );
        assert_eq!(
            AuthScheme::from_header_name(Some("X-Goog-Api-Key")),
            AuthScheme::Custom("X-Goog-Api-Key".to_string())
        );
    }

    #[test]
    fn test_cache_busting_appends_timestamp() {
        let backend = ChatCompletionsBackend::new(ProviderConfig::openai());
        assert_eq!(
            backend.request_url(1_700_000_000_000),
            "https://api.openai.com/v1/chat/completions?t=1700000000000"
        );
    }

    #[test]
    fn test_plain_url_without_cache_busting() {
        let backend = ChatCompletionsBackend::new(ProviderConfig::deepseek());
        assert_eq!(
            backend.request_url(1_700_000_000_000),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_reply_extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"NEET stands for..."}},{"message":{"content":"second"}}]}"#;
        assert_eq!(parse_reply(body).content(), Some("NEET stands for..."));
    }

    #[test]
    fn test_parse_reply_empty_content_is_no_content() {
        let body = r#"{"choices":[{"message":{"content":""}}]}"#;
        assert_eq!(parse_reply(body).content(), None);
    }

    #[test]
    fn test_parse_reply_null_content_is_no_content() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(parse_reply(body).content(), None);
    }

    #[test]
    fn test_parse_reply_without_choices() {
        assert_eq!(parse_reply(r#"{"choices":[]}"#).content(), None);
        assert_eq!(parse_reply(r#"{}"#).content(), None);
    }

    #[test]
    fn test_parse_reply_tolerates_garbage() {
        assert_eq!(parse_reply("<html>502 Bad Gateway</html>").content(), None);
    }

    #[test]
    fn test_request_omits_unset_sampling_params() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![WireMessage::user("hello")],
            temperature: None,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert!(value.get("temperature").is_none());
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_carries_configured_sampling_params() {
        let request = ChatRequest {
            model: "deepseek-chat".to_string(),
            messages: vec![WireMessage::user("hello")],
            temperature: Some(0.7),
            max_tokens: Some(2000),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["max_tokens"], 2000);
    }

    #[test]
    fn test_bearer_auth_header() {
        let backend = ChatCompletionsBackend::new(ProviderConfig::openai());
        let key = ApiKey::new("sk-secret");
        let request = backend
            .with_auth_header(backend.client.post("http://localhost/x"), &key)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer sk-secret"
        );
    }

    #[test]
    fn test_custom_auth_header() {
        let mut config = ProviderConfig::custom("http://localhost/x", "m");
        config.auth_scheme = AuthScheme::Custom("X-Goog-Api-Key".to_string());
        let backend = ChatCompletionsBackend::new(config);
        let key = ApiKey::new("sk-secret");
        let request = backend
            .with_auth_header(backend.client.post("http://localhost/x"), &key)
            .build()
            .unwrap();
        assert_eq!(request.headers().get("X-Goog-Api-Key").unwrap(), "sk-secret");
        assert!(request.headers().get("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        // Nothing listens on loopback port 1.
        let backend = ChatCompletionsBackend::new(ProviderConfig::custom(
            "http://127.0.0.1:1/v1/chat/completions",
            "test-model",
        ));
        let key = ApiKey::new("sk-test");

        let error = backend.complete("hello", &key).await.unwrap_err();

        assert!(matches!(error, CompletionError::Network(_)));
        assert!(!error.to_string().is_empty());
    }
}
