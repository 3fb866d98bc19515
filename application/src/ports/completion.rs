//! Completion backend port
//!
//! Defines the interface for fetching chat completions.

use async_trait::async_trait;
use neetchat_domain::ApiKey;
use thiserror::Error;

/// Errors that can occur while fetching a completion
///
/// Display strings are embedded verbatim into the transcript as
/// `Error: <display>`, so they must stand on their own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Transport-level failure: DNS, connection refused, timeout.
    #[error("{0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("API error: {0}")]
    Protocol(u16),
}

/// A provider answer, which may carry no usable content.
///
/// `None` content is the "no answer" sentinel: the request succeeded but
/// nothing extractable came back, and the caller substitutes fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderReply {
    content: Option<String>,
}

impl ProviderReply {
    /// Wrap reply text. Empty text is treated as no content.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            content: (!content.is_empty()).then_some(content),
        }
    }

    /// A reply with no extractable content.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn into_content(self) -> Option<String> {
        self.content
    }
}

/// Gateway for fetching a single chat completion
///
/// This port defines how the application layer reaches the completion
/// endpoint. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request a completion for one user prompt.
    ///
    /// The prompt is the only conversational content sent: no transcript
    /// history, no attachments.
    async fn complete(
        &self,
        prompt: &str,
        credential: &ApiKey,
    ) -> Result<ProviderReply, CompletionError>;
}
