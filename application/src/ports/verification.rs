//! Email verification port
//!
//! Defines the interface to the collaborator that emails verification codes
//! and checks the entered ones.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the verification collaborator.
///
/// The message is surfaced to the user verbatim, so adapters should put
/// something readable in it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Port for the email verification collaborator
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Ask the collaborator to email a code to `email`.
    async fn send_code(&self, email: &str) -> Result<(), RemoteError>;

    /// Ask the collaborator to check an entered code.
    async fn check_code(&self, email: &str, code: &str) -> Result<(), RemoteError>;
}

/// Rejecting implementation for builds without a verification endpoint.
///
/// Keeps the email route visible but inert: every call fails with a fixed
/// message, and the key route still works.
pub struct NoVerificationService;

#[async_trait]
impl VerificationService for NoVerificationService {
    async fn send_code(&self, _email: &str) -> Result<(), RemoteError> {
        Err(RemoteError::new("Email verification is not configured."))
    }

    async fn check_code(&self, _email: &str, _code: &str) -> Result<(), RemoteError> {
        Err(RemoteError::new("Email verification is not configured."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message_verbatim() {
        let error = RemoteError::new("Code expired.");
        assert_eq!(error.to_string(), "Code expired.");
        assert_eq!(error.message(), "Code expired.");
    }

    #[tokio::test]
    async fn test_null_service_rejects_both_calls() {
        let service = NoVerificationService;
        assert!(service.send_code("a@b.c").await.is_err());
        assert!(service.check_code("a@b.c", "1234").await.is_err());
    }
}
