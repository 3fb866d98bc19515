//! Chat session use case.
//!
//! Owns the transcript and the single-flight submission flow: echo the user
//! message, fetch one completion, append the reply. Backend failures become
//! reply text instead of surfacing as errors, so every accepted submission
//! resolves to exactly one user/bot pair.

use crate::ports::completion::CompletionBackend;
use crate::use_cases::access_gate::AccessGate;
use neetchat_domain::{AccessMode, Attachment, Message, SessionState, ValidationError};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

/// Reply shown when submitting without a stored credential.
pub const MISSING_KEY_REPLY: &str = "API key missing.";

/// Reply shown when the provider answer carries no usable content.
pub const NO_ANSWER_REPLY: &str = "Couldn't fetch an answer.";

/// Errors reported to the caller of [`SessionController::submit`].
///
/// None of these touch the transcript. Rejected submissions leave no trace
/// beyond `last_error`, and only validation failures set that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// An exchange is already in flight.
    #[error("a reply is still pending")]
    Busy,

    /// The access gate is not unlocked.
    #[error("chat is locked")]
    Locked,
}

/// Use case driving a chat session against a completion backend.
///
/// The state mutex is never held across the backend call: acceptance takes
/// one lock, resolution takes another, and `pending` alone guards against
/// overlapping submissions in between.
pub struct SessionController {
    state: Mutex<SessionState>,
    gate: Arc<AccessGate>,
    backend: Arc<dyn CompletionBackend>,
}

impl SessionController {
    pub fn new(gate: Arc<AccessGate>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            gate,
            backend,
        }
    }

    /// Submit one user turn.
    ///
    /// Checks run in order: gate, single-flight guard, validation. The user
    /// message is appended before any network activity, and the matching
    /// bot reply is appended exactly once on every accepted submission.
    /// Only the trimmed text travels to the backend; attachments stay local.
    pub async fn submit(
        &self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<(), SubmitError> {
        if self.gate.mode() != AccessMode::Unlocked {
            return Err(SubmitError::Locked);
        }

        let trimmed = text.trim();
        {
            let mut state = self.state.lock().unwrap();
            if state.is_pending() {
                debug!("submission ignored, reply still pending");
                return Err(SubmitError::Busy);
            }
            if trimmed.is_empty() && attachment.is_none() {
                state.record_rejection(ValidationError::EmptySubmission);
                return Err(ValidationError::EmptySubmission.into());
            }

            let message = match attachment {
                Some(file) => Message::user_with_attachment(trimmed, file),
                None => Message::user(trimmed),
            };
            state.begin_exchange(message);
        }

        let reply_text = match self.gate.credential() {
            None => MISSING_KEY_REPLY.to_string(),
            Some(key) => match self.backend.complete(trimmed, &key).await {
                Ok(reply) => reply
                    .into_content()
                    .unwrap_or_else(|| NO_ANSWER_REPLY.to_string()),
                Err(e) => {
                    warn!("completion failed: {e}");
                    format!("Error: {e}")
                }
            },
        };

        let mut state = self.state.lock().unwrap();
        state.complete_exchange(Message::bot(reply_text));
        Ok(())
    }

    /// Snapshot of the transcript in append order.
    pub fn transcript(&self) -> Vec<Message> {
        self.state.lock().unwrap().transcript().entries().to_vec()
    }

    pub fn transcript_len(&self) -> usize {
        self.state.lock().unwrap().transcript().len()
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().unwrap().is_pending()
    }

    /// The most recent validation failure, cleared by the next accepted
    /// submission.
    pub fn last_error(&self) -> Option<ValidationError> {
        self.state.lock().unwrap().last_error().cloned()
    }

    /// Discard the transcript and all session state.
    ///
    /// Pairs with [`AccessGate::sign_out`]; messages live until the whole
    /// session resets.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        *state = SessionState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::auth_flag::InMemoryAuthFlag;
    use crate::ports::completion::{CompletionError, ProviderReply};
    use crate::ports::verification::NoVerificationService;
    use async_trait::async_trait;
    use neetchat_domain::{ApiKey, Sender};
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockBackend {
        responses: Mutex<VecDeque<Result<ProviderReply, CompletionError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockBackend {
        fn replying(responses: Vec<Result<ProviderReply, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            prompt: &str,
            _credential: &ApiKey,
        ) -> Result<ProviderReply, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ProviderReply::empty()))
        }
    }

    /// Backend that blocks until released, for overlap tests.
    struct BlockingBackend {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl CompletionBackend for BlockingBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _credential: &ApiKey,
        ) -> Result<ProviderReply, CompletionError> {
            self.release.notified().await;
            Ok(ProviderReply::new("slow answer"))
        }
    }

    fn unlocked_gate() -> Arc<AccessGate> {
        Arc::new(AccessGate::new(
            Arc::new(NoVerificationService),
            Arc::new(InMemoryAuthFlag::new()),
            Some(ApiKey::new("sk-test")),
        ))
    }

    /// Gate opened by the durable flag alone: unlocked, no credential.
    fn keyless_gate() -> Arc<AccessGate> {
        Arc::new(AccessGate::new(
            Arc::new(NoVerificationService),
            Arc::new(InMemoryAuthFlag::raised()),
            None,
        ))
    }

    fn controller_with(backend: MockBackend) -> (SessionController, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let controller = SessionController::new(unlocked_gate(), backend.clone());
        (controller, backend)
    }

    // ==================== Validation and guards ====================

    #[tokio::test]
    async fn test_empty_submission_is_rejected() {
        let (controller, backend) = controller_with(MockBackend::default());

        let error = controller.submit("", None).await.unwrap_err();

        assert_eq!(
            error,
            SubmitError::Validation(ValidationError::EmptySubmission)
        );
        assert!(controller.transcript().is_empty());
        assert!(!controller.is_pending());
        assert_eq!(
            controller.last_error(),
            Some(ValidationError::EmptySubmission)
        );
        assert!(backend.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_submission_is_rejected() {
        let (controller, _) = controller_with(MockBackend::default());

        let error = controller.submit("   \t ", None).await.unwrap_err();

        assert_eq!(
            error,
            SubmitError::Validation(ValidationError::EmptySubmission)
        );
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_locked_gate_rejects_submission() {
        let gate = Arc::new(AccessGate::new(
            Arc::new(NoVerificationService),
            Arc::new(InMemoryAuthFlag::new()),
            None,
        ));
        let controller = SessionController::new(gate, Arc::new(MockBackend::default()));

        let error = controller.submit("What is NEET?", None).await.unwrap_err();

        assert_eq!(error, SubmitError::Locked);
        assert!(controller.transcript().is_empty());
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn test_accepted_submission_clears_last_error() {
        let (controller, _) = controller_with(MockBackend::replying(vec![Ok(
            ProviderReply::new("An exam."),
        )]));

        controller.submit("", None).await.unwrap_err();
        assert!(controller.last_error().is_some());

        controller.submit("What is NEET?", None).await.unwrap();
        assert!(controller.last_error().is_none());
    }

    // ==================== Exchanges ====================

    #[tokio::test]
    async fn test_reply_content_becomes_the_bot_message() {
        let (controller, backend) = controller_with(MockBackend::replying(vec![Ok(
            ProviderReply::new("NEET is India's medical entrance exam."),
        )]));

        controller.submit("What is NEET?", None).await.unwrap();

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[0].text, "What is NEET?");
        assert_eq!(transcript[1].sender, Sender::Bot);
        assert_eq!(transcript[1].text, "NEET is India's medical entrance exam.");
        assert!(!controller.is_pending());
        assert_eq!(backend.prompts(), vec!["What is NEET?"]);
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_echo_and_send() {
        let (controller, backend) = controller_with(MockBackend::replying(vec![Ok(
            ProviderReply::new("Hi!"),
        )]));

        controller.submit("  hello there  ", None).await.unwrap();

        assert_eq!(controller.transcript()[0].text, "hello there");
        assert_eq!(backend.prompts(), vec!["hello there"]);
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let backend = Arc::new(MockBackend::default());
        let controller = SessionController::new(keyless_gate(), backend.clone());

        controller.submit("What is NEET?", None).await.unwrap();

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].text, "What is NEET?");
        assert_eq!(transcript[1].text, MISSING_KEY_REPLY);
        assert!(!controller.is_pending());
        // No network attempt was made.
        assert!(backend.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_is_embedded_as_reply_text() {
        let (controller, _) = controller_with(MockBackend::replying(vec![Err(
            CompletionError::Network("timeout".to_string()),
        )]));

        let result = controller.submit("What is NEET?", None).await;

        assert!(result.is_ok());
        let transcript = controller.transcript();
        assert_eq!(transcript[1].text, "Error: timeout");
        assert!(!controller.is_pending());
        // Backend failures never land in the validation slot.
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn test_protocol_error_names_the_status() {
        let (controller, _) = controller_with(MockBackend::replying(vec![Err(
            CompletionError::Protocol(500),
        )]));

        controller.submit("What is NEET?", None).await.unwrap();

        assert_eq!(controller.transcript()[1].text, "Error: API error: 500");
    }

    #[tokio::test]
    async fn test_contentless_reply_falls_back() {
        let (controller, _) =
            controller_with(MockBackend::replying(vec![Ok(ProviderReply::empty())]));

        controller.submit("What is NEET?", None).await.unwrap();

        assert_eq!(controller.transcript()[1].text, NO_ANSWER_REPLY);
    }

    #[tokio::test]
    async fn test_attachment_only_submission_is_accepted() {
        let (controller, backend) = controller_with(MockBackend::replying(vec![Ok(
            ProviderReply::new("Nice diagram."),
        )]));
        let file = Attachment::new("/tmp/cell.png");

        controller.submit("", Some(file.clone())).await.unwrap();

        let transcript = controller.transcript();
        assert_eq!(transcript[0].text, "");
        assert_eq!(transcript[0].attachment, Some(file));
        // The attachment never travels; only the (empty) text does.
        assert_eq!(backend.prompts(), vec![""]);
    }

    #[tokio::test]
    async fn test_transcript_grows_in_submission_order() {
        let (controller, _) = controller_with(MockBackend::replying(vec![
            Ok(ProviderReply::new("first answer")),
            Ok(ProviderReply::new("second answer")),
        ]));

        controller.submit("first question", None).await.unwrap();
        controller.submit("second question", None).await.unwrap();

        let texts: Vec<String> = controller.transcript().iter().map(|m| m.text.clone()).collect();
        assert_eq!(
            texts,
            vec![
                "first question",
                "first answer",
                "second question",
                "second answer"
            ]
        );
    }

    // ==================== Single flight ====================

    #[tokio::test]
    async fn test_overlapping_submission_is_busy() {
        let release = Arc::new(Notify::new());
        let backend = Arc::new(BlockingBackend {
            release: release.clone(),
        });
        let controller = Arc::new(SessionController::new(unlocked_gate(), backend));

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("slow question", None).await })
        };

        // Let the first submission reach the backend call.
        while !controller.is_pending() {
            tokio::task::yield_now().await;
        }

        let error = controller.submit("eager question", None).await.unwrap_err();
        assert_eq!(error, SubmitError::Busy);
        // The overlap left no trace: one user message, no validation error.
        assert_eq!(controller.transcript_len(), 1);
        assert!(controller.last_error().is_none());

        release.notify_one();
        background.await.unwrap().unwrap();

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].text, "slow question");
        assert_eq!(transcript[1].text, "slow answer");
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_empty_submission_while_pending_is_still_busy() {
        let release = Arc::new(Notify::new());
        let backend = Arc::new(BlockingBackend {
            release: release.clone(),
        });
        let controller = Arc::new(SessionController::new(unlocked_gate(), backend));

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("slow question", None).await })
        };
        while !controller.is_pending() {
            tokio::task::yield_now().await;
        }

        // Guard order: the in-flight exchange wins over validation.
        let error = controller.submit("", None).await.unwrap_err();
        assert_eq!(error, SubmitError::Busy);
        assert!(controller.last_error().is_none());

        release.notify_one();
        background.await.unwrap().unwrap();
    }

    // ==================== Reset ====================

    #[tokio::test]
    async fn test_reset_discards_the_session() {
        let (controller, _) = controller_with(MockBackend::replying(vec![Ok(
            ProviderReply::new("An exam."),
        )]));
        controller.submit("What is NEET?", None).await.unwrap();
        controller.submit("", None).await.unwrap_err();
        assert!(!controller.transcript().is_empty());
        assert!(controller.last_error().is_some());

        controller.reset();

        assert!(controller.transcript().is_empty());
        assert!(controller.last_error().is_none());
        assert!(!controller.is_pending());
    }
}
