//! Conversation session state

use crate::chat::entities::Message;
use crate::chat::transcript::Transcript;
use crate::core::error::ValidationError;

/// Mutable state of one chat session (Entity)
///
/// `pending` is the single-flight guard: it is raised when a submission is
/// accepted and lowered when the matching bot reply lands. `last_error`
/// holds only validation failures; backend failures never reach it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    transcript: Transcript,
    pending: bool,
    last_error: Option<ValidationError>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    /// Accept a submission: clear the validation slate, echo the user
    /// message, and mark the exchange in flight.
    pub fn begin_exchange(&mut self, user_message: Message) {
        self.last_error = None;
        self.transcript.append(user_message);
        self.pending = true;
    }

    /// Resolve the in-flight exchange with the bot reply.
    pub fn complete_exchange(&mut self, bot_message: Message) {
        self.transcript.append(bot_message);
        self.pending = false;
    }

    /// Reject a submission without touching the transcript.
    pub fn record_rejection(&mut self, error: ValidationError) {
        self.last_error = Some(error);
    }
}
