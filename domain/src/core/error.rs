//! Domain error types

use thiserror::Error;

/// Validation failures for user input.
///
/// These are the only errors surfaced through the session's `last_error`
/// slot; backend failures never land here, they become transcript text.
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a message or upload an image.")]
    EmptySubmission,

    #[error("API key must not be empty.")]
    EmptyApiKey,

    #[error("Email address must not be empty.")]
    EmptyEmail,

    #[error("Verification code must be exactly 4 characters.")]
    CodeLength,
}
