//! Application layer for neetchat
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    auth_flag::{AuthFlagStore, FlagStoreError, InMemoryAuthFlag},
    completion::{CompletionBackend, CompletionError, ProviderReply},
    verification::{NoVerificationService, RemoteError, VerificationService},
};
pub use use_cases::access_gate::{AccessGate, GateError};
pub use use_cases::session::{
    MISSING_KEY_REPLY, NO_ANSWER_REPLY, SessionController, SubmitError,
};
