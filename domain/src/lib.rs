//! Domain layer for neetchat
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! The conversation is an append-only sequence of [`Message`]s. A submitted
//! user message is echoed into the transcript before any network activity,
//! and every accepted submission is resolved by exactly one bot reply, even
//! when the backend fails (the failure text becomes the reply).
//!
//! ## Access gate
//!
//! The chat is locked until the user unlocks it through one of two routes:
//!
//! - **Direct**: paste an API key, which is held for the process lifetime
//! - **Verified**: request an emailed code and enter it
//!
//! [`AccessMode::Unlocking`] is the window between a successfully issued code
//! and its verification.

pub mod access;
pub mod chat;
pub mod core;

// Re-export commonly used types
pub use access::{
    entities::{AccessMode, AccessState, VerifyStep},
    value_objects::{ApiKey, VERIFICATION_CODE_LEN, validate_verification_code},
};
pub use chat::{
    entities::{Attachment, Message, Sender},
    state::SessionState,
    transcript::Transcript,
};
pub use crate::core::error::ValidationError;
