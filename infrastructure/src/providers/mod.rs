//! Completion provider adapters.

pub mod chat_completions;

pub use chat_completions::{AuthScheme, ChatCompletionsBackend, ProviderConfig};
