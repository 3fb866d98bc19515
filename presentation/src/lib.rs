//! Presentation layer for neetchat
//!
//! This crate contains CLI definitions, the transcript renderer,
//! the typing indicator, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, ProviderChoice};
pub use output::console::ConsoleRenderer;
pub use progress::typing::TypingIndicator;
