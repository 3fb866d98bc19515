//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for neetchat.

mod repl;

pub use repl::ChatRepl;
