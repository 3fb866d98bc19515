//! Chat subdomain: transcript entries and session state.
//!
//! - [`entities::Message`] — one transcript entry with sender and attachment
//! - [`transcript::Transcript`] — append-only message sequence
//! - [`state::SessionState`] — pending flag, last validation error, transcript

pub mod entities;
pub mod state;
pub mod transcript;
