//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ValidationError`] — user-input validation errors

pub mod error;
