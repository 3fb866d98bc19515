//! Email verification adapters.

pub mod http;

pub use http::HttpVerificationService;
