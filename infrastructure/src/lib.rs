//! Infrastructure layer for neetchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod auth;
pub mod config;
pub mod providers;
pub mod verification;

// Re-export commonly used types
pub use auth::FileAuthFlag;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAccessConfig, FileConfig, FileProviderConfig,
    FileVerificationConfig,
};
pub use providers::{AuthScheme, ChatCompletionsBackend, ProviderConfig};
pub use verification::HttpVerificationService;
