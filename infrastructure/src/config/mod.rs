//! Configuration file loading for neetchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./neetchat.toml` or `./.neetchat.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/neetchat/config.toml`
//! 4. Fallback: `~/.config/neetchat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAccessConfig, FileConfig, FileProviderConfig,
    FileVerificationConfig,
};
pub use loader::ConfigLoader;
