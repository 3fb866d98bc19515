//! File-backed authentication flag
//!
//! The flag is a marker file: present means a verification succeeded on
//! this machine at some point. Its contents are informational only.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use neetchat_application::{AuthFlagStore, FlagStoreError};
use tracing::debug;

/// Marker-file implementation of the durable authentication flag.
pub struct FileAuthFlag {
    path: PathBuf,
}

impl FileAuthFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform data directory, e.g. `~/.local/share/neetchat/authenticated`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neetchat")
            .join("authenticated")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuthFlagStore for FileAuthFlag {
    fn is_set(&self) -> bool {
        self.path.exists()
    }

    fn set(&self) -> Result<(), FlagStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FlagStoreError::new(e.to_string()))?;
        }
        fs::write(&self.path, Utc::now().to_rfc3339())
            .map_err(|e| FlagStoreError::new(e.to_string()))?;
        debug!(path = %self.path.display(), "Raised authentication flag");
        Ok(())
    }

    fn clear(&self) -> Result<(), FlagStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared authentication flag");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlagStoreError::new(e.to_string())),
        }
    }
}
