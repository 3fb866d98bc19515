//! Access control value objects

use crate::core::error::ValidationError;

/// Expected length of an emailed verification code.
pub const VERIFICATION_CODE_LEN: usize = 4;

/// An opaque backend credential (Value Object)
///
/// The secret is stored exactly as submitted and held in memory for the
/// process lifetime. `Debug` redacts it; [`ApiKey::expose`] is the only
/// accessor.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a key from a raw secret.
    ///
    /// # Panics
    /// Panics if the secret is empty or only whitespace
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(!secret.trim().is_empty(), "API key cannot be empty");
        Self(secret)
    }

    /// Try to create a key, returning None for a blank secret.
    pub fn try_new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Read the raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Check an entered verification code for the expected shape.
///
/// Counts characters, not bytes, so multibyte input is measured the way the
/// user typed it.
pub fn validate_verification_code(code: &str) -> Result<(), ValidationError> {
    if code.chars().count() != VERIFICATION_CODE_LEN {
        Err(ValidationError::CodeLength)
    } else {
        Ok(())
    }
}
