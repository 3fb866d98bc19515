//! Access gate use case.
//!
//! Guards the chat behind one of two unlock routes: pasting an API key
//! directly, or requesting an emailed verification code and entering it.
//! A durable flag remembers a verified unlock across restarts; the flag is
//! read exactly once, at construction.

use crate::ports::auth_flag::AuthFlagStore;
use crate::ports::verification::{RemoteError, VerificationService};
use neetchat_domain::{
    AccessMode, AccessState, ApiKey, ValidationError, VerifyStep, validate_verification_code,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during gate operations.
///
/// Display strings go straight to the user, so each variant carries its
/// message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Remote(#[from] RemoteError),

    /// The gate is already unlocked; only sign-out leaves that mode.
    #[error("Already unlocked.")]
    AlreadyUnlocked,
}

/// Use case guarding access to the chat session.
///
/// All state sits behind a mutex that is never held across an await, so
/// reads stay cheap while a verification call is in flight.
pub struct AccessGate {
    state: Mutex<AccessState>,
    verification: Arc<dyn VerificationService>,
    flags: Arc<dyn AuthFlagStore>,
}

impl AccessGate {
    /// Build the gate, consulting the durable flag once.
    ///
    /// The gate starts unlocked when a previous verified unlock left the
    /// flag raised, or when a credential was already resolved from
    /// configuration. Otherwise it starts locked with both routes open.
    pub fn new(
        verification: Arc<dyn VerificationService>,
        flags: Arc<dyn AuthFlagStore>,
        configured_key: Option<ApiKey>,
    ) -> Self {
        let remembered = flags.is_set();
        let state = if remembered || configured_key.is_some() {
            if remembered {
                debug!("durable auth flag is set, starting unlocked");
            }
            AccessState::unlocked_with(configured_key)
        } else {
            AccessState::locked()
        };

        Self {
            state: Mutex::new(state),
            verification,
            flags,
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.state.lock().unwrap().mode()
    }

    pub fn step(&self) -> VerifyStep {
        self.state.lock().unwrap().step()
    }

    pub fn email(&self) -> Option<String> {
        self.state.lock().unwrap().email().map(str::to_string)
    }

    /// The credential held for this process, if any.
    pub fn credential(&self) -> Option<ApiKey> {
        self.state.lock().unwrap().credential().cloned()
    }

    /// Unlock directly with a pasted secret.
    ///
    /// Blank secrets are rejected. Submitting to an already-unlocked gate
    /// is a no-op that keeps the existing credential.
    pub fn unlock_with_secret(&self, secret: &str) -> Result<(), GateError> {
        let key = ApiKey::try_new(secret).ok_or(ValidationError::EmptyApiKey)?;

        let mut state = self.state.lock().unwrap();
        if state.mode() == AccessMode::Unlocked {
            return Ok(());
        }
        state.unlock(key);
        info!("gate unlocked with a user-provided key");
        Ok(())
    }

    /// Request an emailed verification code.
    ///
    /// On success the gate moves to [`AccessMode::Unlocking`] and waits for
    /// the code. Failure leaves the state untouched so the user can retry.
    /// An unlocked gate rejects the request without contacting the service;
    /// signing out reopens the route.
    pub async fn send_code(&self, email: &str) -> Result<(), GateError> {
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if self.mode() == AccessMode::Unlocked {
            return Err(GateError::AlreadyUnlocked);
        }

        self.verification.send_code(email).await?;

        self.state.lock().unwrap().begin_verification(email);
        info!("verification code issued");
        Ok(())
    }

    /// Verify an entered code and unlock on success.
    ///
    /// Codes of the wrong length are rejected locally, without a remote
    /// call. A rejected or failed check leaves the state untouched.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), GateError> {
        validate_verification_code(code)?;

        self.verification.check_code(email, code).await?;

        self.state.lock().unwrap().complete_verification();
        if let Err(e) = self.flags.set() {
            warn!("could not persist auth flag: {e}");
        }
        info!("gate unlocked via email verification");
        Ok(())
    }

    /// Lock the gate, forgetting the credential and the durable flag.
    ///
    /// Store failures are logged; sign-out itself never fails.
    pub fn sign_out(&self) {
        if let Err(e) = self.flags.clear() {
            warn!("could not clear auth flag: {e}");
        }
        self.state.lock().unwrap().reset();
        info!("signed out, gate locked");
    }
}
