//! Access gate domain entities

use crate::access::value_objects::ApiKey;
use serde::{Deserialize, Serialize};

/// Gate position in the unlock lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// No access; both unlock routes are available.
    Locked,
    /// A verification code was issued and awaits entry.
    Unlocking,
    /// Chat is available.
    Unlocked,
}

/// Which input the email verification flow expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStep {
    EnterEmail,
    EnterCode,
}

/// Mutable access-control state (Entity)
///
/// Tracks the gate mode, the credential held for the process lifetime, and
/// where the email verification flow stands. Transitions are mechanical;
/// policy (idempotency, validation, remote calls) lives in the application
/// layer.
#[derive(Debug, Clone)]
pub struct AccessState {
    mode: AccessMode,
    credential: Option<ApiKey>,
    email: Option<String>,
    step: VerifyStep,
}

impl AccessState {
    /// The initial position: locked, nothing remembered.
    pub fn locked() -> Self {
        Self {
            mode: AccessMode::Locked,
            credential: None,
            email: None,
            step: VerifyStep::EnterEmail,
        }
    }

    /// Start unlocked, optionally with a credential already in hand.
    ///
    /// Used when a previous verified unlock or a configured key bypasses
    /// the gate at startup.
    pub fn unlocked_with(credential: Option<ApiKey>) -> Self {
        Self {
            mode: AccessMode::Unlocked,
            credential,
            email: None,
            step: VerifyStep::EnterEmail,
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn credential(&self) -> Option<&ApiKey> {
        self.credential.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn step(&self) -> VerifyStep {
        self.step
    }

    /// Store the secret and open the gate.
    pub fn unlock(&mut self, credential: ApiKey) {
        self.credential = Some(credential);
        self.mode = AccessMode::Unlocked;
    }

    /// A code was issued for `email`; wait for it to be entered.
    pub fn begin_verification(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
        self.step = VerifyStep::EnterCode;
        self.mode = AccessMode::Unlocking;
    }

    /// The entered code was accepted; open the gate.
    pub fn complete_verification(&mut self) {
        self.mode = AccessMode::Unlocked;
    }

    /// Drop everything and return to the locked position.
    pub fn reset(&mut self) {
        *self = Self::locked();
    }
}

impl Default for AccessState {
    fn default() -> Self {
        Self::locked()
    }
}
