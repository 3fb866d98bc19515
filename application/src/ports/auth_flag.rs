//! Durable authentication flag port
//!
//! One boolean that survives restarts: raised on a verified unlock, cleared
//! on sign-out, read once at startup to decide whether the gate opens
//! without asking again.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Error from the flag's backing store.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct FlagStoreError(String);

impl FlagStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Port for the durable "authenticated" flag.
///
/// Store failures are non-fatal to the caller: the gate logs them and the
/// in-memory unlock proceeds regardless.
pub trait AuthFlagStore: Send + Sync {
    fn is_set(&self) -> bool;

    fn set(&self) -> Result<(), FlagStoreError>;

    fn clear(&self) -> Result<(), FlagStoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryAuthFlag {
    set: AtomicBool,
}

impl InMemoryAuthFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raised() -> Self {
        Self {
            set: AtomicBool::new(true),
        }
    }
}

impl AuthFlagStore for InMemoryAuthFlag {
    fn is_set(&self) -> bool {
        self.set.load(Ordering::SeqCst)
    }

    fn set(&self) -> Result<(), FlagStoreError> {
        self.set.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), FlagStoreError> {
        self.set.store(false, Ordering::SeqCst);
        Ok(())
    }
}
