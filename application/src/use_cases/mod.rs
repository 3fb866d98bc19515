//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod access_gate;
pub mod session;
