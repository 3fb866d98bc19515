//! Access subdomain: the gate that locks the chat until unlocked.
//!
//! - [`entities::AccessState`] — gate mode, credential, verification step
//! - [`value_objects::ApiKey`] — opaque backend credential

pub mod entities;
pub mod value_objects;
