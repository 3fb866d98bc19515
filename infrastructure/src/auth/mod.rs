//! Durable authentication state adapters.

pub mod flag_file;

pub use flag_file::FileAuthFlag;
