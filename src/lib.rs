//! Wikode suggestion library crate
//!
//! Re-exports core modules for integration tests and the `wikode-suggest` binary.

pub mod config;
pub mod database;
pub mod error;
pub mod suggestion;

// Re-export commonly used types
pub use config::Config;
pub use database::Database;
pub use error::{Error, Result};
pub use suggestion::*;
