//! Error types for waitkv
//!
//! The four basic store operations have no error channel: absence is an
//! `Option`, and `put`/`erase` always succeed. Errors only come from the
//! bounded wait variants and from rejected store options.

use crate::types::Key;
use std::time::Duration;
use thiserror::Error;

/// All waitkv errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bounded wait elapsed while the key stayed absent
    #[error("timed out after {waited:?} waiting for key {key}")]
    Timeout {
        /// The key that was awaited
        key: Key,
        /// How long the caller actually waited
        waited: Duration,
    },

    /// Store options failed validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for waitkv operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }

    /// The awaited key, if this is a timeout.
    pub fn key(&self) -> Option<&Key> {
        match self {
            Error::Timeout { key, .. } => Some(key),
            Error::InvalidConfig(_) => None,
        }
    }
}
