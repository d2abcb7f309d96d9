//! Core types for waitkv
//!
//! This crate defines the foundational types shared by the storage layer
//! and the facade:
//! - Key: opaque, immutable byte identifier
//! - Value: opaque byte payload, shared immutably with readers
//! - Error: errors reported by the bounded-wait and configuration paths

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Key, Value};
