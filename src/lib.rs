//! # waitkv
//!
//! Thread-safe in-memory key-value store with a blocking lookup: a reader
//! can ask for a key that does not exist yet and sleep until a writer
//! supplies it.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use waitkv::prelude::*;
//!
//! let store = Arc::new(ConcurrentKVStore::new());
//!
//! let reader = {
//!     let store = Arc::clone(&store);
//!     thread::spawn(move || store.wait_and_get("job-1"))
//! };
//!
//! store.put("job-1", "done");
//! assert_eq!(reader.join().unwrap(), "done");
//!
//! assert_eq!(store.get("missing"), None);
//! store.erase("job-1");
//! assert!(store.get("job-1").is_none());
//! ```
//!
//! ## Operations
//!
//! | Operation | Blocks |
//! |-----------|--------|
//! | [`ConcurrentKVStore::put`] | never |
//! | [`ConcurrentKVStore::get`] | never |
//! | [`ConcurrentKVStore::erase`] | never |
//! | [`ConcurrentKVStore::wait_and_get`] | until the key is present |
//! | [`ConcurrentKVStore::wait_and_get_timeout`] | until present or timeout |
//!
//! `erase` never satisfies a waiter. A waiter only returns a value some
//! `put` actually supplied.

#![warn(missing_docs)]

pub mod prelude;

pub use waitkv_core::{Error, Key, Result, Value};
pub use waitkv_storage::{ConcurrentKVStore, StoreOptions};
