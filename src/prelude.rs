//! Convenient imports for waitkv.
//!
//! ```
//! use waitkv::prelude::*;
//!
//! let store = ConcurrentKVStore::new();
//! store.put("key", "value");
//! ```

// Main entry point
pub use waitkv_storage::{ConcurrentKVStore, StoreOptions};

// Error handling
pub use waitkv_core::{Error, Result};

// Core types
pub use waitkv_core::{Key, Value};
