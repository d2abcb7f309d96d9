//! Store configuration
//!
//! `StoreOptions` is plain data: it derives serde so an embedding
//! application can load it from whatever config format it already uses.
//! Missing fields take their defaults.

use serde::{Deserialize, Serialize};
use waitkv_core::{Error, Result};

/// Default number of shards (matches DashMap's default sharding)
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Upper bound on shard count
pub const MAX_SHARD_COUNT: usize = 4096;

/// Options for constructing a [`ConcurrentKVStore`](crate::ConcurrentKVStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Number of independently locked shards
    ///
    /// Must be a power of two in `1..=MAX_SHARD_COUNT`. A single shard
    /// degenerates to one global lock, which is still correct.
    pub shard_count: usize,

    /// Expected total number of keys, spread evenly across shards
    pub initial_capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            shard_count: DEFAULT_SHARD_COUNT,
            initial_capacity: 0,
        }
    }
}

impl StoreOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shard count
    pub fn shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Set the expected total number of keys
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Check these options can build a store
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(Error::InvalidConfig(
                "shard_count must be non-zero".to_string(),
            ));
        }
        if !self.shard_count.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "shard_count must be a power of two, got {}",
                self.shard_count
            )));
        }
        if self.shard_count > MAX_SHARD_COUNT {
            return Err(Error::InvalidConfig(format!(
                "shard_count {} exceeds maximum {}",
                self.shard_count, MAX_SHARD_COUNT
            )));
        }
        Ok(())
    }

    /// Capacity to pre-allocate in each shard
    pub(crate) fn per_shard_capacity(&self) -> usize {
        self.initial_capacity.div_ceil(self.shard_count)
    }
}
