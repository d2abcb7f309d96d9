//! Concurrent key-value store with blocking wait-for-key lookups
//!
//! # Design
//!
//! - Fixed array of `parking_lot::Mutex<Shard>`, selected by FxHash of the key
//! - Each shard owns its data map and the waiters for keys in that shard
//! - One condvar per awaited key: a `put` wakes only that key's waiters
//! - Values are `Arc`-backed snapshots; readers never alias live storage
//!
//! # Thread Safety
//!
//! - put/get/erase: lock one shard for a bounded critical section
//! - wait_and_get: checks presence and registers under the shard lock, then
//!   parks on the key's condvar, which releases the lock atomically
//! - Different shards never contend
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use waitkv_storage::ConcurrentKVStore;
//!
//! let store = Arc::new(ConcurrentKVStore::new());
//! let waiter = {
//!     let store = Arc::clone(&store);
//!     thread::spawn(move || store.wait_and_get("job-1"))
//! };
//! store.put("job-1", "done");
//! assert_eq!(waiter.join().unwrap(), "done");
//! ```

use crate::options::StoreOptions;
use crate::shard::Shard;
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use waitkv_core::{Error, Key, Result, Value};

/// Thread-safe in-memory store whose lookups can wait for a key to appear
///
/// Share one instance between threads with `Arc`. All operations take
/// `&self`.
pub struct ConcurrentKVStore {
    shards: Box<[Mutex<Shard>]>,
    /// `shard_count - 1`; shard count is always a power of two
    mask: usize,
}

impl ConcurrentKVStore {
    /// Create a store with default options
    pub fn new() -> Self {
        Self::build(&StoreOptions::default())
    }

    /// Create a store from validated options
    pub fn with_options(options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(&options))
    }

    fn build(options: &StoreOptions) -> Self {
        let per_shard = options.per_shard_capacity();
        let shards: Box<[Mutex<Shard>]> = (0..options.shard_count)
            .map(|_| Mutex::new(Shard::with_capacity(per_shard)))
            .collect();
        debug!(
            "Created store with {} shards ({} slots each)",
            options.shard_count, per_shard
        );
        Self {
            mask: options.shard_count - 1,
            shards,
        }
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    #[inline]
    fn shard_index(&self, key: &[u8]) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        // FxHash mixes by multiplication; the high bits are the well-mixed ones.
        (hasher.finish() >> 32) as usize & self.mask
    }

    #[inline]
    fn shard(&self, key: &[u8]) -> &Mutex<Shard> {
        &self.shards[self.shard_index(key)]
    }

    // ========================================================================
    // Put/Get/Erase
    // ========================================================================

    /// Insert or replace the value for `key`
    ///
    /// Releases every thread blocked in a `wait_and_get*` call on `key`.
    #[inline]
    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.insert(key, value);
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        self.shard(key.as_bytes()).lock().insert(key, value)
    }

    /// Non-blocking point lookup
    ///
    /// Returns the value of the latest completed `put`, or `None` if the key
    /// is absent. Never waits on a parked waiter.
    #[inline]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Value> {
        let key = key.as_ref();
        self.shard(key).lock().get(key).cloned()
    }

    /// Check if a key is present
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        self.shard(key).lock().get(key).is_some()
    }

    /// Remove presence for `key`
    ///
    /// No-op if absent. Does not wake or satisfy waiters: they keep waiting
    /// for a later `put`.
    #[inline]
    pub fn erase(&self, key: impl AsRef<[u8]>) {
        self.remove(key);
    }

    /// Remove presence, returning the removed value
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Option<Value> {
        let key = key.as_ref();
        self.shard(key).lock().remove(key)
    }

    // ========================================================================
    // Blocking lookups
    // ========================================================================

    /// Return the value for `key`, waiting until some `put` supplies it
    ///
    /// Returns immediately if the key is present. Otherwise blocks with no
    /// timeout: if nobody ever puts `key`, this never returns. Use
    /// [`wait_and_get_timeout`](Self::wait_and_get_timeout) when that is not
    /// acceptable.
    pub fn wait_and_get(&self, key: impl AsRef<[u8]>) -> Value {
        let key = key.as_ref();
        let mut shard = self.shard(key).lock();
        if let Some(value) = shard.get(key) {
            return value.clone();
        }

        let registration = shard.register(key);
        trace!("Parking waiter on key {}", String::from_utf8_lossy(key));

        let value = loop {
            registration.signal.wait(&mut shard);
            if let Some(value) = shard.ready(key, &registration) {
                break value;
            }
        };

        shard.deregister(key);
        trace!("Waiter on key {} released", String::from_utf8_lossy(key));
        value
    }

    /// Like [`wait_and_get`](Self::wait_and_get), giving up after `timeout`
    ///
    /// A timeout too large to represent as an `Instant` waits forever.
    pub fn wait_and_get_timeout(&self, key: impl AsRef<[u8]>, timeout: Duration) -> Result<Value> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_and_get_deadline(key, deadline),
            None => Ok(self.wait_and_get(key)),
        }
    }

    /// Like [`wait_and_get`](Self::wait_and_get), giving up at `deadline`
    ///
    /// A present key is returned even if the deadline has already passed.
    pub fn wait_and_get_deadline(&self, key: impl AsRef<[u8]>, deadline: Instant) -> Result<Value> {
        let key = key.as_ref();
        let started = Instant::now();
        let mut shard = self.shard(key).lock();
        if let Some(value) = shard.get(key) {
            return Ok(value.clone());
        }
        if started >= deadline {
            return Err(Error::Timeout {
                key: Key::new(key),
                waited: Duration::ZERO,
            });
        }

        let registration = shard.register(key);
        trace!(
            "Parking waiter on key {} until deadline",
            String::from_utf8_lossy(key)
        );

        let outcome = loop {
            let timed_out = registration
                .signal
                .wait_until(&mut shard, deadline)
                .timed_out();
            // A put that raced the timeout still counts.
            if let Some(value) = shard.ready(key, &registration) {
                break Some(value);
            }
            if timed_out {
                break None;
            }
        };

        shard.deregister(key);
        drop(shard);

        outcome.ok_or_else(|| {
            let waited = started.elapsed();
            debug!(
                "Wait on key {} timed out after {:?}",
                String::from_utf8_lossy(key),
                waited
            );
            Error::Timeout {
                key: Key::new(key),
                waited,
            }
        })
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of threads currently waiting on `key`
    pub fn waiter_count(&self, key: impl AsRef<[u8]>) -> usize {
        let key = key.as_ref();
        self.shard(key).lock().waiter_count(key)
    }

    /// Number of threads currently waiting on any key
    ///
    /// Shards are locked one at a time, so the total is not a snapshot.
    pub fn total_waiters(&self) -> usize {
        self.shards.iter().map(|s| s.lock().total_waiters()).sum()
    }

    /// Number of present keys
    ///
    /// Shards are locked one at a time, so under concurrent writes this is
    /// not a point-in-time count.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Check if no key is present
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.lock().is_empty())
    }

    /// List present keys, sorted
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .shards
            .iter()
            .flat_map(|s| s.lock().data.keys().cloned().collect::<Vec<_>>())
            .collect();
        keys.sort();
        keys
    }

    /// Erase every key
    ///
    /// Same waiter semantics as [`erase`](Self::erase): nobody is woken.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
    }
}

impl Default for ConcurrentKVStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConcurrentKVStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentKVStore")
            .field("shard_count", &self.shard_count())
            .field("entries", &self.len())
            .field("waiters", &self.total_waiters())
            .finish()
    }
}
