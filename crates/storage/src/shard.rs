//! Per-shard state: data map and waiter registry
//!
//! A shard is always accessed through its owning mutex. Nothing here locks;
//! every method assumes the caller holds the shard guard, which is what
//! makes "check presence, then register as waiter" a single atomic step.
//!
//! # Waiter registry
//!
//! Each awaited key gets a [`WaitSlot`] holding its own condition variable,
//! so a `put` wakes only the threads waiting on that key. The slot also
//! records a delivery epoch and the last value delivered by a `put`. A waiter
//! remembers the epoch it registered at; if it wakes to find the key erased
//! again but the epoch advanced, it takes the delivered value instead of
//! parking again. That way a `put` that starts after a wait began is never
//! missed, even if an `erase` lands before the waiter is rescheduled.
//!
//! Slots are reference counted by parked waiters and removed when the last
//! one leaves.

use parking_lot::Condvar;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use waitkv_core::{Key, Value};

/// Registration state for all threads waiting on one key
#[derive(Debug)]
pub struct WaitSlot {
    /// Signalled on every `put` to this key
    signal: Arc<Condvar>,
    /// Threads currently registered on this key
    parked: usize,
    /// Number of `put`s delivered since the slot was created
    epoch: u64,
    /// Value from the most recent delivering `put`
    delivered: Option<Value>,
}

impl WaitSlot {
    fn new() -> Self {
        WaitSlot {
            signal: Arc::new(Condvar::new()),
            parked: 0,
            epoch: 0,
            delivered: None,
        }
    }

    fn deliver(&mut self, value: &Value) {
        self.epoch += 1;
        self.delivered = Some(value.clone());
        self.signal.notify_all();
    }

    /// Number of registered waiters
    pub fn parked(&self) -> usize {
        self.parked
    }
}

/// Ticket returned by [`Shard::register`]
///
/// Carries the condvar to park on and the epoch observed at registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub(crate) signal: Arc<Condvar>,
    pub(crate) epoch: u64,
}

/// Per-shard data and waiters
#[derive(Debug, Default)]
pub struct Shard {
    pub(crate) data: FxHashMap<Key, Value>,
    pub(crate) waiters: FxHashMap<Key, WaitSlot>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shard with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            waiters: FxHashMap::default(),
        }
    }

    /// Get number of entries in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look up a present value
    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.data.get(key)
    }

    /// Insert or replace, releasing every waiter on `key`
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        if let Some(slot) = self.waiters.get_mut(key.as_bytes()) {
            slot.deliver(&value);
        }
        self.data.insert(key, value)
    }

    /// Remove presence. Waiters are left parked.
    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        self.data.remove(key)
    }

    /// Drop every entry. Waiters are left parked.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Register the calling thread as a waiter on `key`
    ///
    /// Must be called under the same guard that observed `key` absent.
    pub fn register(&mut self, key: &[u8]) -> Registration {
        let slot = self
            .waiters
            .entry(Key::new(key))
            .or_insert_with(WaitSlot::new);
        slot.parked += 1;
        Registration {
            signal: Arc::clone(&slot.signal),
            epoch: slot.epoch,
        }
    }

    /// Value a registered waiter should return, if any
    ///
    /// The current value wins when present. Otherwise a value delivered
    /// after registration is returned even though it has since been erased.
    pub fn ready(&self, key: &[u8], registration: &Registration) -> Option<Value> {
        if let Some(value) = self.data.get(key) {
            return Some(value.clone());
        }
        self.waiters
            .get(key)
            .filter(|slot| slot.epoch != registration.epoch)
            .and_then(|slot| slot.delivered.clone())
    }

    /// Undo one [`register`](Self::register), dropping the slot if it was
    /// the last waiter
    pub fn deregister(&mut self, key: &[u8]) {
        if let Some(slot) = self.waiters.get_mut(key) {
            slot.parked -= 1;
            if slot.parked == 0 {
                self.waiters.remove(key);
            }
        }
    }

    /// Number of threads registered on `key`
    pub fn waiter_count(&self, key: &[u8]) -> usize {
        self.waiters.get(key).map(WaitSlot::parked).unwrap_or(0)
    }

    /// Number of threads registered on any key in this shard
    pub fn total_waiters(&self) -> usize {
        self.waiters.values().map(WaitSlot::parked).sum()
    }
}
