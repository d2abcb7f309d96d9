//! Storage layer for waitkv
//!
//! This crate implements the concurrent in-memory store:
//! - ConcurrentKVStore: sharded map with blocking wait-for-key lookups
//! - Shard: per-shard data map plus per-key waiter registry
//! - StoreOptions: shard count and capacity configuration
//!
//! # Locking discipline
//!
//! Every key maps to exactly one shard. The shard's mutex guards both the
//! data and the waiters awaiting keys in that shard, so a presence check
//! and a waiter registration are one atomic step with respect to `put`.
//! Parked waiters hold no lock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;
pub mod shard;
pub mod store;

pub use options::StoreOptions;
pub use store::ConcurrentKVStore;
