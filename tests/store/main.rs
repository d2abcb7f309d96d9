//! Store Integration Tests
//!
//! Tests for waitkv: point operations, blocking waits, erase semantics,
//! timeouts, per-key linearizability, and randomized stress.

#[path = "../common/mod.rs"]
mod common;

mod latency;
mod stress;
