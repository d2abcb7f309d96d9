//! Non-blocking Path Tests
//!
//! get/put/erase must not stall behind parked waiters, including waiters
//! that share the same shard lock.

use crate::common::*;
use std::time::{Duration, Instant};

const PARKED: usize = 32;
const OPS: usize = 10_000;

#[test]
fn test_get_missing_unaffected_by_parked_waiters() {
    let store = create_single_shard_store();
    let handles: Vec<_> = (0..PARKED)
        .map(|i| spawn_waiter(&store, &format!("pending{}", i)))
        .collect();
    for i in 0..PARKED {
        wait_for_waiters(&store, &format!("pending{}", i), 1);
    }

    let started = Instant::now();
    for _ in 0..OPS {
        assert!(store.get("missing").is_none());
    }
    assert!(started.elapsed() < Duration::from_secs(2));

    for i in 0..PARKED {
        store.put(format!("pending{}", i), "v");
    }
    for h in handles {
        assert_eq!(h.join().unwrap(), "v");
    }
}

#[test]
fn test_writes_proceed_while_same_key_has_waiters() {
    let store = create_store();
    let handles: Vec<_> = (0..PARKED).map(|_| spawn_waiter(&store, "hot")).collect();
    wait_for_waiters(&store, "hot", PARKED);

    let started = Instant::now();
    for _ in 0..OPS {
        store.erase("hot");
        store.put("unrelated", "x");
    }
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(store.waiter_count("hot"), PARKED);

    store.put("hot", "v");
    for h in handles {
        assert_eq!(h.join().unwrap(), "v");
    }
}
