//! Randomized Stress Tests
//!
//! Writers, erasers, readers and waiters hammer a small keyspace. Every
//! waiter must eventually return a value some writer actually put, and the
//! waiter registry must drain completely.

use crate::common::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const KEYS: usize = 8;
const WRITERS: usize = 4;
const WAITERS: usize = 16;
const OPS_PER_WRITER: usize = 2_000;

fn key(i: usize) -> String {
    format!("key{}", i)
}

fn is_writer_value(v: &waitkv::Value) -> bool {
    let s = v.as_str().unwrap();
    s == "final" || s.starts_with('w')
}

#[test]
fn test_random_ops_with_waiters() {
    let store = create_store();
    let barrier = Arc::new(Barrier::new(WRITERS + WAITERS));

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(w as u64);
                barrier.wait();
                for i in 0..OPS_PER_WRITER {
                    let k = key(rng.gen_range(0..KEYS));
                    match rng.gen_range(0..3) {
                        0 => store.put(k, format!("w{}-{}", w, i)),
                        1 => store.erase(&k),
                        _ => {
                            if let Some(v) = store.get(&k) {
                                assert!(is_writer_value(&v));
                            }
                        }
                    }
                }
            })
        })
        .collect();

    let waiters: Vec<_> = (0..WAITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.wait_and_get(key(i % KEYS))
            })
        })
        .collect();

    for w in writers {
        w.join().unwrap();
    }
    // Release anyone still parked.
    for k in 0..KEYS {
        store.put(key(k), "final");
    }

    for w in waiters {
        assert!(is_writer_value(&w.join().unwrap()));
    }
    wait_for_no_waiters(&store);
}

#[test]
fn test_timed_waiters_under_churn() {
    let store = create_store();
    let barrier = Arc::new(Barrier::new(WRITERS + WAITERS));

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(100 + w as u64);
                barrier.wait();
                for i in 0..OPS_PER_WRITER {
                    let k = key(rng.gen_range(0..KEYS));
                    if rng.gen_bool(0.5) {
                        store.put(k, format!("w{}-{}", w, i));
                    } else {
                        store.erase(&k);
                    }
                }
            })
        })
        .collect();

    let waiters: Vec<_> = (0..WAITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(200 + i as u64);
                barrier.wait();
                for _ in 0..50 {
                    let k = key(rng.gen_range(0..KEYS));
                    match store.wait_and_get_timeout(&k, Duration::from_micros(200)) {
                        Ok(v) => assert!(is_writer_value(&v)),
                        Err(e) => assert!(e.is_timeout()),
                    }
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(waiters) {
        h.join().unwrap();
    }
    assert_eq!(store.total_waiters(), 0);
}

#[test]
fn test_single_shard_contention() {
    const ROUNDS: usize = 500;
    let store = create_single_shard_store();

    let waiters: Vec<_> = (0..WAITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for r in 0..ROUNDS {
                    let expected = format!("w{}", r);
                    let v = store.wait_and_get(format!("round{}-{}", r, i % 4));
                    assert_eq!(v, expected.as_str());
                }
            })
        })
        .collect();

    for r in 0..ROUNDS {
        for slot in 0..4 {
            store.put(format!("round{}-{}", r, slot), format!("w{}", r));
        }
    }

    for w in waiters {
        w.join().unwrap();
    }
    assert_eq!(store.len(), ROUNDS * 4);
    assert_eq!(store.total_waiters(), 0);
}
