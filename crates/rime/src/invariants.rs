//! Concurrency invariants of the copy-on-write protocol.
//!
//! Each `inv_*` function states one guarantee and checks it with real
//! threads; the `test_*` wrappers register them with the test harness.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::{FrozenMap, FrozenSet, MapSnapshot};

const READERS: usize = 4;

/// Invariant: every snapshot a reader sees is the state after some prefix of
/// the write sequence, and a reader never sees an older snapshot after a
/// newer one.
pub(crate) fn inv_writes_are_linearizable() {
	const WRITES: u32 = 2_000;
	let map = FrozenMap::new();
	let done = AtomicBool::new(false);

	thread::scope(|s| {
		for _ in 0..READERS {
			s.spawn(|| {
				let mut last_generation = 0;
				while !done.load(Ordering::Acquire) {
					let snap = map.snapshot();
					assert!(snap.generation() >= last_generation, "generation went backwards");
					last_generation = snap.generation();

					// Writes insert 0, 1, 2, ... in order, so a consistent
					// snapshot of length n holds exactly 0..n.
					let len = snap.len() as u32;
					assert_eq!(snap.generation(), len as u64);
					for k in 0..len {
						assert_eq!(snap.get(&k), Some(&(k * 2)), "torn snapshot at {k}");
					}
					assert!(!snap.contains_key(&len));
				}
			});
		}

		s.spawn(|| {
			for k in 0..WRITES {
				map.insert(k, k * 2).unwrap();
			}
			done.store(true, Ordering::Release);
		});
	});

	assert_eq!(map.len(), WRITES as usize);
}

#[cfg_attr(test, test)]
pub(crate) fn test_writes_are_linearizable() {
	inv_writes_are_linearizable()
}

/// Invariant: a bulk write becomes visible all at once.
pub(crate) fn inv_bulk_writes_are_atomic() {
	const ROUNDS: u64 = 500;
	let map: FrozenMap<&'static str, u64> = FrozenMap::from([("left", 0), ("right", 0)]);
	let done = AtomicBool::new(false);

	thread::scope(|s| {
		for _ in 0..READERS {
			s.spawn(|| {
				while !done.load(Ordering::Acquire) {
					let snap = map.snapshot();
					assert_eq!(snap["left"], snap["right"], "reader saw half a batch");
					let pairs: Vec<(&str, u64)> = map.iter().collect();
					assert_eq!(pairs.len(), 2);
					assert_eq!(pairs[0].1, pairs[1].1);
				}
			});
		}

		s.spawn(|| {
			for round in 1..=ROUNDS {
				map.insert_many([("left", round), ("right", round)]);
			}
			done.store(true, Ordering::Release);
		});
	});

	assert_eq!(map.generation(), ROUNDS);
}

#[cfg_attr(test, test)]
pub(crate) fn test_bulk_writes_are_atomic() {
	inv_bulk_writes_are_atomic()
}

/// Invariant: concurrent writers are serialized; no write is lost and each
/// one publishes exactly once.
pub(crate) fn inv_writers_do_not_lose_updates() {
	const WRITERS: u32 = 4;
	const PER_WRITER: u32 = 250;
	let set = FrozenSet::new();

	thread::scope(|s| {
		for w in 0..WRITERS {
			let set = &set;
			s.spawn(move || {
				for i in 0..PER_WRITER {
					assert!(set.insert(w * PER_WRITER + i));
				}
			});
		}
	});

	assert_eq!(set.len(), (WRITERS * PER_WRITER) as usize);
	assert_eq!(set.generation(), (WRITERS * PER_WRITER) as u64);
}

#[cfg_attr(test, test)]
pub(crate) fn test_writers_do_not_lose_updates() {
	inv_writers_do_not_lose_updates()
}

/// Invariant: an iteration that began before a write keeps yielding the
/// pre-write contents in full.
pub(crate) fn inv_iteration_ignores_concurrent_writes() {
	let map = FrozenMap::from_iter((0..100u32).map(|i| (i, i)));
	let mut iter = map.iter();
	let mut seen = vec![iter.next().unwrap()];

	thread::scope(|s| {
		s.spawn(|| {
			map.clear();
			map.insert_many((1_000..1_050u32).map(|i| (i, i)));
		});
	});

	seen.extend(iter);
	seen.sort();
	assert_eq!(seen, (0..100).map(|i| (i, i)).collect::<Vec<_>>());
	assert_eq!(map.len(), 50);
}

#[cfg_attr(test, test)]
pub(crate) fn test_iteration_ignores_concurrent_writes() {
	inv_iteration_ignores_concurrent_writes()
}

/// Invariant: a pinned snapshot keeps its values alive across swaps, and
/// they are released once the last pin is dropped.
pub(crate) fn inv_snapshot_liveness_across_swap() {
	let payload = Arc::new(());
	let map = FrozenMap::new();
	map.insert("x", Arc::clone(&payload)).unwrap();

	let pinned: MapSnapshot<_, _> = map.snapshot();
	let value = map.get("x").unwrap();
	assert!(map.remove("x").is_some());

	assert!(Arc::ptr_eq(&*value, &payload));
	assert!(pinned.contains_key("x"));
	assert_eq!(Arc::strong_count(&payload), 2, "only the pinned snapshot holds a copy");

	drop(value);
	drop(pinned);
	assert_eq!(Arc::strong_count(&payload), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_snapshot_liveness_across_swap() {
	inv_snapshot_liveness_across_swap()
}
