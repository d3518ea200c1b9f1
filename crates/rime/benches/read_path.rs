use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use parking_lot::RwLock;
use rime::{FrozenMap, FrozenSet};
use rustc_hash::FxHashMap;

const BATCH: usize = 1024;

fn lookup_keys(size: u64) -> Vec<u64> {
	// xorshift, fixed seed
	let mut state = 0x9e37_79b9_7f4a_7c15u64;
	(0..BATCH)
		.map(|_| {
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			state % (size * 2)
		})
		.collect()
}

fn bench_lookups(c: &mut Criterion) {
	let mut group = c.benchmark_group("read_path/get");
	group.throughput(Throughput::Elements(BATCH as u64));

	for size in [1u64 << 8, 1 << 14, 1 << 20] {
		let frozen: FrozenMap<u64, u64> = (0..size).map(|i| (i, i)).collect();
		let locked = RwLock::new((0..size).map(|i| (i, i)).collect::<FxHashMap<_, _>>());
		let keys = lookup_keys(size);

		group.bench_with_input(BenchmarkId::new("frozen_get_cloned", size), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(frozen.get_cloned(k));
				}
			})
		});
		group.bench_with_input(BenchmarkId::new("frozen_snapshot", size), &keys, |b, keys| {
			b.iter(|| {
				let snap = frozen.snapshot();
				for k in keys {
					black_box(snap.get(k));
				}
			})
		});
		group.bench_with_input(BenchmarkId::new("rwlock_hashmap", size), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(locked.read().get(k).copied());
				}
			})
		});
	}
	group.finish();
}

fn bench_contains(c: &mut Criterion) {
	let mut group = c.benchmark_group("read_path/contains");
	group.throughput(Throughput::Elements(BATCH as u64));

	let size = 1u64 << 14;
	let set: FrozenSet<u64> = (0..size).collect();
	let keys = lookup_keys(size);
	group.bench_function("frozen_set", |b| {
		b.iter(|| {
			for k in &keys {
				black_box(set.contains(k));
			}
		})
	});
	group.finish();
}

fn bench_writes(c: &mut Criterion) {
	let mut group = c.benchmark_group("read_path/write");

	for size in [1u64 << 8, 1 << 12] {
		group.bench_with_input(BenchmarkId::new("set", size), &size, |b, &size| {
			let map: FrozenMap<u64, u64> = (0..size).map(|i| (i, i)).collect();
			let mut next = 0;
			b.iter(|| {
				next = (next + 1) % size;
				black_box(map.set(next, next));
			})
		});
		group.bench_with_input(BenchmarkId::new("insert_many_64", size), &size, |b, &size| {
			let map: FrozenMap<u64, u64> = (0..size).map(|i| (i, i)).collect();
			b.iter(|| black_box(map.insert_many((0..64).map(|i| (i, i)))))
		});
	}
	group.finish();
}

criterion_group!(benches, bench_lookups, bench_contains, bench_writes);
criterion_main!(benches);
