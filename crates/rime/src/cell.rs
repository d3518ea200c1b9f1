//! Copy-on-write publication shared by [`crate::FrozenMap`] and
//! [`crate::FrozenSet`].
//!
//! # Mental model
//!
//! * Readers load the current `Arc<Frozen<..>>` from an `ArcSwap` and answer
//!   entirely from that immutable view. They never touch the mutex.
//! * Writers lock the mutex, mutate the [`Store`], freeze a replacement
//!   snapshot and publish it with a single pointer swap, then unlock.
//! * A write that changed nothing publishes nothing; the previous snapshot
//!   stays in place.
//!
//! # Invariants
//!
//! * At most one writer runs at a time, and its snapshot is published before
//!   the mutex is released (see `invariants::inv_writes_are_linearizable`).
//! * Between writes the published snapshot equals the store, including after
//!   a write that panicked.
//! * Published generations strictly increase.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use parking_lot::Mutex;

use crate::comparer::Comparer;
use crate::snapshot::Frozen;
use crate::store::{Entry, Store};

/// The result of a write closure: what to return to the caller and whether
/// the store changed.
pub(crate) struct Written<R> {
	pub(crate) value: R,
	pub(crate) changed: bool,
}

impl<R> Written<R> {
	pub(crate) fn changed(value: R) -> Self {
		Self {
			value,
			changed: true,
		}
	}

	pub(crate) fn unchanged(value: R) -> Self {
		Self {
			value,
			changed: false,
		}
	}

	pub(crate) fn when(changed: bool, value: R) -> Self {
		Self { value, changed }
	}
}

pub(crate) struct CowCell<E, C> {
	store: Mutex<Store<E, C>>,
	published: ArcSwap<Frozen<E, C>>,
}

impl<E, C> CowCell<E, C>
where
	E: Entry,
	C: Comparer<E::Key>,
{
	/// Takes ownership of a populated store and performs the initial freeze.
	pub(crate) fn new(store: Store<E, C>) -> Self {
		let frozen = Frozen::freeze(&store, 0);
		Self {
			store: Mutex::new(store),
			published: ArcSwap::from_pointee(frozen),
		}
	}

	/// Cheap, short-lived access to the current snapshot.
	#[inline]
	pub(crate) fn load(&self) -> Guard<Arc<Frozen<E, C>>> {
		self.published.load()
	}

	/// An owned handle to the current snapshot.
	#[inline]
	pub(crate) fn load_full(&self) -> Arc<Frozen<E, C>> {
		self.published.load_full()
	}

	/// Runs `op` against the store under the writer lock and republishes if
	/// it reports a change.
	///
	/// If `f` panics, the store is reset to the published snapshot before the
	/// panic resumes, so a half-applied write is never published later.
	pub(crate) fn write<R>(
		&self,
		op: &'static str,
		f: impl FnOnce(&mut Store<E, C>) -> Written<R>,
	) -> R {
		let mut store = self.store.lock();
		let written = match panic::catch_unwind(AssertUnwindSafe(|| f(&mut store))) {
			Ok(written) => written,
			Err(payload) => {
				*store = self.thaw();
				tracing::warn!(op, "write panicked, store reset to published snapshot");
				panic::resume_unwind(payload);
			}
		};
		if written.changed {
			self.publish(op, &store);
		} else {
			tracing::trace!(op, "store unchanged, keeping published snapshot");
		}
		written.value
	}

	/// A detached store holding the current snapshot's entries.
	pub(crate) fn thaw(&self) -> Store<E, C> {
		self.published.load().thaw()
	}

	/// Freezes `store` and swaps the result in. Callers hold the writer lock.
	fn publish(&self, op: &'static str, store: &Store<E, C>) {
		let generation = self.published.load().generation() + 1;
		let frozen = Frozen::freeze(store, generation);
		tracing::trace!(op, len = frozen.len(), generation, "published snapshot");
		self.published.store(Arc::new(frozen));
	}
}

impl<E, C> CowCell<E, C> {
	/// The comparer shared by the store and every snapshot.
	pub(crate) fn comparer(&self) -> Arc<C> {
		Arc::clone(self.published.load().comparer())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::comparer::DefaultComparer;

	type Cell = CowCell<(u32, u32), DefaultComparer>;

	fn cell() -> Cell {
		CowCell::new(Store::with_capacity(0, Arc::new(DefaultComparer::default())))
	}

	#[test]
	fn initial_freeze_is_generation_zero() {
		let cell = cell();
		assert_eq!(cell.load().generation(), 0);
		assert_eq!(cell.load().len(), 0);
	}

	#[test]
	fn changed_write_publishes_next_generation() {
		let cell = cell();
		let before = cell.load_full();
		let replaced = cell.write("test", |store| Written::changed(store.upsert((1, 1))));
		assert_eq!(replaced, None);
		let after = cell.load_full();
		assert!(!Arc::ptr_eq(&before, &after));
		assert_eq!(after.generation(), 1);
		assert_eq!(after.len(), 1);
		assert_eq!(before.len(), 0);
	}

	#[test]
	fn unchanged_write_keeps_snapshot() {
		let cell = cell();
		let before = cell.load_full();
		let removed = cell.write("test", |store| {
			let removed = store.remove(&7);
			Written::when(removed.is_some(), removed)
		});
		assert_eq!(removed, None);
		assert!(Arc::ptr_eq(&before, &cell.load_full()));
		cell.write("test", |_| Written::unchanged(()));
		assert_eq!(cell.load().generation(), 0);
	}

	#[test]
	fn panicking_write_resets_store() {
		let cell = cell();
		cell.write("test", |store| Written::changed(store.upsert((1, 1))));

		let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
			cell.write("test", |store| -> Written<()> {
				store.upsert((2, 2));
				store.remove(&1);
				panic!("mid-write");
			})
		}));
		assert!(result.is_err());
		assert_eq!(cell.load().generation(), 1);

		cell.write("test", |store| Written::changed(store.upsert((3, 3))));
		let snap = cell.load();
		let mut keys: Vec<u32> = snap.entries().iter().map(|(k, _)| *k).collect();
		keys.sort();
		assert_eq!(keys, vec![1, 3]);
	}

	#[test]
	fn comparer_is_shared_with_snapshots() {
		let cell = cell();
		let comparer = cell.comparer();
		cell.write("test", |store| Written::changed(store.upsert((1, 2))));
		assert!(Arc::ptr_eq(&comparer, cell.load().comparer()));
	}
}
