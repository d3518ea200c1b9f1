//! Read-optimized value set.
//!
//! Same publication protocol as [`crate::FrozenMap`], applied to bare values.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use crate::cell::{CowCell, Written};
use crate::comparer::{Comparer, DefaultComparer};
use crate::store::{Inline, Store};

mod iter;
mod snapshot;

pub use iter::{SetIter, SetSnapshotIter};
pub use snapshot::SetSnapshot;

/// A hash set whose membership checks never block and never lock.
///
/// ```
/// use rime::{CaseInsensitive, FrozenSet};
///
/// let words = FrozenSet::from_iter_with_comparer(["HELLO".to_owned()], CaseInsensitive);
/// assert!(words.contains("hello"));
/// assert!(!words.insert("hello".to_owned()));
/// assert_eq!(words.len(), 1);
/// ```
pub struct FrozenSet<T, C = DefaultComparer> {
	pub(crate) cell: CowCell<Inline<T>, C>,
}

impl<T> FrozenSet<T>
where
	T: Hash + Eq + Clone,
{
	pub fn new() -> Self {
		Self::with_comparer(DefaultComparer::default())
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self::with_capacity_and_comparer(capacity, DefaultComparer::default())
	}
}

impl<T, C> FrozenSet<T, C>
where
	T: Clone,
	C: Comparer<T>,
{
	pub fn with_comparer(comparer: C) -> Self {
		Self::with_capacity_and_comparer(0, comparer)
	}

	pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
		Self::from_store(Store::with_capacity(capacity, Arc::new(comparer)))
	}

	/// Builds a set from `iter` under `comparer`. The first of several equal
	/// values is the one kept.
	pub fn from_iter_with_comparer<I>(iter: I, comparer: C) -> Self
	where
		I: IntoIterator<Item = T>,
	{
		let iter = iter.into_iter();
		let mut store = Store::with_capacity(iter.size_hint().0, Arc::new(comparer));
		for value in iter {
			let _ = store.insert_unique(Inline(value));
		}
		Self::from_store(store)
	}

	pub(crate) fn from_store(store: Store<Inline<T>, C>) -> Self {
		Self {
			cell: CowCell::new(store),
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.cell.load().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[inline]
	pub fn contains<Q>(&self, value: &Q) -> bool
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.load().position(value).is_some()
	}

	/// Returns a clone of the stored value equal to `value`, which may differ
	/// from `value` itself under a custom comparer.
	pub fn get<Q>(&self, value: &Q) -> Option<T>
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.load().get(value).map(|inline| inline.0.clone())
	}

	pub fn snapshot(&self) -> SetSnapshot<T, C> {
		SetSnapshot {
			frozen: self.cell.load_full(),
		}
	}

	pub fn iter(&self) -> SetIter<T, C> {
		SetIter::new(self.cell.load_full())
	}

	pub fn generation(&self) -> u64 {
		self.cell.load().generation()
	}

	pub fn comparer(&self) -> Arc<C> {
		self.cell.comparer()
	}

	/// Adds `value`. Returns false, publishing nothing, if an equal value is
	/// already present.
	pub fn insert(&self, value: T) -> bool {
		self.cell.write("insert", |store| {
			let added = store.insert_unique(Inline(value)).is_ok();
			Written::when(added, added)
		})
	}

	/// Removes the value equal to `value`. Returns whether one was present.
	pub fn remove<Q>(&self, value: &Q) -> bool
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.take(value).is_some()
	}

	/// Removes and returns the stored value equal to `value`.
	pub fn take<Q>(&self, value: &Q) -> Option<T>
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.write("remove", |store| {
			let removed = store.remove(value).map(|inline| inline.0);
			Written::when(removed.is_some(), removed)
		})
	}

	/// Adds every value of `iter`, publishing once if anything was new.
	/// Returns how many values were added.
	///
	/// Like every bulk operation on the set, `iter` is drained before the
	/// writer lock is taken.
	pub fn insert_many<I>(&self, iter: I) -> usize
	where
		I: IntoIterator<Item = T>,
	{
		let batch: Vec<T> = iter.into_iter().collect();
		self.cell.write("insert_many", |store| {
			let mut added = 0;
			for value in batch {
				added += store.insert_unique(Inline(value)).is_ok() as usize;
			}
			tracing::debug!(added, "bulk insert");
			Written::when(added > 0, added)
		})
	}

	/// Removes every value that appears in `other`. Returns how many were
	/// removed.
	pub fn except_with<I>(&self, other: I) -> usize
	where
		I: IntoIterator<Item = T>,
	{
		let other: Vec<T> = other.into_iter().collect();
		self.cell.write("except_with", |store| {
			let mut removed = 0;
			for value in other {
				removed += store.remove(&value).is_some() as usize;
			}
			Written::when(removed > 0, removed)
		})
	}

	/// Keeps only the values that also appear in `other`. Returns how many
	/// were removed.
	pub fn intersect_with<I>(&self, other: I) -> usize
	where
		I: IntoIterator<Item = T>,
	{
		let keep = collect_under(other, &self.cell.comparer());
		self.cell.write("intersect_with", |store| {
			let removed = store.retain(|inline| keep.contains(&inline.0));
			Written::when(removed > 0, removed)
		})
	}

	/// Keeps the values present in exactly one of `self` and `other`.
	/// Returns how many values were added or removed.
	pub fn symmetric_except_with<I>(&self, other: I) -> usize
	where
		I: IntoIterator<Item = T>,
	{
		let other = collect_under(other, &self.cell.comparer());
		self.cell.write("symmetric_except_with", |store| {
			let mut touched = 0;
			for slot in other.slots() {
				let value = &slot.entry.0;
				if store.remove(value).is_none() {
					let _ = store.insert_unique(slot.entry.clone());
				}
				touched += 1;
			}
			Written::when(touched > 0, touched)
		})
	}

	/// Keeps only the values for which `keep` returns true. Returns how many
	/// were removed.
	///
	/// `keep` runs under the writer lock and must not write to this set. If
	/// it panics the set keeps its previous contents.
	pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> usize {
		self.cell.write("retain", |store| {
			let removed = store.retain(|inline| keep(&inline.0));
			Written::when(removed > 0, removed)
		})
	}

	pub fn clear(&self) {
		self.cell.write("clear", |store| {
			store.clear();
			Written::changed(())
		})
	}
}

/// Deduplicates `values` under the set's own comparer.
fn collect_under<T, C, I>(values: I, comparer: &Arc<C>) -> Store<Inline<T>, C>
where
	T: Clone,
	C: Comparer<T>,
	I: IntoIterator<Item = T>,
{
	let values = values.into_iter();
	let mut store = Store::with_capacity(values.size_hint().0, Arc::clone(comparer));
	for value in values {
		let _ = store.insert_unique(Inline(value));
	}
	store
}
