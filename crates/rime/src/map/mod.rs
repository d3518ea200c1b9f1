//! Read-optimized key/value map.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use crate::cell::{CowCell, Written};
use crate::comparer::{Comparer, DefaultComparer};
use crate::error::{Error, Result};
use crate::store::Store;

mod iter;
mod snapshot;

pub use iter::{Iter, Keys, SnapshotIter, Values};
pub use snapshot::{MapSnapshot, ValueRef};

/// A hash map whose reads never block and never lock.
///
/// Every successful write rebuilds an immutable snapshot and publishes it
/// atomically; reads are served from whichever snapshot is current. Writes
/// cost time proportional to the map's size, so prefer
/// [`FrozenMap::insert_many`] over repeated single inserts.
///
/// ```
/// use rime::FrozenMap;
///
/// let routes = FrozenMap::new();
/// routes.insert("a", 1).unwrap();
/// routes.insert("b", 2).unwrap();
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes.get_cloned("a"), Some(1));
/// assert!(routes.insert("a", 3).is_err());
/// ```
pub struct FrozenMap<K, V, C = DefaultComparer> {
	pub(crate) cell: CowCell<(K, V), C>,
}

impl<K, V> FrozenMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
{
	/// Creates an empty map using the key type's own `Hash` and `Eq`.
	pub fn new() -> Self {
		Self::with_comparer(DefaultComparer::default())
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self::with_capacity_and_comparer(capacity, DefaultComparer::default())
	}
}

impl<K, V, C> FrozenMap<K, V, C>
where
	K: Clone,
	V: Clone,
	C: Comparer<K>,
{
	pub fn with_comparer(comparer: C) -> Self {
		Self::with_capacity_and_comparer(0, comparer)
	}

	pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
		Self::from_store(Store::with_capacity(capacity, Arc::new(comparer)))
	}

	/// Builds a map from `iter` under `comparer`. Later entries overwrite
	/// earlier ones with an equal key.
	pub fn from_iter_with_comparer<I>(iter: I, comparer: C) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let iter = iter.into_iter();
		let mut store = Store::with_capacity(iter.size_hint().0, Arc::new(comparer));
		for entry in iter {
			store.upsert(entry);
		}
		Self::from_store(store)
	}

	pub(crate) fn from_store(store: Store<(K, V), C>) -> Self {
		Self {
			cell: CowCell::new(store),
		}
	}

	/// Number of entries in the current snapshot.
	#[inline]
	pub fn len(&self) -> usize {
		self.cell.load().len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[inline]
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.load().position(key).is_some()
	}

	/// Looks up `key`, returning a handle that keeps the snapshot it was
	/// found in alive.
	#[inline]
	pub fn get<Q>(&self, key: &Q) -> Option<ValueRef<K, V, C>>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		let snap = self.cell.load_full();
		let position = snap.position(key)?;
		Some(ValueRef { snap, position })
	}

	/// Looks up `key` and clones the value out.
	#[inline]
	pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.load().get(key).map(|(_, v)| v.clone())
	}

	/// Pins the current snapshot for borrowed reads.
	pub fn snapshot(&self) -> MapSnapshot<K, V, C> {
		MapSnapshot {
			frozen: self.cell.load_full(),
		}
	}

	/// Iterates the snapshot current at the time of the call, yielding
	/// cloned entries.
	pub fn iter(&self) -> Iter<K, V, C> {
		Iter::new(self.cell.load_full())
	}

	pub fn keys(&self) -> Keys<K, V, C> {
		Keys(self.iter())
	}

	pub fn values(&self) -> Values<K, V, C> {
		Values(self.iter())
	}

	/// The number of snapshots published after the initial one.
	pub fn generation(&self) -> u64 {
		self.cell.load().generation()
	}

	pub fn comparer(&self) -> Arc<C> {
		self.cell.comparer()
	}

	/// Inserts a new entry.
	///
	/// # Errors
	///
	/// [`Error::DuplicateKey`] if `key` is already present. The map is left
	/// unchanged.
	pub fn insert(&self, key: K, value: V) -> Result<()> {
		self.cell.write("insert", |store| match store.insert_unique((key, value)) {
			Ok(()) => Written::changed(Ok(())),
			Err(_) => {
				tracing::trace!("insert rejected: duplicate key");
				Written::unchanged(Err(Error::DuplicateKey))
			}
		})
	}

	/// Inserts a new entry unless `key` is present. Returns whether the
	/// entry was inserted.
	pub fn try_insert(&self, key: K, value: V) -> bool {
		self.insert(key, value).is_ok()
	}

	/// Inserts or overwrites the entry for `key`, returning the previous
	/// value.
	///
	/// Always republishes, even when the new value equals the old one.
	pub fn set(&self, key: K, value: V) -> Option<V> {
		self.cell.write("set", |store| {
			Written::changed(store.upsert((key, value)).map(|(_, old)| old))
		})
	}

	pub fn remove<Q>(&self, key: &Q) -> Option<V>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.remove_entry(key).map(|(_, v)| v)
	}

	/// Removes the entry for `key`. Nothing is republished when the key was
	/// absent.
	pub fn remove_entry<Q>(&self, key: &Q) -> Option<(K, V)>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.cell.write("remove", |store| {
			let removed = store.remove(key);
			Written::when(removed.is_some(), removed)
		})
	}

	/// Inserts or overwrites every entry of `iter`, publishing once at the
	/// end. Returns how many entries were written.
	///
	/// `iter` is drained before the writer lock is taken, so it may read from
	/// or write to this map, and a panic while producing items leaves the map
	/// untouched.
	pub fn insert_many<I>(&self, iter: I) -> usize
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let batch: Vec<(K, V)> = iter.into_iter().collect();
		self.cell.write("insert_many", |store| {
			let written = batch.len();
			for entry in batch {
				store.upsert(entry);
			}
			tracing::debug!(written, "bulk insert");
			Written::when(written > 0, written)
		})
	}

	/// Inserts every entry of `iter` or none of them.
	///
	/// # Errors
	///
	/// [`Error::DuplicateKey`] if any key is already present or appears twice
	/// in `iter`. The map is left unchanged.
	pub fn try_insert_many<I>(&self, iter: I) -> Result<usize>
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let batch: Vec<(K, V)> = iter.into_iter().collect();
		self.cell.write("try_insert_many", |store| {
			let mut seen = Store::with_capacity(batch.len(), Arc::clone(store.comparer()));
			for (key, _) in &batch {
				if store.contains(key) || seen.insert_unique((key.clone(), ())).is_err() {
					tracing::debug!(batch = batch.len(), "bulk insert rejected: duplicate key");
					return Written::unchanged(Err(Error::DuplicateKey));
				}
			}
			let written = batch.len();
			for entry in batch {
				let _ = store.insert_unique(entry);
			}
			tracing::debug!(written, "bulk insert");
			Written::when(written > 0, Ok(written))
		})
	}

	/// Keeps only the entries for which `keep` returns true, publishing once
	/// if anything was dropped. Returns the number of dropped entries.
	///
	/// `keep` runs under the writer lock and must not write to this map. If
	/// it panics the map keeps its previous contents.
	pub fn retain(&self, mut keep: impl FnMut(&K, &V) -> bool) -> usize {
		self.cell.write("retain", |store| {
			let dropped = store.retain(|(k, v)| keep(k, v));
			Written::when(dropped > 0, dropped)
		})
	}

	/// Removes every entry and publishes an empty snapshot.
	pub fn clear(&self) {
		self.cell.write("clear", |store| {
			store.clear();
			Written::changed(())
		})
	}
}
