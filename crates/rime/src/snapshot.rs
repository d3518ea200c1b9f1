//! Immutable published state.
//!
//! A [`Frozen`] is built once from a [`Store`] and never mutated afterwards.
//! Entries live in a dense slice and a separate hash index maps keys to
//! positions in it, so a lookup is one hash search and iteration is a slice
//! walk.

use std::borrow::Borrow;
use std::sync::Arc;

use hashbrown::HashTable;

use crate::comparer::Comparer;
use crate::store::{Entry, Store};

pub(crate) struct Frozen<E, C> {
	entries: Box<[E]>,
	/// `(hash, position)` pairs into `entries`.
	index: HashTable<(u64, usize)>,
	comparer: Arc<C>,
	generation: u64,
}

impl<E, C> Frozen<E, C>
where
	E: Entry,
	C: Comparer<E::Key>,
{
	/// Rebuilds a complete snapshot from the store's current contents.
	///
	/// Cost is linear in the store size. Cached slot hashes are reused, so
	/// the comparer is not consulted while building.
	pub(crate) fn freeze(store: &Store<E, C>, generation: u64) -> Self {
		let mut entries = Vec::with_capacity(store.len());
		let mut index = HashTable::with_capacity(store.len());
		for slot in store.slots() {
			let position = entries.len();
			entries.push(slot.entry.clone());
			index.insert_unique(slot.hash, (slot.hash, position), |&(hash, _)| hash);
		}
		Self {
			entries: entries.into_boxed_slice(),
			index,
			comparer: Arc::clone(store.comparer()),
			generation,
		}
	}

	pub(crate) fn position<Q>(&self, key: &Q) -> Option<usize>
	where
		Q: ?Sized,
		E::Key: Borrow<Q>,
		C: Comparer<Q>,
	{
		if self.entries.is_empty() {
			return None;
		}
		let hash = self.comparer.hash_of(key);
		self.index
			.find(hash, |&(h, position)| {
				h == hash && self.comparer.equals(self.entries[position].key().borrow(), key)
			})
			.map(|&(_, position)| position)
	}

	/// Rebuilds a mutable store holding exactly this snapshot's entries,
	/// under the same comparer.
	pub(crate) fn thaw(&self) -> Store<E, C> {
		let mut store = Store::with_capacity(self.entries.len(), Arc::clone(&self.comparer));
		for &(hash, position) in &self.index {
			store.insert_hashed(hash, self.entries[position].clone());
		}
		store
	}

	#[inline]
	pub(crate) fn get<Q>(&self, key: &Q) -> Option<&E>
	where
		Q: ?Sized,
		E::Key: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.position(key).map(|position| &self.entries[position])
	}
}

impl<E, C> Frozen<E, C> {
	#[inline]
	pub(crate) fn entries(&self) -> &[E] {
		&self.entries
	}

	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	#[inline]
	pub(crate) fn generation(&self) -> u64 {
		self.generation
	}

	#[inline]
	pub(crate) fn comparer(&self) -> &Arc<C> {
		&self.comparer
	}
}
