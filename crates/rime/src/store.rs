//! The mutable side of a container.
//!
//! A [`Store`] is the only structure ever written to. It lives behind the
//! container's writer mutex and is never handed to callers; readers only see
//! the snapshots frozen from it.

use std::borrow::Borrow;
use std::sync::Arc;

use hashbrown::HashTable;
use hashbrown::hash_table::Entry as TableEntry;

use crate::comparer::Comparer;

/// An item stored in a container, addressed by [`Entry::key`].
pub(crate) trait Entry: Clone {
	type Key;

	fn key(&self) -> &Self::Key;
}

impl<K: Clone, V: Clone> Entry for (K, V) {
	type Key = K;

	#[inline]
	fn key(&self) -> &K {
		&self.0
	}
}

/// A bare set element acting as its own key.
#[derive(Clone, Debug)]
pub(crate) struct Inline<T>(pub(crate) T);

impl<T: Clone> Entry for Inline<T> {
	type Key = T;

	#[inline]
	fn key(&self) -> &T {
		&self.0
	}
}

/// An entry together with its cached comparer hash.
#[derive(Clone, Debug)]
pub(crate) struct Slot<E> {
	pub(crate) hash: u64,
	pub(crate) entry: E,
}

pub(crate) struct Store<E, C> {
	table: HashTable<Slot<E>>,
	comparer: Arc<C>,
}

impl<E, C> Store<E, C>
where
	E: Entry,
	C: Comparer<E::Key>,
{
	pub(crate) fn with_capacity(capacity: usize, comparer: Arc<C>) -> Self {
		Self {
			table: HashTable::with_capacity(capacity),
			comparer,
		}
	}

	pub(crate) fn comparer(&self) -> &Arc<C> {
		&self.comparer
	}

	pub(crate) fn len(&self) -> usize {
		self.table.len()
	}

	pub(crate) fn slots(&self) -> impl ExactSizeIterator<Item = &Slot<E>> {
		self.table.iter()
	}

	pub(crate) fn contains<Q>(&self, key: &Q) -> bool
	where
		Q: ?Sized,
		E::Key: Borrow<Q>,
		C: Comparer<Q>,
	{
		let hash = self.comparer.hash_of(key);
		self.table
			.find(hash, |slot| {
				slot.hash == hash && self.comparer.equals(slot.entry.key().borrow(), key)
			})
			.is_some()
	}

	/// Inserts `entry` unless its key is present, in which case the entry is
	/// handed back untouched.
	pub(crate) fn insert_unique(&mut self, entry: E) -> Result<(), E> {
		let hash = self.comparer.hash_of(entry.key());
		let comparer = &self.comparer;
		match self.table.entry(
			hash,
			|slot| slot.hash == hash && comparer.equals(slot.entry.key(), entry.key()),
			|slot| slot.hash,
		) {
			TableEntry::Occupied(_) => Err(entry),
			TableEntry::Vacant(vacant) => {
				vacant.insert(Slot { hash, entry });
				Ok(())
			}
		}
	}

	/// Re-adds an entry whose key is known to be absent, reusing its cached
	/// hash.
	pub(crate) fn insert_hashed(&mut self, hash: u64, entry: E) {
		self.table
			.insert_unique(hash, Slot { hash, entry }, |slot| slot.hash);
	}

	/// Inserts `entry`, replacing and returning any entry with an equal key.
	pub(crate) fn upsert(&mut self, entry: E) -> Option<E> {
		let hash = self.comparer.hash_of(entry.key());
		let comparer = &self.comparer;
		match self.table.entry(
			hash,
			|slot| slot.hash == hash && comparer.equals(slot.entry.key(), entry.key()),
			|slot| slot.hash,
		) {
			TableEntry::Occupied(mut occupied) => {
				Some(std::mem::replace(&mut occupied.get_mut().entry, entry))
			}
			TableEntry::Vacant(vacant) => {
				vacant.insert(Slot { hash, entry });
				None
			}
		}
	}

	pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<E>
	where
		Q: ?Sized,
		E::Key: Borrow<Q>,
		C: Comparer<Q>,
	{
		let hash = self.comparer.hash_of(key);
		let comparer = &self.comparer;
		let found = self.table.find_entry(hash, |slot| {
			slot.hash == hash && comparer.equals(slot.entry.key().borrow(), key)
		});
		match found {
			Ok(occupied) => Some(occupied.remove().0.entry),
			Err(_) => None,
		}
	}

	/// Keeps the entries for which `keep` returns true. Returns how many were
	/// dropped.
	pub(crate) fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) -> usize {
		let before = self.table.len();
		self.table.retain(|slot| keep(&slot.entry));
		before - self.table.len()
	}

	pub(crate) fn clear(&mut self) {
		self.table.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::comparer::{CaseInsensitive, DefaultComparer};

	fn store() -> Store<(String, u32), DefaultComparer> {
		Store::with_capacity(0, Arc::new(DefaultComparer::default()))
	}

	#[test]
	fn insert_unique_rejects_existing_key() {
		let mut store = store();
		assert!(store.insert_unique(("a".into(), 1)).is_ok());
		let rejected = store.insert_unique(("a".into(), 2)).unwrap_err();
		assert_eq!(rejected, ("a".to_owned(), 2));
		assert_eq!(store.len(), 1);
		assert_eq!(store.slots().next().unwrap().entry.1, 1);
	}

	#[test]
	fn upsert_returns_replaced_entry() {
		let mut store = store();
		assert_eq!(store.upsert(("a".into(), 1)), None);
		assert_eq!(store.upsert(("a".into(), 2)), Some(("a".into(), 1)));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn remove_by_borrowed_key() {
		let mut store = store();
		store.upsert(("a".into(), 1));
		assert!(store.contains("a"));
		assert_eq!(store.remove("a"), Some(("a".into(), 1)));
		assert_eq!(store.remove("a"), None);
		assert_eq!(store.len(), 0);
	}

	#[test]
	fn comparer_drives_identity() {
		let mut store: Store<Inline<String>, CaseInsensitive> =
			Store::with_capacity(4, Arc::new(CaseInsensitive));
		assert!(store.insert_unique(Inline("Key".into())).is_ok());
		assert!(store.insert_unique(Inline("KEY".into())).is_err());
		assert!(store.contains("key"));
	}

	#[test]
	fn retain_reports_dropped_count() {
		let mut store = store();
		for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
			store.upsert((k.into(), i as u32));
		}
		assert_eq!(store.retain(|(_, v)| v % 2 == 0), 2);
		assert_eq!(store.len(), 2);
		store.clear();
		assert_eq!(store.len(), 0);
	}
}
