use std::borrow::Borrow;
use std::fmt;
use std::ops::{Deref, Index};
use std::sync::Arc;

use super::iter::SnapshotIter;
use crate::comparer::{Comparer, DefaultComparer};
use crate::snapshot::Frozen;

/// A pinned, immutable view of a [`crate::FrozenMap`] at one instant.
///
/// Holding a snapshot keeps its entries alive even after the map has
/// published newer ones. Cloning is a reference-count increment.
pub struct MapSnapshot<K, V, C = DefaultComparer> {
	pub(crate) frozen: Arc<Frozen<(K, V), C>>,
}

impl<K, V, C> Clone for MapSnapshot<K, V, C> {
	fn clone(&self) -> Self {
		Self {
			frozen: Arc::clone(&self.frozen),
		}
	}
}

impl<K, V, C> MapSnapshot<K, V, C>
where
	K: Clone,
	V: Clone,
	C: Comparer<K>,
{
	#[inline]
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.frozen.get(key).map(|(_, v)| v)
	}

	#[inline]
	pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.frozen.get(key).map(|(k, v)| (k, v))
	}

	#[inline]
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		Q: ?Sized,
		K: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.frozen.position(key).is_some()
	}
}

impl<K, V, C> MapSnapshot<K, V, C> {
	#[inline]
	pub fn len(&self) -> usize {
		self.frozen.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Borrowed iteration in unspecified order.
	pub fn iter(&self) -> SnapshotIter<'_, K, V> {
		SnapshotIter {
			inner: self.frozen.entries().iter(),
		}
	}

	pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
		self.iter().map(|(k, _)| k)
	}

	pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
		self.iter().map(|(_, v)| v)
	}

	/// Which publication of the map this snapshot is. Later snapshots of the
	/// same map have strictly larger generations.
	pub fn generation(&self) -> u64 {
		self.frozen.generation()
	}

	/// Whether both handles pin the very same published snapshot.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.frozen, &b.frozen)
	}
}

impl<K, V, C, Q> Index<&Q> for MapSnapshot<K, V, C>
where
	Q: ?Sized,
	K: Clone + Borrow<Q>,
	V: Clone,
	C: Comparer<K> + Comparer<Q>,
{
	type Output = V;

	/// # Panics
	///
	/// Panics if `key` is not present.
	fn index(&self, key: &Q) -> &V {
		self.get(key).expect("key not present in snapshot")
	}
}

impl<'a, K, V, C> IntoIterator for &'a MapSnapshot<K, V, C> {
	type Item = (&'a K, &'a V);
	type IntoIter = SnapshotIter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for MapSnapshot<K, V, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

/// Snapshot-pinning handle to a single value.
///
/// Dereferences to the value found by [`crate::FrozenMap::get`]; the
/// snapshot it came from stays alive for as long as the handle does.
pub struct ValueRef<K, V, C = DefaultComparer> {
	pub(crate) snap: Arc<Frozen<(K, V), C>>,
	pub(crate) position: usize,
}

impl<K, V, C> Clone for ValueRef<K, V, C> {
	fn clone(&self) -> Self {
		Self {
			snap: Arc::clone(&self.snap),
			position: self.position,
		}
	}
}

impl<K, V, C> ValueRef<K, V, C> {
	/// The stored key, which may differ from the lookup key under a custom
	/// comparer.
	pub fn key(&self) -> &K {
		&self.snap.entries()[self.position].0
	}

	pub fn value(&self) -> &V {
		&self.snap.entries()[self.position].1
	}

	/// The generation of the snapshot this value was read from.
	pub fn generation(&self) -> u64 {
		self.snap.generation()
	}
}

impl<K, V, C> Deref for ValueRef<K, V, C> {
	type Target = V;

	fn deref(&self) -> &V {
		self.value()
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for ValueRef<K, V, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValueRef")
			.field("key", self.key())
			.field("value", self.value())
			.field("generation", &self.generation())
			.finish()
	}
}
