//! Standard-library trait impls for the containers.
//!
//! These let [`FrozenMap`] and [`FrozenSet`] stand in wherever code expects
//! the usual collection traits. Every write-flavored trait goes through the
//! same bulk paths as the inherent API, so it publishes at most once.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::comparer::{Comparer, DefaultComparer};
use crate::map::{FrozenMap, Iter};
use crate::set::{FrozenSet, SetIter};

impl<K, V> Default for FrozenMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> FromIterator<(K, V)> for FrozenMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_iter_with_comparer(iter, DefaultComparer::default())
	}
}

impl<K, V, S> From<HashMap<K, V, S>> for FrozenMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
	S: BuildHasher,
{
	fn from(map: HashMap<K, V, S>) -> Self {
		Self::from_iter(map)
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for FrozenMap<K, V>
where
	K: Hash + Eq + Clone,
	V: Clone,
{
	fn from(entries: [(K, V); N]) -> Self {
		Self::from_iter(entries)
	}
}

/// Overwrites existing keys, like [`FrozenMap::insert_many`].
impl<K, V, C> Extend<(K, V)> for FrozenMap<K, V, C>
where
	K: Clone,
	V: Clone,
	C: Comparer<K>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.insert_many(iter);
	}
}

/// Copies the current snapshot into an independent map that shares this
/// map's comparer.
impl<K, V, C> Clone for FrozenMap<K, V, C>
where
	K: Clone,
	V: Clone,
	C: Comparer<K>,
{
	fn clone(&self) -> Self {
		Self::from_store(self.cell.thaw())
	}
}

impl<'a, K, V, C> IntoIterator for &'a FrozenMap<K, V, C>
where
	K: Clone,
	V: Clone,
	C: Comparer<K>,
{
	type Item = (K, V);
	type IntoIter = Iter<K, V, C>;

	fn into_iter(self) -> Iter<K, V, C> {
		self.iter()
	}
}

impl<K, V, C> fmt::Debug for FrozenMap<K, V, C>
where
	K: Clone + fmt::Debug,
	V: Clone + fmt::Debug,
	C: Comparer<K>,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.snapshot(), f)
	}
}

impl<T> Default for FrozenSet<T>
where
	T: Hash + Eq + Clone,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> FromIterator<T> for FrozenSet<T>
where
	T: Hash + Eq + Clone,
{
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self::from_iter_with_comparer(iter, DefaultComparer::default())
	}
}

impl<T, S> From<HashSet<T, S>> for FrozenSet<T>
where
	T: Hash + Eq + Clone,
	S: BuildHasher,
{
	fn from(set: HashSet<T, S>) -> Self {
		Self::from_iter(set)
	}
}

impl<T, const N: usize> From<[T; N]> for FrozenSet<T>
where
	T: Hash + Eq + Clone,
{
	fn from(values: [T; N]) -> Self {
		Self::from_iter(values)
	}
}

impl<T, C> Extend<T> for FrozenSet<T, C>
where
	T: Clone,
	C: Comparer<T>,
{
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.insert_many(iter);
	}
}

impl<T, C> Clone for FrozenSet<T, C>
where
	T: Clone,
	C: Comparer<T>,
{
	fn clone(&self) -> Self {
		Self::from_store(self.cell.thaw())
	}
}

impl<'a, T, C> IntoIterator for &'a FrozenSet<T, C>
where
	T: Clone,
	C: Comparer<T>,
{
	type Item = T;
	type IntoIter = SetIter<T, C>;

	fn into_iter(self) -> SetIter<T, C> {
		self.iter()
	}
}

impl<T, C> fmt::Debug for FrozenSet<T, C>
where
	T: Clone + fmt::Debug,
	C: Comparer<T>,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.snapshot(), f)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::{HashMap, HashSet};

	use crate::{CaseInsensitive, FrozenMap, FrozenSet};

	#[test]
	fn test_collect_and_extend_map() {
		let mut map: FrozenMap<u32, u32> = (0..3).map(|i| (i, i)).collect();
		map.extend([(3, 3), (0, 10)]);
		assert_eq!(map.len(), 4);
		assert_eq!(map.get_cloned(&0), Some(10));
		assert_eq!(map.generation(), 1);

		let from_std = FrozenMap::from(HashMap::from([("a", 1)]));
		assert_eq!(from_std.get_cloned("a"), Some(1));
		let from_array = FrozenMap::from([("b", 2)]);
		assert_eq!(from_array.len(), 1);
	}

	#[test]
	fn test_clone_is_independent_and_keeps_comparer() {
		let map = FrozenMap::with_comparer(CaseInsensitive);
		map.set("Key".to_owned(), 1);
		let copy = map.clone();
		map.clear();

		assert!(map.is_empty());
		assert_eq!(copy.get_cloned("KEY"), Some(1));
		assert!(std::sync::Arc::ptr_eq(&map.comparer(), &copy.comparer()));
	}

	#[test]
	fn test_set_traits() {
		let mut set: FrozenSet<u8> = [1, 2].into();
		set.extend([2, 3]);
		assert_eq!(set.len(), 3);
		let mut seen: Vec<u8> = (&set).into_iter().collect();
		seen.sort();
		assert_eq!(seen, vec![1, 2, 3]);

		let from_std = FrozenSet::from(HashSet::from(["x"]));
		assert!(from_std.contains("x"));
		assert_eq!(format!("{:?}", FrozenSet::from([7u8])), "{7}");
		assert_eq!(format!("{:?}", FrozenMap::from([(1u8, 'a')])), "{1: 'a'}");
	}
}
