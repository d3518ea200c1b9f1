use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use super::iter::SetSnapshotIter;
use crate::comparer::{Comparer, DefaultComparer};
use crate::snapshot::Frozen;
use crate::store::Inline;

/// A pinned, immutable view of a [`crate::FrozenSet`] at one instant.
pub struct SetSnapshot<T, C = DefaultComparer> {
	pub(crate) frozen: Arc<Frozen<Inline<T>, C>>,
}

impl<T, C> Clone for SetSnapshot<T, C> {
	fn clone(&self) -> Self {
		Self {
			frozen: Arc::clone(&self.frozen),
		}
	}
}

impl<T, C> SetSnapshot<T, C> {
	#[inline]
	pub fn len(&self) -> usize {
		self.frozen.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn iter(&self) -> SetSnapshotIter<'_, T> {
		SetSnapshotIter {
			inner: self.frozen.entries().iter(),
		}
	}

	pub fn generation(&self) -> u64 {
		self.frozen.generation()
	}

	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.frozen, &b.frozen)
	}
}

impl<T, C> SetSnapshot<T, C>
where
	T: Clone,
	C: Comparer<T>,
{
	#[inline]
	pub fn contains<Q>(&self, value: &Q) -> bool
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.frozen.position(value).is_some()
	}

	#[inline]
	pub fn get<Q>(&self, value: &Q) -> Option<&T>
	where
		Q: ?Sized,
		T: Borrow<Q>,
		C: Comparer<Q>,
	{
		self.frozen.get(value).map(|inline| &inline.0)
	}

	/// Whether every value of `self` is in `other`, judged by this
	/// snapshot's comparer.
	///
	/// Allocates one bit per value of `self` to discount duplicates in
	/// `other`.
	pub fn is_subset_of<'a, I>(&self, other: I) -> bool
	where
		T: 'a,
		I: IntoIterator<Item = &'a T>,
	{
		if self.is_empty() {
			return true;
		}
		self.distinct_hits(other, false) == Some(self.len())
	}

	/// Whether every value of `other` is in `self`.
	pub fn is_superset_of<'a, I>(&self, other: I) -> bool
	where
		T: 'a,
		I: IntoIterator<Item = &'a T>,
	{
		other.into_iter().all(|value| self.contains(value))
	}

	/// Whether `self` and `other` share at least one value.
	pub fn overlaps<'a, I>(&self, other: I) -> bool
	where
		T: 'a,
		I: IntoIterator<Item = &'a T>,
	{
		other.into_iter().any(|value| self.contains(value))
	}

	/// Whether `self` and `other` hold the same values, ignoring duplicates
	/// in `other`. Same cost as [`SetSnapshot::is_subset_of`].
	pub fn set_equals<'a, I>(&self, other: I) -> bool
	where
		T: 'a,
		I: IntoIterator<Item = &'a T>,
	{
		if self.is_empty() {
			return other.into_iter().next().is_none();
		}
		self.distinct_hits(other, true) == Some(self.len())
	}

	/// Counts the distinct values of `self` found in `other`. With
	/// `strict`, a value of `other` missing from `self` yields `None`.
	fn distinct_hits<'a, I>(&self, other: I, strict: bool) -> Option<usize>
	where
		T: 'a,
		I: IntoIterator<Item = &'a T>,
	{
		let mut seen = vec![0u64; self.len().div_ceil(64)];
		let mut hits = 0;
		for value in other {
			match self.frozen.position(value) {
				Some(position) => {
					let (word, bit) = (position / 64, 1u64 << (position % 64));
					if seen[word] & bit == 0 {
						seen[word] |= bit;
						hits += 1;
						if hits == self.len() && !strict {
							break;
						}
					}
				}
				None if strict => return None,
				None => {}
			}
		}
		Some(hits)
	}
}

impl<'a, T, C> IntoIterator for &'a SetSnapshot<T, C> {
	type Item = &'a T;
	type IntoIter = SetSnapshotIter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T: fmt::Debug, C> fmt::Debug for SetSnapshot<T, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}
