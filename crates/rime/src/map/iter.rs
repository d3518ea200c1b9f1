use std::iter::FusedIterator;
use std::sync::Arc;

use crate::comparer::DefaultComparer;
use crate::snapshot::Frozen;

/// Owning iterator over one published snapshot of a [`crate::FrozenMap`].
///
/// The iterator holds its own reference to the snapshot it started on, so
/// writes published mid-iteration are not observed. Cloning forks the
/// cursor; [`Iter::restart`] starts over on the same snapshot.
pub struct Iter<K, V, C = DefaultComparer> {
	snap: Arc<Frozen<(K, V), C>>,
	front: usize,
	back: usize,
}

impl<K, V, C> Iter<K, V, C> {
	pub(crate) fn new(snap: Arc<Frozen<(K, V), C>>) -> Self {
		let back = snap.len();
		Self {
			snap,
			front: 0,
			back,
		}
	}

	/// A fresh iterator over the same snapshot, starting from the beginning.
	pub fn restart(&self) -> Self {
		Self::new(Arc::clone(&self.snap))
	}

	/// Generation of the snapshot being iterated.
	pub fn generation(&self) -> u64 {
		self.snap.generation()
	}
}

impl<K, V, C> Clone for Iter<K, V, C> {
	fn clone(&self) -> Self {
		Self {
			snap: Arc::clone(&self.snap),
			front: self.front,
			back: self.back,
		}
	}
}

impl<K, V, C> Iter<K, V, C> {
	/// Moves the front cursor, returning the position it passed.
	fn advance(&mut self) -> Option<usize> {
		if self.front == self.back {
			return None;
		}
		self.front += 1;
		Some(self.front - 1)
	}

	fn advance_back(&mut self) -> Option<usize> {
		if self.front == self.back {
			return None;
		}
		self.back -= 1;
		Some(self.back)
	}

	fn entry(&self, position: usize) -> &(K, V) {
		&self.snap.entries()[position]
	}

	fn remaining(&self) -> usize {
		self.back - self.front
	}
}

impl<K: Clone, V: Clone, C> Iterator for Iter<K, V, C> {
	type Item = (K, V);

	fn next(&mut self) -> Option<(K, V)> {
		let position = self.advance()?;
		Some(self.entry(position).clone())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining(), Some(self.remaining()))
	}
}

impl<K: Clone, V: Clone, C> DoubleEndedIterator for Iter<K, V, C> {
	fn next_back(&mut self) -> Option<(K, V)> {
		let position = self.advance_back()?;
		Some(self.entry(position).clone())
	}
}

impl<K: Clone, V: Clone, C> ExactSizeIterator for Iter<K, V, C> {}
impl<K: Clone, V: Clone, C> FusedIterator for Iter<K, V, C> {}

/// Owning iterator over the keys of one snapshot.
pub struct Keys<K, V, C = DefaultComparer>(pub(crate) Iter<K, V, C>);

/// Owning iterator over the values of one snapshot.
pub struct Values<K, V, C = DefaultComparer>(pub(crate) Iter<K, V, C>);

macro_rules! projection {
	($name:ident, $item:ident, $field:tt) => {
		impl<K, V, C> $name<K, V, C> {
			/// A fresh iterator over the same snapshot.
			pub fn restart(&self) -> Self {
				Self(self.0.restart())
			}

			pub fn generation(&self) -> u64 {
				self.0.generation()
			}
		}

		impl<K, V, C> Clone for $name<K, V, C> {
			fn clone(&self) -> Self {
				Self(self.0.clone())
			}
		}

		impl<K: Clone, V: Clone, C> Iterator for $name<K, V, C> {
			type Item = $item;

			fn next(&mut self) -> Option<$item> {
				let position = self.0.advance()?;
				Some(self.0.entry(position).$field.clone())
			}

			fn size_hint(&self) -> (usize, Option<usize>) {
				self.0.size_hint()
			}
		}

		impl<K: Clone, V: Clone, C> DoubleEndedIterator for $name<K, V, C> {
			fn next_back(&mut self) -> Option<$item> {
				let position = self.0.advance_back()?;
				Some(self.0.entry(position).$field.clone())
			}
		}

		impl<K: Clone, V: Clone, C> ExactSizeIterator for $name<K, V, C> {}
		impl<K: Clone, V: Clone, C> FusedIterator for $name<K, V, C> {}
	};
}

projection!(Keys, K, 0);
projection!(Values, V, 1);

/// Borrowed iterator over a [`super::MapSnapshot`].
pub struct SnapshotIter<'a, K, V> {
	pub(crate) inner: std::slice::Iter<'a, (K, V)>,
}

impl<K, V> Clone for SnapshotIter<'_, K, V> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<'a, K, V> Iterator for SnapshotIter<'a, K, V> {
	type Item = (&'a K, &'a V);

	#[inline]
	fn next(&mut self) -> Option<(&'a K, &'a V)> {
		self.inner.next().map(|(k, v)| (k, v))
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V> DoubleEndedIterator for SnapshotIter<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|(k, v)| (k, v))
	}
}

impl<K, V> ExactSizeIterator for SnapshotIter<'_, K, V> {}
impl<K, V> FusedIterator for SnapshotIter<'_, K, V> {}
