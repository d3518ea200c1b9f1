use std::iter::FusedIterator;
use std::sync::Arc;

use crate::comparer::DefaultComparer;
use crate::snapshot::Frozen;
use crate::store::Inline;

/// Owning iterator over one published snapshot of a [`crate::FrozenSet`].
pub struct SetIter<T, C = DefaultComparer> {
	snap: Arc<Frozen<Inline<T>, C>>,
	front: usize,
	back: usize,
}

impl<T, C> SetIter<T, C> {
	pub(crate) fn new(snap: Arc<Frozen<Inline<T>, C>>) -> Self {
		let back = snap.len();
		Self {
			snap,
			front: 0,
			back,
		}
	}

	pub fn restart(&self) -> Self {
		Self::new(Arc::clone(&self.snap))
	}

	pub fn generation(&self) -> u64 {
		self.snap.generation()
	}
}

impl<T, C> Clone for SetIter<T, C> {
	fn clone(&self) -> Self {
		Self {
			snap: Arc::clone(&self.snap),
			front: self.front,
			back: self.back,
		}
	}
}

impl<T: Clone, C> Iterator for SetIter<T, C> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		if self.front == self.back {
			return None;
		}
		let value = self.snap.entries()[self.front].0.clone();
		self.front += 1;
		Some(value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.back - self.front;
		(remaining, Some(remaining))
	}
}

impl<T: Clone, C> DoubleEndedIterator for SetIter<T, C> {
	fn next_back(&mut self) -> Option<T> {
		if self.front == self.back {
			return None;
		}
		self.back -= 1;
		Some(self.snap.entries()[self.back].0.clone())
	}
}

impl<T: Clone, C> ExactSizeIterator for SetIter<T, C> {}
impl<T: Clone, C> FusedIterator for SetIter<T, C> {}

/// Borrowed iterator over a [`super::SetSnapshot`].
pub struct SetSnapshotIter<'a, T> {
	pub(crate) inner: std::slice::Iter<'a, Inline<T>>,
}

impl<T> Clone for SetSnapshotIter<'_, T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<'a, T> Iterator for SetSnapshotIter<'a, T> {
	type Item = &'a T;

	#[inline]
	fn next(&mut self) -> Option<&'a T> {
		self.inner.next().map(|inline| &inline.0)
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<T> DoubleEndedIterator for SetSnapshotIter<'_, T> {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.inner.next_back().map(|inline| &inline.0)
	}
}

impl<T> ExactSizeIterator for SetSnapshotIter<'_, T> {}
impl<T> FusedIterator for SetSnapshotIter<'_, T> {}
