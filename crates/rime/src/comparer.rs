//! Equality and hashing policies for keys and values.
//!
//! A container fixes its [`Comparer`] at construction and uses the same
//! instance for its mutable store and for every published snapshot, so both
//! sides always agree on which keys are "the same".

use std::hash::{BuildHasher, Hash, Hasher};

use rustc_hash::{FxBuildHasher, FxHasher};

/// Pluggable equality and hashing for values of type `T`.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash_of(a) == hash_of(b)`. When a container is queried through a
/// borrowed form `Q` of its key type `K` (`K: Borrow<Q>`), the comparer must
/// also hash `k` and `k.borrow()` identically.
pub trait Comparer<T: ?Sized>: Send + Sync {
	fn equals(&self, a: &T, b: &T) -> bool;

	fn hash_of(&self, value: &T) -> u64;
}

/// Uses the type's own `Hash` and `Eq` implementations.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultComparer<S = FxBuildHasher> {
	build: S,
}

impl<S> DefaultComparer<S> {
	/// Hash through `build` instead of the default Fx hasher.
	pub fn with_hasher(build: S) -> Self {
		Self { build }
	}
}

impl<T, S> Comparer<T> for DefaultComparer<S>
where
	T: Hash + Eq + ?Sized,
	S: BuildHasher + Send + Sync,
{
	#[inline]
	fn equals(&self, a: &T, b: &T) -> bool {
		a == b
	}

	#[inline]
	fn hash_of(&self, value: &T) -> u64 {
		self.build.hash_one(value)
	}
}

/// Compares strings after Unicode lowercase folding.
///
/// `"HELLO"`, `"hello"` and `"Hello"` are all the same key.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitive;

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
	s.chars().flat_map(char::to_lowercase)
}

impl<T> Comparer<T> for CaseInsensitive
where
	T: AsRef<str> + ?Sized,
{
	fn equals(&self, a: &T, b: &T) -> bool {
		fold(a.as_ref()).eq(fold(b.as_ref()))
	}

	fn hash_of(&self, value: &T) -> u64 {
		let mut hasher = FxHasher::default();
		for c in fold(value.as_ref()) {
			hasher.write_u32(c as u32);
		}
		hasher.finish()
	}
}

/// Compares values by a projected key.
///
/// ```
/// use rime::{ByKey, FrozenSet};
///
/// #[derive(Clone)]
/// struct Route {
/// 	id: u32,
/// 	target: &'static str,
/// }
///
/// let routes = FrozenSet::with_comparer(ByKey::new(|r: &Route| r.id));
/// assert!(routes.insert(Route { id: 1, target: "a" }));
/// assert!(!routes.insert(Route { id: 1, target: "b" }));
/// # let _ = routes.len();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F, S = FxBuildHasher> {
	project: F,
	build: S,
}

impl<F> ByKey<F> {
	pub fn new(project: F) -> Self {
		Self {
			project,
			build: FxBuildHasher,
		}
	}
}

impl<F, S> ByKey<F, S> {
	pub fn with_hasher(project: F, build: S) -> Self {
		Self { project, build }
	}
}

impl<T, R, F, S> Comparer<T> for ByKey<F, S>
where
	T: ?Sized,
	R: Hash + Eq,
	F: Fn(&T) -> R + Send + Sync,
	S: BuildHasher + Send + Sync,
{
	fn equals(&self, a: &T, b: &T) -> bool {
		(self.project)(a) == (self.project)(b)
	}

	fn hash_of(&self, value: &T) -> u64 {
		self.build.hash_one((self.project)(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_comparer_agrees_with_borrowed_forms() {
		let cmp = DefaultComparer::<FxBuildHasher>::default();
		let owned = String::from("route");
		assert_eq!(
			Comparer::<String>::hash_of(&cmp, &owned),
			Comparer::<str>::hash_of(&cmp, "route")
		);
		assert!(Comparer::<str>::equals(&cmp, "a", "a"));
		assert!(!Comparer::<str>::equals(&cmp, "a", "A"));
	}

	#[test]
	fn case_insensitive_equal_values_hash_equal() {
		let cmp = CaseInsensitive;
		assert!(Comparer::<str>::equals(&cmp, "HELLO", "hello"));
		assert_eq!(
			Comparer::<str>::hash_of(&cmp, "HeLLo"),
			Comparer::<String>::hash_of(&cmp, &"hello".to_owned())
		);
		assert!(!Comparer::<str>::equals(&cmp, "hello", "hell"));
		assert!(!Comparer::<str>::equals(&cmp, "hello", "helloo"));
	}

	#[test]
	fn case_insensitive_folds_non_ascii() {
		let cmp = CaseInsensitive;
		assert!(Comparer::<str>::equals(&cmp, "ÀÉÎ", "àéî"));
		assert_eq!(
			Comparer::<str>::hash_of(&cmp, "ÀÉÎ"),
			Comparer::<str>::hash_of(&cmp, "àéî")
		);
	}

	#[test]
	fn by_key_projects_before_comparing() {
		let cmp = ByKey::new(|pair: &(u32, &'static str)| pair.0);
		let a: (u32, &'static str) = (1, "a");
		let b: (u32, &'static str) = (1, "b");
		let c: (u32, &'static str) = (2, "a");
		assert!(cmp.equals(&a, &b));
		assert!(!cmp.equals(&a, &c));
		assert_eq!(cmp.hash_of(&a), cmp.hash_of(&b));
	}
}
