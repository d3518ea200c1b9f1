//! Read-optimized copy-on-write hash maps and sets.
//!
//! [`FrozenMap`] and [`FrozenSet`] keep two representations of their
//! contents: a mutable store that writers edit under a mutex, and an
//! immutable snapshot that readers consult without taking any lock. Every
//! write that changes the store rebuilds the snapshot and publishes it with
//! one atomic swap, so a reader always sees the complete state before or
//! after a write, never something in between.
//!
//! This trades write cost (linear in the container size) for reads that are
//! as cheap as a plain hash lookup. It suits data that is read constantly and
//! changed rarely: routing tables, registries, configuration.
//!
//! # Layout
//!
//! - [`comparer`] - equality and hashing policies fixed at construction
//! - [`FrozenMap`], [`MapSnapshot`], [`ValueRef`] - the map and its pinned views
//! - [`FrozenSet`], [`SetSnapshot`] - the set and its pinned view
//! - [`erased`] - `dyn Any` access for loosely typed callers
//!
//! Enable the `serde` feature for `Serialize`/`Deserialize` impls.

mod cell;
pub mod comparer;
pub mod erased;
mod error;
mod ext;
mod map;
#[cfg(feature = "serde")]
mod serde_impls;
mod set;
mod snapshot;
mod store;

#[cfg(test)]
mod invariants;

pub use comparer::{ByKey, CaseInsensitive, Comparer, DefaultComparer};
pub use erased::{ErasedMap, ErasedSet};
pub use error::{Error, Result};
pub use map::{FrozenMap, Iter, Keys, MapSnapshot, SnapshotIter, ValueRef, Values};
pub use set::{FrozenSet, SetIter, SetSnapshot, SetSnapshotIter};
