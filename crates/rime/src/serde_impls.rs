//! `serde` support, enabled by the `serde` feature.
//!
//! Containers and snapshots serialize from a single snapshot, so the output
//! is always self-consistent. Deserializing populates a fresh store and
//! freezes it once.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::comparer::Comparer;
use crate::map::{FrozenMap, MapSnapshot};
use crate::set::{FrozenSet, SetSnapshot};
use crate::store::{Inline, Store};

impl<K: Serialize, V: Serialize, C> Serialize for MapSnapshot<K, V, C> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.iter())
	}
}

impl<K, V, C> Serialize for FrozenMap<K, V, C>
where
	K: Clone + Serialize,
	V: Clone + Serialize,
	C: Comparer<K>,
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.snapshot().serialize(serializer)
	}
}

impl<T: Serialize, C> Serialize for SetSnapshot<T, C> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.iter())
	}
}

impl<T, C> Serialize for FrozenSet<T, C>
where
	T: Clone + Serialize,
	C: Comparer<T>,
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.snapshot().serialize(serializer)
	}
}

struct MapVisitor<K, V, C>(PhantomData<fn() -> (K, V, C)>);

impl<'de, K, V, C> Visitor<'de> for MapVisitor<K, V, C>
where
	K: Clone + Deserialize<'de>,
	V: Clone + Deserialize<'de>,
	C: Comparer<K> + Default,
{
	type Value = FrozenMap<K, V, C>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a map")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let capacity = access.size_hint().unwrap_or(0);
		let mut store = Store::with_capacity(capacity, Arc::new(C::default()));
		while let Some((key, value)) = access.next_entry::<K, V>()? {
			if store.insert_unique((key, value)).is_err() {
				return Err(de::Error::custom("duplicate map key"));
			}
		}
		Ok(FrozenMap::from_store(store))
	}
}

impl<'de, K, V, C> Deserialize<'de> for FrozenMap<K, V, C>
where
	K: Clone + Deserialize<'de>,
	V: Clone + Deserialize<'de>,
	C: Comparer<K> + Default,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(MapVisitor(PhantomData))
	}
}

struct SetVisitor<T, C>(PhantomData<fn() -> (T, C)>);

impl<'de, T, C> Visitor<'de> for SetVisitor<T, C>
where
	T: Clone + Deserialize<'de>,
	C: Comparer<T> + Default,
{
	type Value = FrozenSet<T, C>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a sequence")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let capacity = access.size_hint().unwrap_or(0);
		let mut store = Store::with_capacity(capacity, Arc::new(C::default()));
		while let Some(value) = access.next_element::<T>()? {
			let _ = store.insert_unique(Inline(value));
		}
		Ok(FrozenSet::from_store(store))
	}
}

impl<'de, T, C> Deserialize<'de> for FrozenSet<T, C>
where
	T: Clone + Deserialize<'de>,
	C: Comparer<T> + Default,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_seq(SetVisitor(PhantomData))
	}
}
