//! Loosely typed access for callers that only hold `dyn Any` keys and
//! values, such as plugin hosts or scripting bridges.
//!
//! Nothing in the typed API depends on this module. Arguments are
//! type-checked at runtime; a missing key or a value of the wrong type is an
//! [`Error::InvalidArgument`] rather than a panic.

use std::any::Any;

use crate::comparer::Comparer;
use crate::error::{Error, Result};
use crate::map::FrozenMap;
use crate::set::FrozenSet;

const MISSING_KEY: Error = Error::InvalidArgument {
	reason: "key is missing",
};
const KEY_TYPE: Error = Error::InvalidArgument {
	reason: "key has the wrong type",
};
const VALUE_TYPE: Error = Error::InvalidArgument {
	reason: "value has the wrong type",
};

fn key_ref<K: 'static>(key: Option<&dyn Any>) -> Result<&K> {
	key.ok_or(MISSING_KEY)?.downcast_ref::<K>().ok_or(KEY_TYPE)
}

fn key_owned<K: 'static>(key: Option<Box<dyn Any>>) -> Result<K> {
	key.ok_or(MISSING_KEY)?
		.downcast::<K>()
		.map(|k| *k)
		.map_err(|_| KEY_TYPE)
}

fn value_owned<V: 'static>(value: Box<dyn Any>) -> Result<V> {
	value.downcast::<V>().map(|v| *v).map_err(|_| VALUE_TYPE)
}

/// Object-safe, dynamically typed view of a [`FrozenMap`].
pub trait ErasedMap: Send + Sync {
	fn len_any(&self) -> usize;

	fn contains_key_any(&self, key: Option<&dyn Any>) -> Result<bool>;

	/// Clones the value for `key` out of the current snapshot.
	fn get_any(&self, key: Option<&dyn Any>) -> Result<Option<Box<dyn Any>>>;

	/// Duplicate-rejecting insert.
	fn insert_any(&self, key: Option<Box<dyn Any>>, value: Box<dyn Any>) -> Result<()>;

	/// Upsert; returns the replaced value.
	fn set_any(
		&self,
		key: Option<Box<dyn Any>>,
		value: Box<dyn Any>,
	) -> Result<Option<Box<dyn Any>>>;

	fn remove_any(&self, key: Option<&dyn Any>) -> Result<Option<Box<dyn Any>>>;

	fn clear_any(&self);
}

impl<K, V, C> ErasedMap for FrozenMap<K, V, C>
where
	K: Clone + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
	C: Comparer<K> + 'static,
{
	fn len_any(&self) -> usize {
		self.len()
	}

	fn contains_key_any(&self, key: Option<&dyn Any>) -> Result<bool> {
		Ok(self.contains_key(key_ref::<K>(key)?))
	}

	fn get_any(&self, key: Option<&dyn Any>) -> Result<Option<Box<dyn Any>>> {
		let key = key_ref::<K>(key)?;
		Ok(self.get_cloned(key).map(|v| Box::new(v) as Box<dyn Any>))
	}

	fn insert_any(&self, key: Option<Box<dyn Any>>, value: Box<dyn Any>) -> Result<()> {
		let key = key_owned::<K>(key)?;
		let value = value_owned::<V>(value)?;
		self.insert(key, value)
	}

	fn set_any(
		&self,
		key: Option<Box<dyn Any>>,
		value: Box<dyn Any>,
	) -> Result<Option<Box<dyn Any>>> {
		let key = key_owned::<K>(key)?;
		let value = value_owned::<V>(value)?;
		Ok(self.set(key, value).map(|v| Box::new(v) as Box<dyn Any>))
	}

	fn remove_any(&self, key: Option<&dyn Any>) -> Result<Option<Box<dyn Any>>> {
		let key = key_ref::<K>(key)?;
		Ok(self.remove(key).map(|v| Box::new(v) as Box<dyn Any>))
	}

	fn clear_any(&self) {
		self.clear();
	}
}

/// Object-safe, dynamically typed view of a [`FrozenSet`].
pub trait ErasedSet: Send + Sync {
	fn len_any(&self) -> usize;

	fn contains_any(&self, value: &dyn Any) -> Result<bool>;

	fn insert_any(&self, value: Box<dyn Any>) -> Result<bool>;

	fn remove_any(&self, value: &dyn Any) -> Result<bool>;

	fn clear_any(&self);
}

impl<T, C> ErasedSet for FrozenSet<T, C>
where
	T: Clone + Send + Sync + 'static,
	C: Comparer<T> + 'static,
{
	fn len_any(&self) -> usize {
		self.len()
	}

	fn contains_any(&self, value: &dyn Any) -> Result<bool> {
		let value = value.downcast_ref::<T>().ok_or(VALUE_TYPE)?;
		Ok(self.contains(value))
	}

	fn insert_any(&self, value: Box<dyn Any>) -> Result<bool> {
		Ok(self.insert(value_owned::<T>(value)?))
	}

	fn remove_any(&self, value: &dyn Any) -> Result<bool> {
		let value = value.downcast_ref::<T>().ok_or(VALUE_TYPE)?;
		Ok(self.remove(value))
	}

	fn clear_any(&self) {
		self.clear();
	}
}
