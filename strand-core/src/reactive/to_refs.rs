//! Per-Property Refs
//!
//! [`to_refs`] converts each current key of a tracked container into an
//! independent ref-shaped accessor that forwards reads and writes back
//! to the container. A [`PropRef`] holds a live `(handle, key)` pair,
//! not a snapshot of a value, which is why fields taken out of a
//! container this way stay reactive: reading one goes through the
//! container's own tracking intercept, and writing one goes through its
//! notification intercept.

use std::fmt;

use indexmap::IndexMap;

use super::reference::RefOps;
use super::store::Reactive;
use super::value::{Key, Value};

/// A ref-shaped accessor for one property of a tracked container.
pub struct PropRef {
    target: Reactive,
    key: Key,
}

impl PropRef {
    /// Bind an accessor to `key` on `target`.
    pub fn new<K>(target: Reactive, key: K) -> Self
    where
        K: Into<Key>,
    {
        Self {
            target,
            key: key.into(),
        }
    }

    /// The key this accessor is bound to.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Read the property through the container's tracking intercept.
    pub fn get(&self) -> Value {
        self.target.get(self.key.clone())
    }

    /// Write the property through the container's notification intercept.
    pub fn set<V>(&self, value: V)
    where
        V: Into<Value>,
    {
        self.target.set(self.key.clone(), value.into());
    }
}

impl RefOps for PropRef {
    fn get(&self) -> Value {
        PropRef::get(self)
    }

    fn set(&self, value: Value) {
        PropRef::set(self, value)
    }
}

impl Clone for PropRef {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            key: self.key.clone(),
        }
    }
}

impl fmt::Debug for PropRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropRef")
            .field("target", &self.target.id())
            .field("key", &self.key)
            .finish()
    }
}

/// Produce one [`PropRef`] per current key of `target`.
///
/// Map keys come out in slot order; lists produce index-keyed accessors
/// for `0..len`. The result reflects the keys present at the time of the
/// call — properties added later get no accessor.
pub fn to_refs(target: &Reactive) -> IndexMap<Key, PropRef> {
    target
        .keys()
        .into_iter()
        .map(|key| (key.clone(), PropRef::new(target.clone(), key)))
        .collect()
}
