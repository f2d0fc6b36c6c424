//! Tracked Containers
//!
//! A [`Reactive`] wraps a map or list so that every property read is an
//! observation point and every property write is a notification point.
//! The wrapper owns the underlying storage and is the only accessor path
//! to it, which is what stands in for dynamic get/set/delete traps: no
//! code can reach a slot without going through the intercepting methods.
//!
//! # How Reads and Writes Work
//!
//! 1. [`get`](Reactive::get) records the active computation (if any) as
//!    depending on this object's (identity, key) pair, then returns the
//!    slot value. Object-valued slots come back as a fresh handle over
//!    the shared child storage; handles are created per access and never
//!    cached.
//!
//! 2. [`set`](Reactive::set) compares the new value to the current one
//!    under strict equality, performs the assignment either way, and
//!    notifies recorded dependents only when the comparison reported a
//!    change.
//!
//! 3. [`remove`](Reactive::remove) notifies only when the key existed
//!    and the deletion succeeded.
//!
//! # Identity
//!
//! Handles are cheap clones over shared storage. Cloning a handle never
//! copies data, and all handles to one storage share one [`ObjectId`],
//! so dependents recorded through one handle are triggered by writes
//! through another. The registry holds only the ID; dropping the last
//! handle purges the object's registry entries.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::ser::{Serialize, Serializer};
use tracing::trace;

use crate::error::Error;

use super::registry::{self, ObjectId};
use super::value::{Key, Value};

/// The shape of a tracked container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Map,
    List,
}

/// Slot storage for one tracked object.
enum Slots {
    Map(IndexMap<Key, Value>),
    List(Vec<Value>),
}

impl Slots {
    fn kind(&self) -> ObjectKind {
        match self {
            Slots::Map(_) => ObjectKind::Map,
            Slots::List(_) => ObjectKind::List,
        }
    }

    fn len(&self) -> usize {
        match self {
            Slots::Map(entries) => entries.len(),
            Slots::List(items) => items.len(),
        }
    }

    fn get(&self, key: &Key) -> Value {
        match (self, key) {
            (Slots::Map(entries), key) => entries.get(key).cloned().unwrap_or(Value::Null),
            (Slots::List(items), Key::Index(index)) => {
                items.get(*index).cloned().unwrap_or(Value::Null)
            }
            // Lists have no named slots.
            (Slots::List(_), Key::Name(_)) => Value::Null,
        }
    }

    /// Assign `value` to `key`. Returns whether the stored value changed
    /// under strict comparison (absent slots compare as `Null`).
    fn set(&mut self, key: Key, value: Value) -> bool {
        match (self, key) {
            (Slots::Map(entries), key) => {
                let old = entries.get(&key).cloned().unwrap_or(Value::Null);
                let changed = old != value;
                entries.insert(key, value);
                changed
            }
            (Slots::List(items), Key::Index(index)) => {
                if index >= items.len() {
                    // Writing past the end pads the gap, like assigning
                    // beyond an array's length.
                    items.resize_with(index + 1, || Value::Null);
                }
                let changed = items[index] != value;
                items[index] = value;
                changed
            }
            (Slots::List(_), Key::Name(name)) => {
                trace!(key = %name, "ignoring named write to a list");
                false
            }
        }
    }

    /// Delete `key`. Returns whether a present slot was removed.
    fn remove(&mut self, key: &Key) -> bool {
        match (self, key) {
            (Slots::Map(entries), key) => entries.shift_remove(key).is_some(),
            (Slots::List(items), Key::Index(index)) => match items.get_mut(*index) {
                // Deleting a list slot nulls it in place; the length is
                // untouched and an already-null slot counts as absent.
                Some(slot) if !slot.is_null() => {
                    *slot = Value::Null;
                    true
                }
                _ => false,
            },
            (Slots::List(_), Key::Name(_)) => false,
        }
    }

    fn keys(&self) -> Vec<Key> {
        match self {
            Slots::Map(entries) => entries.keys().cloned().collect(),
            Slots::List(items) => (0..items.len()).map(Key::Index).collect(),
        }
    }
}

struct ObjectData {
    id: ObjectId,
    slots: RwLock<Slots>,
}

impl Drop for ObjectData {
    fn drop(&mut self) {
        registry::purge(self.id);
    }
}

/// A tracked map or list.
///
/// # Example
///
/// ```rust,ignore
/// let state = Reactive::new_map();
/// state.set("count", 1);
///
/// run_effect({
///     let state = state.clone();
///     move || println!("count: {:?}", state.get("count"))
/// });
///
/// state.set("count", 2); // re-runs the effect
/// ```
pub struct Reactive {
    data: Arc<ObjectData>,
}

impl Reactive {
    fn from_slots(slots: Slots) -> Self {
        Self {
            data: Arc::new(ObjectData {
                id: ObjectId::new(),
                slots: RwLock::new(slots),
            }),
        }
    }

    /// Create an empty tracked map.
    pub fn new_map() -> Self {
        Self::from_slots(Slots::Map(IndexMap::new()))
    }

    /// Create an empty tracked list.
    pub fn new_list() -> Self {
        Self::from_slots(Slots::List(Vec::new()))
    }

    /// Create a tracked map from key/value pairs.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_slots(Slots::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Create a tracked list from values.
    pub fn from_values<V, I>(values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::from_slots(Slots::List(values.into_iter().map(Into::into).collect()))
    }

    /// Get this object's registry identity.
    pub fn id(&self) -> ObjectId {
        self.data.id
    }

    /// Whether two handles share the same underlying storage.
    pub fn same_storage(&self, other: &Reactive) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn kind(&self) -> ObjectKind {
        self.data.slots.read().kind()
    }

    pub fn is_list(&self) -> bool {
        self.kind() == ObjectKind::List
    }

    /// Read a slot, recording the active computation as a dependent.
    ///
    /// Missing keys read as [`Value::Null`]. Object-valued slots come
    /// back as a fresh handle over the shared child storage.
    pub fn get<K>(&self, key: K) -> Value
    where
        K: Into<Key>,
    {
        let key = key.into();
        registry::track(self.id(), &key);
        self.data.slots.read().get(&key)
    }

    /// Write a slot, notifying dependents when the value changed.
    ///
    /// The assignment is always performed; notification is skipped when
    /// the new value is strictly equal to the current one. Writing past
    /// the end of a list pads the gap with nulls.
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<Key>,
        V: Into<Value>,
    {
        let key = key.into();
        let changed = self.data.slots.write().set(key.clone(), value.into());
        if changed {
            registry::trigger(self.id(), &key);
        }
    }

    /// Delete a slot. Returns whether the key was present.
    ///
    /// Dependents are notified only when a present slot was removed.
    /// Map removal preserves the order of remaining entries; list
    /// removal nulls the slot without shifting later elements.
    pub fn remove<K>(&self, key: K) -> bool
    where
        K: Into<Key>,
    {
        let key = key.into();
        let removed = self.data.slots.write().remove(&key);
        if removed {
            registry::trigger(self.id(), &key);
        }
        removed
    }

    /// Snapshot of the current keys, in slot order. Untracked.
    pub fn keys(&self) -> Vec<Key> {
        self.data.slots.read().keys()
    }

    /// Number of slots. Untracked.
    pub fn len(&self) -> usize {
        self.data.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a JSON document into a tracked object.
    ///
    /// The document's top level must be an object or an array.
    pub fn from_json(text: &str) -> Result<Reactive, Error> {
        let parsed: serde_json::Value = serde_json::from_str(text)?;
        let found = json_type_name(&parsed);
        match wrap(parsed) {
            Value::Object(object) => Ok(object),
            _ => Err(Error::NotAnObject { found }),
        }
    }

    /// Serialize the current contents as JSON. Untracked snapshot.
    ///
    /// Cyclic object graphs are not detected and will recurse; keeping
    /// the graph acyclic is the caller's obligation, as it is for
    /// cyclic triggers.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Clone for Reactive {
    /// A fresh handle over the same storage and identity.
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Reactive {
    fn eq(&self, other: &Self) -> bool {
        self.same_storage(other)
    }
}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}

impl Serialize for Reactive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let slots = self.data.slots.read();
        match &*slots {
            Slots::Map(entries) => {
                serializer.collect_map(entries.iter().map(|(k, v)| (k.to_string(), v)))
            }
            Slots::List(items) => serializer.collect_seq(items.iter()),
        }
    }
}

/// Convert a plain JSON value into its tracked form.
///
/// Non-object values pass through unchanged as [`Value`] primitives.
/// Objects and arrays convert, recursively, into shared tracked storage;
/// reading them later hands out wrapper handles lazily, one per access.
pub fn wrap(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::from(s),
        serde_json::Value::Array(items) => {
            Value::Object(Reactive::from_values(items.into_iter().map(wrap)))
        }
        serde_json::Value::Object(entries) => Value::Object(Reactive::from_entries(
            entries.into_iter().map(|(k, v)| (Key::from(k), wrap(v))),
        )),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
