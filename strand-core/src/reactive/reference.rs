//! Ref Implementation
//!
//! A [`Ref`] is a single-slot reactive container: the one-property
//! equivalent of a tracked map. Reads of the slot are observation
//! points, writes are notification points, and both go through the
//! public registry hooks — a `Ref` is exactly what a custom reactive
//! container built on [`track`](super::track)/[`trigger`](super::trigger)
//! looks like.
//!
//! Because values are typed here, "making a ref of a ref" is not
//! representable: a [`Ref`] is not a [`Value`], so the degenerate case
//! the duck-typed original fell into cannot be constructed. A ref whose
//! payload is an object simply holds the shared handle, and nested
//! reads through it track the child container as usual.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::registry::{self, ObjectId};
use super::value::{Key, Value};

/// Read/write access to a single reactive slot.
///
/// The common shape of [`Ref`] and [`PropRef`](super::PropRef): anything
/// with a tracked `value` slot. Generic consumers can accept
/// `impl RefOps` and work with either.
pub trait RefOps {
    /// Read the slot, recording the active computation as a dependent.
    fn get(&self) -> Value;

    /// Write the slot, notifying dependents when the value changed.
    fn set(&self, value: Value);
}

struct RefSlot {
    id: ObjectId,
    key: Key,
    value: RwLock<Value>,
}

impl Drop for RefSlot {
    fn drop(&mut self) {
        registry::purge(self.id);
    }
}

/// A single-slot reactive container.
///
/// # Example
///
/// ```rust,ignore
/// let r = Ref::new(5);
/// assert_eq!(r.get(), Value::from(5));
///
/// run_effect({
///     let r = r.clone();
///     move || println!("value: {:?}", r.get())
/// });
///
/// r.set(Value::from(6)); // re-runs the effect
/// ```
pub struct Ref {
    slot: Arc<RefSlot>,
}

impl Ref {
    /// Create a ref holding `initial`.
    pub fn new<V>(initial: V) -> Self
    where
        V: Into<Value>,
    {
        Self {
            slot: Arc::new(RefSlot {
                id: ObjectId::new(),
                key: Key::value(),
                value: RwLock::new(initial.into()),
            }),
        }
    }

    /// Get the ref's registry identity.
    pub fn id(&self) -> ObjectId {
        self.slot.id
    }

    /// Read the slot. See [`RefOps::get`].
    pub fn get(&self) -> Value {
        registry::track(self.slot.id, &self.slot.key);
        self.slot.value.read().clone()
    }

    /// Write the slot. See [`RefOps::set`].
    ///
    /// The comparison is strict: primitives by value, objects by
    /// storage identity.
    pub fn set<V>(&self, value: V)
    where
        V: Into<Value>,
    {
        let value = value.into();
        let changed = {
            let mut slot = self.slot.value.write();
            if *slot != value {
                *slot = value;
                true
            } else {
                false
            }
        };
        if changed {
            registry::trigger(self.slot.id, &self.slot.key);
        }
    }
}

impl RefOps for Ref {
    fn get(&self) -> Value {
        Ref::get(self)
    }

    fn set(&self, value: Value) {
        Ref::set(self, value)
    }
}

impl Clone for Ref {
    /// A fresh handle over the same slot and identity.
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("id", &self.id())
            .field("value", &*self.slot.value.read())
            .finish()
    }
}
