//! Value Vocabulary
//!
//! This module defines the dynamic value type that flows through the
//! reactive system, along with the property keys used to address slots
//! inside tracked containers.
//!
//! # Strict Equality
//!
//! Writes notify dependents only when the new value differs from the old
//! one under *strict* comparison:
//!
//! - Primitives compare by value. Strings compare by content.
//! - Floats follow IEEE semantics, so a NaN is never equal to anything,
//!   including itself. Writing NaN over NaN therefore notifies.
//! - `Int` and `Float` are distinct variants and never compare equal.
//! - Objects compare by storage identity, not by structure. Two maps with
//!   identical contents are different values; the same shared container
//!   reached through two handles is the same value.
//!
//! `PartialEq` on [`Value`] implements exactly this comparison, so the
//! write paths can use `!=` directly.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::store::Reactive;

/// A property key inside a tracked container.
///
/// Maps are addressed by name, lists by position. The registry hashes
/// keys, so the same key value always lands in the same dependent set.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named property of a map.
    Name(Arc<str>),
    /// A positional slot of a list.
    Index(usize),
}

impl Key {
    /// The fixed key under which a [`Ref`](super::Ref) tracks its slot.
    pub fn value() -> Self {
        Key::Name(Arc::from("value"))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(Arc::from(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Arc::from(name.as_str()))
    }
}

impl From<Arc<str>> for Key {
    fn from(name: Arc<str>) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(index) => write!(f, "{}", index),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{:?}", name),
            Key::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A dynamic value held in a tracked slot.
///
/// Primitives are plain data. Containers are shared handles: storing an
/// [`Object`](Value::Object) value copies the handle, never the contents,
/// which is what makes nested reactivity and identity comparison work.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value. Reads of missing keys produce `Null`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// A tracked map or list, by shared handle.
    Object(Reactive),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the contained object handle, if this value is one.
    pub fn as_object(&self) -> Option<&Reactive> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE comparison: NaN != NaN on purpose.
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.same_storage(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s.as_str()))
    }
}

impl From<Reactive> for Value {
    fn from(object: Reactive) -> Self {
        Value::Object(object)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Object(object) => object.serialize(serializer),
        }
    }
}
