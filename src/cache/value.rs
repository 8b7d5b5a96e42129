//! Cache Value Module
//!
//! Defines the values a driver stores and the lazy defaults used on a miss.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::cache::coerce;

// == Value ==
/// A single stored value.
///
/// Integers of every width collapse into `Int`, which is also the only
/// variant counter operations accept.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    /// Canonical integer cell
    Int(i64),
    Float(f64),
    Str(String),
    Json(serde_json::Value),
    /// Any Rust object; compared by pointer
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps an arbitrary object.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Returns the wrapped object if this is an `Opaque` holding a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns the integer if this is a counter cell.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> bool {
        coerce::to_bool(self)
    }

    pub fn to_isize(&self) -> isize {
        coerce::to_isize(self)
    }

    pub fn to_i64(&self) -> i64 {
        coerce::to_i64(self)
    }

    /// Best-effort string form; named apart from `ToString::to_string`.
    pub fn to_string_lossy(&self) -> String {
        coerce::to_string(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Json(j) => f.debug_tuple("Json").field(j).finish(),
            Value::Opaque(inner) => write!(f, "Opaque({:p})", Arc::as_ptr(inner)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// == Conversions ==
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(j: serde_json::Value) -> Self {
        Value::Json(j)
    }
}

// == Fallback ==
/// Default returned by `get_or`/`pull_or` when the key is missing.
///
/// A `Lazy` fallback runs only on a miss.
pub enum Fallback<'a> {
    Value(Value),
    Lazy(Box<dyn FnOnce() -> Value + 'a>),
}

impl<'a> Fallback<'a> {
    pub fn lazy<F>(producer: F) -> Self
    where
        F: FnOnce() -> Value + 'a,
    {
        Fallback::Lazy(Box::new(producer))
    }

    /// Produces the default value, running the producer if there is one.
    pub fn resolve(self) -> Value {
        match self {
            Fallback::Value(v) => v,
            Fallback::Lazy(producer) => producer(),
        }
    }
}

impl<T: Into<Value>> From<T> for Fallback<'_> {
    fn from(value: T) -> Self {
        Fallback::Value(value.into())
    }
}
