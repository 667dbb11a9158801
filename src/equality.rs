//! One-level equality used to decide when derived-state callbacks re-run.

use std::collections::BTreeMap;

use portable_atomic_util::Arc;

/// How list values are treated by [`shallow_equal_with`].
///
/// `Legacy` keeps the long-standing behaviour where every non-record object
/// (lists and null included) compares equal to any other object once the kinds
/// match. `ElementWise` compares lists element by element instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EqualityMode {
    #[default]
    Legacy,
    ElementWise,
}

/// Runtime kind of a [`Value`], the granularity at which mismatches are rejected
/// before any structural comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Object,
    Boolean,
    Number,
    String,
}

/// A dynamically shaped value.
///
/// Lists and records are shared handles: cloning a `Value::Record` shares the
/// underlying map, and nested lists/records compare by handle identity.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Arc<Vec<Value>>),
    Record(Arc<BTreeMap<String, Value>>),
}

impl Value {
    /// Build a record from key/value pairs.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(Arc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a list from values.
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null | Value::List(_) | Value::Record(_) => Kind::Object,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
        }
    }

    /// Strict identity: primitives by value (`NaN` is never identical to
    /// itself), lists and records by handle.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Change detection at a single level of depth.
///
/// Implemented for primitives and strings (by value), [`Value`], `Option`,
/// shared [`Arc`] handles (by identity) and tuples of up to six elements
/// (component by component). Props structs implement it by comparing each
/// field with that field's own rule:
///
/// ```rust
/// use oxide_viewmodel::{shallow_equal, EqualityMode, ShallowEq, Value};
///
/// #[derive(Clone)]
/// struct FilterProps {
///     query: String,
///     options: Value,
/// }
///
/// impl ShallowEq for FilterProps {
///     fn shallow_eq_in(&self, other: &Self, mode: EqualityMode) -> bool {
///         self.query.shallow_eq_in(&other.query, mode) && self.options.shallow_eq_in(&other.options, mode)
///     }
/// }
///
/// let options = Value::record([("limit", Value::from(10))]);
/// let a = FilterProps { query: "rust".into(), options: options.clone() };
/// let b = FilterProps { query: "rust".into(), options };
/// assert!(shallow_equal(&a, &b));
/// ```
pub trait ShallowEq {
    fn shallow_eq_in(&self, other: &Self, mode: EqualityMode) -> bool;

    fn shallow_eq(&self, other: &Self) -> bool {
        self.shallow_eq_in(other, EqualityMode::Legacy)
    }
}

/// Compare two values with the default [`EqualityMode::Legacy`] rules.
pub fn shallow_equal<P: ShallowEq + ?Sized>(prev: &P, next: &P) -> bool {
    prev.shallow_eq(next)
}

/// Compare two values with an explicit [`EqualityMode`].
pub fn shallow_equal_with<P: ShallowEq + ?Sized>(prev: &P, next: &P, mode: EqualityMode) -> bool {
    prev.shallow_eq_in(next, mode)
}

fn records_equal(prev: &BTreeMap<String, Value>, next: &BTreeMap<String, Value>) -> bool {
    if prev.len() != next.len() {
        return false;
    }
    prev.iter().all(|(key, value)| match next.get(key) {
        Some(other) => value.identical(other),
        None => false,
    })
}

impl ShallowEq for Value {
    fn shallow_eq_in(&self, other: &Self, mode: EqualityMode) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        if self.kind() != Kind::Object {
            return self.identical(other);
        }

        match (self, other, mode) {
            (Value::Record(prev), Value::Record(next), _) => records_equal(prev, next),
            // A record never matches a list or null, whichever mode is active.
            (Value::Record(_), _, _) => false,
            (_, _, EqualityMode::Legacy) => true,
            (Value::List(prev), Value::List(next), EqualityMode::ElementWise) => {
                prev.len() == next.len() && prev.iter().zip(next.iter()).all(|(a, b)| a.identical(b))
            }
            (Value::Null, Value::Null, EqualityMode::ElementWise) => true,
            (_, _, EqualityMode::ElementWise) => false,
        }
    }
}

macro_rules! impl_shallow_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShallowEq for $ty {
                fn shallow_eq_in(&self, other: &Self, _mode: EqualityMode) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_shallow_eq_by_value!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    str, String,
);

impl<T: ShallowEq> ShallowEq for Option<T> {
    fn shallow_eq_in(&self, other: &Self, mode: EqualityMode) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.shallow_eq_in(b, mode),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! impl_shallow_eq_for_tuple {
    ($(($($name:ident . $index:tt),+)),* $(,)?) => {
        $(
            impl<$($name: ShallowEq),+> ShallowEq for ($($name,)+) {
                fn shallow_eq_in(&self, other: &Self, mode: EqualityMode) -> bool {
                    $(self.$index.shallow_eq_in(&other.$index, mode))&&+
                }
            }
        )*
    };
}

impl_shallow_eq_for_tuple!(
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
    (A.0, B.1, C.2, D.3, E.4),
    (A.0, B.1, C.2, D.3, E.4, F.5),
);

/// Shared handles compare by identity, never by content.
impl<T> ShallowEq for Arc<T> {
    fn shallow_eq_in(&self, other: &Self, _mode: EqualityMode) -> bool {
        Arc::ptr_eq(self, other)
    }
}
