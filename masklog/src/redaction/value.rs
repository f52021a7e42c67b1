//! Dynamically shaped values.
//!
//! [`Value`] is the open-ended element type for heterogeneous lists and maps,
//! e.g. a request body decoded without a schema. Strings inside it are masked
//! by whatever tag is active; numbers, booleans and `Nil` never are.

use std::{collections::BTreeMap, fmt, sync::Arc};

use super::{redact, Order, Redact, Tag, Walker};

/// A dynamically shaped value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Any statically typed value, rendered through its own [`Redact`] impl.
    Record(Arc<dyn Redact + Send + Sync>),
}

impl Value {
    /// Wraps a statically typed value.
    pub fn record<T>(value: T) -> Self
    where
        T: Redact + Send + Sync + 'static,
    {
        Value::Record(Arc::new(value))
    }
}

impl Redact for Value {
    fn walk(&self, walker: &mut Walker, tag: Option<Tag>) {
        match self {
            Value::Nil => walker.unit("nil"),
            Value::Bool(value) => walker.primitive(value),
            Value::Int(value) => walker.primitive(value),
            Value::Uint(value) => walker.primitive(value),
            Value::Float(value) => walker.primitive(value),
            Value::Str(value) => walker.text(value, tag),
            Value::List(items) => walker.sequence(items, tag),
            Value::Map(entries) => walker.map(entries, Order::Iteration, tag),
            Value::Record(record) => walker.pointer(&**record, tag),
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self, None))
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64);
impl_from!(Uint: u8, u16, u32, u64);
impl_from!(Float: f32, f64);
impl_from!(Str: String, &str);
impl_from!(List: Vec<Value>);
impl_from!(Map: BTreeMap<String, Value>);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
