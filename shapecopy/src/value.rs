//! Untyped values, as stored in mappings whose entries have no declared shape.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::describe::{Describe, Peek, Poke, Shaped};
use crate::shape::{Def, Shape, zero_of};

/// The untyped mapping: string keys to [`Value`]s, iterated in key order.
pub type Map = BTreeMap<String, Value>;

/// A value whose shape is decided at runtime.
///
/// Scalars keep their exact representation (`I32(804)` and `Int(804)` are
/// different values). Anything else the engine inserts into an untyped
/// mapping, such as a record or a reference to one, is kept as `Typed`.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// The default signed-integer width.
    Int(isize),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    NaiveTimestamp(NaiveDateTime),
    Map(Map),
    List(Vec<Value>),
    Typed(Box<dyn Describe>),
}

impl Value {
    /// The held value, or `None` for `Null`.
    pub fn target(&self) -> Option<&dyn Describe> {
        let held: &dyn Describe = match self {
            Value::Null => return None,
            Value::Bool(v) => v,
            Value::Int(v) => v,
            Value::I8(v) => v,
            Value::I16(v) => v,
            Value::I32(v) => v,
            Value::I64(v) => v,
            Value::F32(v) => v,
            Value::F64(v) => v,
            Value::String(v) => v,
            Value::Timestamp(v) => v,
            Value::NaiveTimestamp(v) => v,
            Value::Map(v) => v,
            Value::List(v) => v,
            Value::Typed(v) => &**v,
        };
        Some(held)
    }

    /// Whether this is `Value::Null`. A `Typed` absent reference is not null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the held value as a `T`, whatever variant holds it.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.target()?.as_any().downcast_ref::<T>()
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Wrap any describable value, keeping its representation.
    pub fn typed<T: Describe>(value: T) -> Self {
        value.to_value()
    }
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    )*};
}

from_scalar! {
    bool => Bool,
    isize => Int,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    DateTime<Utc> => Timestamp,
    NaiveDateTime => NaiveTimestamp,
    Map => Map,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Value {
    fn from(entries: [(&str, Value); N]) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        )
    }
}

impl Shaped for Value {
    const SHAPE: &'static Shape = &Shape {
        type_identifier: "Value",
        def: Def::Dynamic,
        zero: zero_of::<Value>,
    };

    fn from_describe(value: &dyn Describe) -> Option<Self> {
        Some(value.to_value())
    }
}

impl Describe for Value {
    crate::__describe_common!();

    fn is_zero(&self) -> bool {
        self.target().is_none_or(|held| held.is_zero())
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Dynamic(self)
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Dynamic(self)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}
