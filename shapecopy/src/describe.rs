//! The describable-value abstraction the copy engine works through.
//!
//! [`Describe`] is object safe, so the engine walks `&dyn Describe` trees
//! without knowing concrete types. Each value hands out a read view
//! ([`Peek`]) and a write view ([`Poke`]) matching its [`Def`]:
//!
//! | `Def`       | `Peek`                | `Poke`                  | std types                       |
//! |-------------|-----------------------|-------------------------|---------------------------------|
//! | `Scalar`    | `Scalar(Value)`       | `Scalar(dyn ScalarSlot)`| `bool`, ints, floats, `String`, chrono |
//! | `Record`    | `Record(dyn Record)`  | `Record(dyn Record)`    | types declared with `record!`   |
//! | `Mapping`   | `Mapping(dyn Mapping)`| `Mapping(dyn Mapping)`  | `HashMap`/`BTreeMap<String, V>` |
//! | `Sequence`  | `Sequence(..)`        | `Sequence(..)`          | `Vec<T>`                        |
//! | `Reference` | `Reference(Option<..>)`| `Reference(dyn Reference)` | `Option<T>`, `Box<T>`, `Arc<T>` |
//! | `Dynamic`   | `Dynamic(&Value)`     | `Dynamic(&mut Value)`   | [`Value`]                       |

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::errors::CopyErrorKind;
use crate::shape::{Def, ReferenceDef, ScalarKind, Shape, downcast_boxed, zero_of};
use crate::value::{Map, Value};

// ============================================================================
// Traits
// ============================================================================

/// A value the engine can read from and write into.
pub trait Describe: Any + fmt::Debug {
    /// Static shape of this value's type.
    fn shape(&self) -> &'static Shape;

    /// Whether this value is its shape's zero value. Zero source values are
    /// treated as absent and never copied.
    fn is_zero(&self) -> bool;

    /// Read view.
    fn peek(&self) -> Peek<'_>;

    /// Write view.
    fn poke(&mut self) -> Poke<'_>;

    /// Overwrite `self` with a clone of `source` if both have the same type.
    /// Returns `false` and leaves `self` alone otherwise.
    fn assign(&mut self, source: &dyn Describe) -> bool;

    fn clone_boxed(&self) -> Box<dyn Describe>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// This value as an untyped [`Value`], keeping its representation.
    fn to_value(&self) -> Value {
        Value::Typed(self.clone_boxed())
    }
}

/// Sized companion of [`Describe`] carrying the static shape.
pub trait Shaped: Describe + Clone {
    const SHAPE: &'static Shape;

    /// Take `value` as `Self` without converting it. A [`Value`] holding a
    /// `Self` is unwrapped.
    fn from_describe(value: &dyn Describe) -> Option<Self> {
        if let Some(same) = value.as_any().downcast_ref::<Self>() {
            return Some(same.clone());
        }
        let held = value.as_any().downcast_ref::<Value>()?.target()?;
        held.as_any().downcast_ref::<Self>().cloned()
    }
}

impl Clone for Box<dyn Describe> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

/// Read view of a describable value.
pub enum Peek<'a> {
    Scalar(Value),
    Record(&'a dyn Record),
    Mapping(&'a dyn Mapping),
    Sequence(&'a dyn Sequence),
    /// `None` when the reference has no target.
    Reference(Option<&'a dyn Describe>),
    Dynamic(&'a Value),
}

/// Write view of a describable value.
pub enum Poke<'a> {
    Scalar(&'a mut dyn ScalarSlot),
    Record(&'a mut dyn Record),
    Mapping(&'a mut dyn Mapping),
    Sequence(&'a mut dyn Sequence),
    Reference(&'a mut dyn Reference),
    Dynamic(&'a mut Value),
}

/// A scalar destination.
pub trait ScalarSlot {
    /// Store `value` if it has exactly this slot's representation; hand it
    /// back otherwise.
    fn store(&mut self, value: Value) -> Result<(), Value>;
}

/// Whether a record field may be written by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Classify a visibility token as written in source: only a bare `pub`
    /// is public.
    pub const fn from_keyword(keyword: &str) -> Self {
        let bytes = keyword.as_bytes();
        if bytes.len() == 3 && bytes[0] == b'p' && bytes[1] == b'u' && bytes[2] == b'b' {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// A declared record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub visibility: Visibility,
}

impl Field {
    pub const fn new(name: &'static str, visibility: &str) -> Self {
        Self {
            name,
            visibility: Visibility::from_keyword(visibility),
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A fixed set of named fields, in declaration order.
pub trait Record {
    fn fields(&self) -> &'static [Field];

    fn field(&self, name: &str) -> Option<&dyn Describe>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Describe>;
}

/// String-keyed entries.
pub trait Mapping {
    /// Entries in the mapping's own iteration order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &dyn Describe)> + '_>;

    fn get(&self, key: &str) -> Option<&dyn Describe>;

    /// Insert `value` under `key` without converting it.
    fn insert(&mut self, key: &str, value: &dyn Describe) -> Result<(), CopyErrorKind>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered list of elements.
pub trait Sequence {
    fn element_shape(&self) -> &'static Shape;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Describe>;

    /// Replace the whole sequence. Either every element is accepted or the
    /// sequence is left untouched.
    fn replace(&mut self, elements: Vec<Box<dyn Describe>>) -> Result<(), CopyErrorKind>;
}

/// The target of a reference, seen for writing.
pub enum Target<'a> {
    Present(&'a mut dyn Describe),
    Absent,
    /// The target exists but other owners can observe it.
    Shared,
}

/// An indirection that may need a freshly allocated target.
pub trait Reference {
    fn target_mut(&mut self) -> Target<'_>;

    /// Point at `target`, replacing whatever was referenced before.
    fn install(&mut self, target: Box<dyn Describe>) -> Result<(), CopyErrorKind>;
}

// ============================================================================
// Shared method bodies
// ============================================================================

/// The methods of [`Describe`] that are the same for every `Shaped` type.
#[doc(hidden)]
#[macro_export]
macro_rules! __describe_common {
    () => {
        fn shape(&self) -> &'static $crate::Shape {
            <Self as $crate::Shaped>::SHAPE
        }

        fn assign(&mut self, source: &dyn $crate::Describe) -> bool {
            match source.as_any().downcast_ref::<Self>() {
                ::core::option::Option::Some(value) => {
                    *self = ::core::clone::Clone::clone(value);
                    true
                }
                ::core::option::Option::None => false,
            }
        }

        fn clone_boxed(&self) -> ::std::boxed::Box<dyn $crate::Describe> {
            ::std::boxed::Box::new(::core::clone::Clone::clone(self))
        }

        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        fn into_any(
            self: ::std::boxed::Box<Self>,
        ) -> ::std::boxed::Box<dyn ::core::any::Any> {
            self
        }
    };
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Shaped for $ty {
            const SHAPE: &'static Shape = &Shape {
                type_identifier: ScalarKind::$kind.type_identifier(),
                def: Def::Scalar(ScalarKind::$kind),
                zero: zero_of::<$ty>,
            };
        }

        impl Describe for $ty {
            crate::__describe_common!();

            fn is_zero(&self) -> bool {
                *self == <$ty as Default>::default()
            }

            fn peek(&self) -> Peek<'_> {
                Peek::Scalar(Value::$kind(self.clone()))
            }

            fn poke(&mut self) -> Poke<'_> {
                Poke::Scalar(self)
            }

            fn to_value(&self) -> Value {
                Value::$kind(self.clone())
            }
        }

        impl ScalarSlot for $ty {
            fn store(&mut self, value: Value) -> Result<(), Value> {
                match value {
                    Value::$kind(v) => {
                        *self = v;
                        Ok(())
                    }
                    other => Err(other),
                }
            }
        }
    )*};
}

scalar! {
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
}

// ============================================================================
// References
// ============================================================================

fn wrap_option<T: Shaped>(target: Box<dyn Describe>) -> Result<Box<dyn Describe>, CopyErrorKind> {
    Ok(Box::new(Some(downcast_boxed::<T>(target)?)))
}

fn wrap_box<T: Shaped + Default>(
    target: Box<dyn Describe>,
) -> Result<Box<dyn Describe>, CopyErrorKind> {
    Ok(Box::new(Box::new(downcast_boxed::<T>(target)?)))
}

fn wrap_arc<T: Shaped + Default>(
    target: Box<dyn Describe>,
) -> Result<Box<dyn Describe>, CopyErrorKind> {
    Ok(Box::new(Arc::new(downcast_boxed::<T>(target)?)))
}

impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: &'static Shape = &Shape {
        type_identifier: "Option",
        def: Def::Reference(ReferenceDef {
            pointee: T::SHAPE,
            wrap: wrap_option::<T>,
        }),
        zero: zero_of::<Self>,
    };
}

impl<T: Shaped> Describe for Option<T> {
    crate::__describe_common!();

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Reference(self.as_ref().map(|target| target as &dyn Describe))
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Reference(self)
    }
}

impl<T: Shaped> Reference for Option<T> {
    fn target_mut(&mut self) -> Target<'_> {
        match self {
            Some(target) => Target::Present(target),
            None => Target::Absent,
        }
    }

    fn install(&mut self, target: Box<dyn Describe>) -> Result<(), CopyErrorKind> {
        *self = Some(downcast_boxed::<T>(target)?);
        Ok(())
    }
}

impl<T: Shaped + Default> Shaped for Box<T> {
    const SHAPE: &'static Shape = &Shape {
        type_identifier: "Box",
        def: Def::Reference(ReferenceDef {
            pointee: T::SHAPE,
            wrap: wrap_box::<T>,
        }),
        zero: zero_of::<Self>,
    };
}

impl<T: Shaped + Default> Describe for Box<T> {
    crate::__describe_common!();

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Reference(Some(&**self as &dyn Describe))
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Reference(self)
    }
}

impl<T: Shaped + Default> Reference for Box<T> {
    fn target_mut(&mut self) -> Target<'_> {
        Target::Present(&mut **self)
    }

    fn install(&mut self, target: Box<dyn Describe>) -> Result<(), CopyErrorKind> {
        **self = downcast_boxed::<T>(target)?;
        Ok(())
    }
}

impl<T: Shaped + Default> Shaped for Arc<T> {
    const SHAPE: &'static Shape = &Shape {
        type_identifier: "Arc",
        def: Def::Reference(ReferenceDef {
            pointee: T::SHAPE,
            wrap: wrap_arc::<T>,
        }),
        zero: zero_of::<Self>,
    };
}

impl<T: Shaped + Default> Describe for Arc<T> {
    crate::__describe_common!();

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Reference(Some(&**self as &dyn Describe))
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Reference(self)
    }
}

impl<T: Shaped + Default> Reference for Arc<T> {
    fn target_mut(&mut self) -> Target<'_> {
        match Arc::get_mut(self) {
            Some(target) => Target::Present(target),
            None => Target::Shared,
        }
    }

    fn install(&mut self, target: Box<dyn Describe>) -> Result<(), CopyErrorKind> {
        *self = Arc::new(downcast_boxed::<T>(target)?);
        Ok(())
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Shaped> Shaped for Vec<T> {
    const SHAPE: &'static Shape = &Shape {
        type_identifier: "Vec",
        def: Def::Sequence { element: T::SHAPE },
        zero: zero_of::<Self>,
    };
}

impl<T: Shaped> Describe for Vec<T> {
    crate::__describe_common!();

    fn is_zero(&self) -> bool {
        Vec::is_empty(self)
    }

    fn peek(&self) -> Peek<'_> {
        Peek::Sequence(self)
    }

    fn poke(&mut self) -> Poke<'_> {
        Poke::Sequence(self)
    }

    fn to_value(&self) -> Value {
        match (self as &dyn Any).downcast_ref::<Vec<Value>>() {
            Some(list) => Value::List(list.clone()),
            None => Value::Typed(self.clone_boxed()),
        }
    }
}

impl<T: Shaped> Sequence for Vec<T> {
    fn element_shape(&self) -> &'static Shape {
        T::SHAPE
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Describe> {
        self.as_slice()
            .get(index)
            .map(|element| element as &dyn Describe)
    }

    fn replace(&mut self, elements: Vec<Box<dyn Describe>>) -> Result<(), CopyErrorKind> {
        let built = elements
            .into_iter()
            .map(downcast_boxed::<T>)
            .collect::<Result<Vec<T>, _>>()?;
        *self = built;
        Ok(())
    }
}

// ============================================================================
// Mappings
// ============================================================================

macro_rules! mapping {
    ($map:ident, $name:literal) => {
        impl<V: Shaped> Shaped for $map<String, V> {
            const SHAPE: &'static Shape = &Shape {
                type_identifier: $name,
                def: Def::Mapping { value: V::SHAPE },
                zero: zero_of::<Self>,
            };
        }

        impl<V: Shaped> Describe for $map<String, V> {
            crate::__describe_common!();

            fn is_zero(&self) -> bool {
                $map::is_empty(self)
            }

            fn peek(&self) -> Peek<'_> {
                Peek::Mapping(self)
            }

            fn poke(&mut self) -> Poke<'_> {
                Poke::Mapping(self)
            }

            fn to_value(&self) -> Value {
                match (self as &dyn Any).downcast_ref::<Map>() {
                    Some(map) => Value::Map(map.clone()),
                    None => Value::Typed(self.clone_boxed()),
                }
            }
        }

        impl<V: Shaped> Mapping for $map<String, V> {
            fn entries(&self) -> Box<dyn Iterator<Item = (&str, &dyn Describe)> + '_> {
                Box::new(
                    self.iter()
                        .map(|(key, value)| (key.as_str(), value as &dyn Describe)),
                )
            }

            fn get(&self, key: &str) -> Option<&dyn Describe> {
                $map::get(self, key).map(|value| value as &dyn Describe)
            }

            fn insert(&mut self, key: &str, value: &dyn Describe) -> Result<(), CopyErrorKind> {
                let Some(entry) = V::from_describe(value) else {
                    let held = match value.as_any().downcast_ref::<Value>() {
                        Some(dynamic) => dynamic.target().unwrap_or(value),
                        None => value,
                    };
                    return Err(CopyErrorKind::UnsupportedCoercion {
                        from: held.shape().type_identifier,
                        to: V::SHAPE.type_identifier,
                    });
                };
                $map::insert(self, key.to_owned(), entry);
                Ok(())
            }

            fn len(&self) -> usize {
                $map::len(self)
            }
        }
    };
}

mapping!(HashMap, "HashMap");
mapping!(BTreeMap, "BTreeMap");
