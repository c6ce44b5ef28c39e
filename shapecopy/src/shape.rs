//! Static shape descriptors and the holder allocator.
//!
//! Every describable type exposes one `&'static Shape` through
//! [`Shaped::SHAPE`](crate::Shaped). The shape says how the engine should
//! treat values of the type (record, mapping, sequence, reference, scalar or
//! untyped) and knows how to build a zero value of it, which is all the
//! allocator needs to prepare destination holders.

use std::fmt;

use crate::describe::Describe;
use crate::errors::CopyErrorKind;

/// Static description of a describable type.
pub struct Shape {
    /// Type name for error reporting.
    pub type_identifier: &'static str,
    /// Structural classification.
    pub def: Def,
    /// Build a zero value of this type.
    pub zero: fn() -> Box<dyn Describe>,
}

/// Structural classification of a shape.
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// A scalar leaf.
    Scalar(ScalarKind),
    /// A fixed set of named fields.
    Record,
    /// String keys to values of one declared shape.
    Mapping { value: &'static Shape },
    /// An ordered list of elements of one declared shape.
    Sequence { element: &'static Shape },
    /// An indirection to a value of another shape, possibly absent.
    Reference(ReferenceDef),
    /// A [`Value`](crate::Value): shape decided per value at runtime.
    Dynamic,
}

/// How a reference type points at its target.
#[derive(Clone, Copy)]
pub struct ReferenceDef {
    /// Shape of the target.
    pub pointee: &'static Shape,
    /// Wrap an allocated target into a value of the reference type.
    pub wrap: fn(Box<dyn Describe>) -> Result<Box<dyn Describe>, CopyErrorKind>,
}

impl fmt::Debug for ReferenceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceDef({})", self.pointee.type_identifier)
    }
}

/// The scalar representations the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    /// `isize`, the default signed-integer width.
    Int,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    /// `chrono::DateTime<Utc>`.
    Timestamp,
    /// `chrono::NaiveDateTime`.
    NaiveTimestamp,
}

impl ScalarKind {
    /// Rust spelling of the representation.
    pub const fn type_identifier(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "isize",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "String",
            ScalarKind::Timestamp => "DateTime<Utc>",
            ScalarKind::NaiveTimestamp => "NaiveDateTime",
        }
    }
}

impl Shape {
    /// Check if values of this shape are sequences.
    pub fn is_sequence(&self) -> bool {
        matches!(self.def, Def::Sequence { .. })
    }

    /// Follow reference shapes down to the first non-reference shape.
    pub fn resolved(&'static self) -> &'static Shape {
        let mut shape = self;
        while let Def::Reference(reference) = shape.def {
            shape = reference.pointee;
        }
        shape
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_identifier)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}, {:?})", self.type_identifier, self.def)
    }
}

/// Box up the default value of `T`. Used as `Shape::zero`.
pub fn zero_of<T: Describe + Default>() -> Box<dyn Describe> {
    Box::new(T::default())
}

/// Unbox a `Box<dyn Describe>` into a concrete `T`.
pub(crate) fn downcast_boxed<T: Describe>(value: Box<dyn Describe>) -> Result<T, CopyErrorKind> {
    let found = value.shape().type_identifier;
    match value.into_any().downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(CopyErrorKind::InternalFault {
            detail: format!("holder of type {found} does not match its slot"),
        }),
    }
}

/// A zero-initialized, addressable value ready to receive a copy.
///
/// For reference shapes the holder contains the *target* of the reference,
/// and [`Holder::into_value`] wraps it back up.
pub struct Holder {
    shape: &'static Shape,
    target: Box<dyn Describe>,
}

impl Holder {
    /// The value to copy into.
    pub fn target_mut(&mut self) -> &mut dyn Describe {
        &mut *self.target
    }

    /// The value to copy from, once filled.
    pub fn target(&self) -> &dyn Describe {
        &*self.target
    }

    /// Take the filled target without wrapping it.
    pub fn into_target(self) -> Box<dyn Describe> {
        self.target
    }

    /// Take the filled target as a value of the declared shape.
    pub fn into_value(self) -> Result<Box<dyn Describe>, CopyErrorKind> {
        match self.shape.def {
            Def::Reference(reference) => (reference.wrap)(self.target),
            _ => Ok(self.target),
        }
    }
}

impl fmt::Debug for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Holder({}, {:?})", self.shape.type_identifier, self.target)
    }
}

/// Allocate a zero holder for `shape`.
///
/// A reference shape yields a holder of its target's zero value, so that a
/// copy can fill it before the reference is installed. Mapping zeros are
/// already empty, usable maps; nothing needs to be installed afterwards.
pub fn allocate(shape: &'static Shape) -> Holder {
    let target = match shape.def {
        Def::Reference(reference) => (reference.pointee.zero)(),
        _ => (shape.zero)(),
    };
    Holder { shape, target }
}
