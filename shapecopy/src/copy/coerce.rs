//! Scalar conversion.
//!
//! Only two conversions exist: the default integer width narrows to a
//! sized integer, and floats change width. Narrowing is checked, so a
//! value that does not fit fails with `OutOfRange` instead of wrapping.

use super::{Copier, fault};
use crate::describe::{Describe, Peek, Poke};
use crate::errors::{CopyError, CopyErrorKind};
use crate::shape::ScalarKind;
use crate::value::Value;

impl Copier<'_> {
    pub(crate) fn coerce_into(
        &self,
        source: &dyn Describe,
        destination: &mut dyn Describe,
        to: ScalarKind,
    ) -> Result<(), CopyError> {
        let Peek::Scalar(value) = source.peek() else {
            return Err(fault(format!("{} is not a scalar", source.shape())));
        };
        let coerced = coerce(value, to)?;
        let Poke::Scalar(slot) = destination.poke() else {
            return Err(fault(format!("{} has no scalar slot", to.type_identifier())));
        };
        slot.store(coerced).map_err(|rejected| {
            fault(format!(
                "{} slot rejected {rejected:?}",
                to.type_identifier()
            ))
        })
    }
}

/// Convert `value` to the representation of `to`.
pub(crate) fn coerce(value: Value, to: ScalarKind) -> Result<Value, CopyErrorKind> {
    match (value, to) {
        (Value::Int(v), ScalarKind::I8) => narrow(v, to, Value::I8),
        (Value::Int(v), ScalarKind::I16) => narrow(v, to, Value::I16),
        (Value::Int(v), ScalarKind::I32) => narrow(v, to, Value::I32),
        (Value::Int(v), ScalarKind::I64) => narrow(v, to, Value::I64),
        (Value::F32(v), ScalarKind::F64) => Ok(Value::F64(f64::from(v))),
        (Value::F64(v), ScalarKind::F32) => {
            // Rounding decides the bound: values that round to f32::MAX fit,
            // finite values that round to infinity do not.
            let narrowed = v as f32;
            if v.is_finite() && narrowed.is_infinite() {
                return Err(CopyErrorKind::OutOfRange {
                    value: v.to_string(),
                    to: to.type_identifier(),
                });
            }
            Ok(Value::F32(narrowed))
        }
        (value, to) => Err(CopyErrorKind::UnsupportedCoercion {
            from: value
                .target()
                .map_or("Value", |held| held.shape().type_identifier),
            to: to.type_identifier(),
        }),
    }
}

fn narrow<T: TryFrom<isize>>(
    v: isize,
    to: ScalarKind,
    wrap: fn(T) -> Value,
) -> Result<Value, CopyErrorKind> {
    T::try_from(v)
        .map(wrap)
        .map_err(|_| CopyErrorKind::OutOfRange {
            value: v.to_string(),
            to: to.type_identifier(),
        })
}
