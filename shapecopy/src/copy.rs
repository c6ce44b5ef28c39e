//! The copy engine.
//!
//! ```text
//!   copy / copy_with
//!        │  resolve both sides, check sequence-ness
//!        ├──────────────► copy_sequence ──┐  per element:
//!        │                                │  allocate holder, copy_value
//!        ▼                                ▼
//!   copy_value ◄──────────────────────────┘
//!        │  deref source, deref destination,
//!        │  same type?  assign
//!        ├─► Value destination      store source.to_value()
//!        ├─► Value source           unwrap, recurse
//!        ├─► mapping destination    assign_map     (per entry, no conversion)
//!        ├─► record destination     assign_record  (per field, recurse)
//!        ├─► sequence destination   copy_sequence
//!        └─► scalar destination     coerce
//! ```

mod coerce;
mod dispatch;
mod sequence;
mod to_map;
mod to_record;

use crate::describe::{Describe, Mapping, Peek, Poke, Record, Target};
use crate::errors::{CopyError, CopyErrorKind};
use crate::options::{CopyOptions, OnFieldError};

/// Copy `source` into `destination` with default options.
///
/// Fields, keys and elements are matched by name or position and copied
/// recursively. Zero source values are skipped, so the matching destination
/// fields keep what they held. See [`copy_with`] for the full contract.
pub fn copy(source: &dyn Describe, destination: &mut dyn Describe) -> Result<(), CopyError> {
    copy_with(source, destination, &CopyOptions::default())
}

/// Copy `source` into `destination`.
///
/// References and untyped values are looked through on both sides. A sequence
/// source requires a sequence destination and the other way round; anything
/// else fails with `ShapeMismatch` before the destination is touched.
///
/// A sequence destination is rebuilt off to the side and replaced in one step,
/// so a failing element leaves it untouched. Record and mapping destinations
/// are written field by field: fields processed before a failing one keep
/// their new values.
pub fn copy_with(
    source: &dyn Describe,
    destination: &mut dyn Describe,
    options: &CopyOptions,
) -> Result<(), CopyError> {
    let Some(source) = resolve(source) else {
        return Ok(());
    };

    let source_is_sequence = matches!(source.peek(), Peek::Sequence(_));
    let destination_shape = destination.shape();
    if source_is_sequence != destination_shape.resolved().is_sequence() {
        return Err(CopyErrorKind::ShapeMismatch {
            source: source.shape().type_identifier,
            destination: destination_shape.type_identifier,
            source_is_sequence,
        }
        .into());
    }

    let copier = Copier { options };
    if source_is_sequence {
        copier.copy_sequence(source, destination)
    } else {
        copier.copy_value(source, destination)
    }
}

/// Follow references and untyped values to the value they hold. `None` when
/// the chain ends in an absent reference or `Value::Null`.
pub(crate) fn resolve(mut value: &dyn Describe) -> Option<&dyn Describe> {
    loop {
        value = match value.peek() {
            Peek::Reference(target) => target?,
            Peek::Dynamic(dynamic) => dynamic.target()?,
            _ => return Some(value),
        };
    }
}

/// The write target behind a reference destination.
fn through_reference(destination: &mut dyn Describe) -> Result<&mut dyn Describe, CopyError> {
    let shape = destination.shape().type_identifier;
    let Poke::Reference(reference) = destination.poke() else {
        return Err(fault(format!("{shape} is not a reference")));
    };
    match reference.target_mut() {
        Target::Present(target) => Ok(target),
        Target::Absent => Err(CopyErrorKind::NilDestination { shape }.into()),
        Target::Shared => Err(CopyErrorKind::InvalidDestination { shape }.into()),
    }
}

pub(crate) fn fault(detail: impl Into<String>) -> CopyError {
    CopyErrorKind::InternalFault {
        detail: detail.into(),
    }
    .into()
}

/// Named values of a record or mapping source.
#[derive(Clone, Copy)]
enum SourceFields<'a> {
    Record(&'a dyn Record),
    Mapping(&'a dyn Mapping),
}

impl<'a> SourceFields<'a> {
    fn of(source: &'a dyn Describe) -> Result<Self, CopyError> {
        match source.peek() {
            Peek::Record(record) => Ok(Self::Record(record)),
            Peek::Mapping(mapping) => Ok(Self::Mapping(mapping)),
            _ => Err(fault(format!(
                "{} has no named fields",
                source.shape().type_identifier
            ))),
        }
    }

    fn get(self, name: &str) -> Option<&'a dyn Describe> {
        match self {
            Self::Record(record) => record.field(name),
            Self::Mapping(mapping) => mapping.get(name),
        }
    }

    /// Record fields in declaration order, or mapping entries.
    fn entries(self) -> Box<dyn Iterator<Item = (&'a str, &'a dyn Describe)> + 'a> {
        match self {
            Self::Record(record) => Box::new(
                record
                    .fields()
                    .iter()
                    .filter_map(move |field| Some((field.name, record.field(field.name)?))),
            ),
            Self::Mapping(mapping) => mapping.entries(),
        }
    }
}

/// One copy operation in flight.
pub(crate) struct Copier<'o> {
    options: &'o CopyOptions,
}

impl Copier<'_> {
    /// Apply the field-error policy to one failed field or entry.
    fn settle(&self, error: CopyError, collected: &mut Vec<CopyError>) -> Result<(), CopyError> {
        match self.options.on_field_error {
            OnFieldError::Abort => Err(error),
            OnFieldError::CollectAndContinue => {
                for error in error.into_parts() {
                    tracing::warn!(%error, "continuing past failed field");
                    collected.push(error);
                }
                Ok(())
            }
        }
    }

    fn finish(collected: Vec<CopyError>) -> Result<(), CopyError> {
        if collected.is_empty() {
            Ok(())
        } else {
            Err(CopyErrorKind::Collected { errors: collected }.into())
        }
    }
}
