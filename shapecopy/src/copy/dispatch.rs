use super::{Copier, fault, through_reference};
use crate::describe::{Describe, Peek, Poke};
use crate::errors::{CopyError, CopyErrorKind};
use crate::shape::Def;

impl Copier<'_> {
    /// Copy one value into an existing destination, converting by shape.
    pub(crate) fn copy_value(
        &self,
        source: &dyn Describe,
        destination: &mut dyn Describe,
    ) -> Result<(), CopyError> {
        let from = source.shape();
        let to = destination.shape();

        // An absent source reference copies nothing.
        if let Def::Reference(_) = from.def {
            return match source.peek() {
                Peek::Reference(Some(target)) => self.copy_value(target, destination),
                _ => Ok(()),
            };
        }
        if let Def::Reference(_) = to.def {
            return self.copy_value(source, through_reference(destination)?);
        }

        if destination.assign(source) {
            return Ok(());
        }

        match (from.def, to.def) {
            (_, Def::Dynamic) => {
                let Poke::Dynamic(slot) = destination.poke() else {
                    return Err(fault(format!("{to} has no dynamic slot")));
                };
                *slot = source.to_value();
                Ok(())
            }
            (Def::Dynamic, _) => {
                let Peek::Dynamic(value) = source.peek() else {
                    return Err(fault(format!("{from} has no dynamic value")));
                };
                match value.target() {
                    Some(held) => self.copy_value(held, destination),
                    None => Ok(()),
                }
            }
            (Def::Record | Def::Mapping { .. }, Def::Mapping { .. }) => {
                self.assign_map(source, destination)
            }
            (Def::Record | Def::Mapping { .. }, Def::Record) => {
                self.assign_record(source, destination)
            }
            (Def::Sequence { .. }, Def::Sequence { .. }) => {
                self.copy_sequence(source, destination)
            }
            (Def::Scalar(_), Def::Scalar(kind)) => self.coerce_into(source, destination, kind),
            _ => Err(CopyErrorKind::UnsupportedCoercion {
                from: from.type_identifier,
                to: to.type_identifier,
            }
            .into()),
        }
    }
}
