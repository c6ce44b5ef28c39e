use super::{Copier, SourceFields, fault};
use crate::describe::{Describe, Field, Poke, Record};
use crate::errors::{CopyError, CopyErrorKind};
use crate::shape::{Def, allocate};

impl Copier<'_> {
    /// Copy same-named fields or keys of `source` into a record.
    ///
    /// Destination fields are visited in declaration order. Names missing
    /// from the source and zero source values are skipped. Fields written
    /// before a failure keep their new values.
    pub(crate) fn assign_record(
        &self,
        source: &dyn Describe,
        destination: &mut dyn Describe,
    ) -> Result<(), CopyError> {
        let fields = SourceFields::of(source)?;
        let shape = destination.shape();
        let Poke::Record(record) = destination.poke() else {
            return Err(fault(format!("{shape} is not a record")));
        };

        let mut collected = Vec::new();
        for field in record.fields() {
            let Some(value) = fields.get(field.name) else {
                continue;
            };
            if value.is_zero() {
                continue;
            }
            if let Err(error) = self.copy_field(record, field, value) {
                self.settle(error.in_field(field.name), &mut collected)?;
            }
        }
        Self::finish(collected)
    }

    fn copy_field(
        &self,
        record: &mut dyn Record,
        field: &Field,
        value: &dyn Describe,
    ) -> Result<(), CopyError> {
        if !field.is_public() {
            return Err(CopyErrorKind::UnexportedFieldWrite { field: field.name }.into());
        }
        let slot = record
            .field_mut(field.name)
            .ok_or_else(|| fault(format!("declared field {} is missing", field.name)))?;
        let shape = slot.shape();

        // Reference fields get a fresh target, filled before it is installed.
        if let Def::Reference(_) = shape.def {
            let mut holder = allocate(shape);
            self.copy_value(value, holder.target_mut())?;
            let Poke::Reference(reference) = slot.poke() else {
                return Err(fault(format!("{shape} is not a reference")));
            };
            reference.install(holder.into_target())?;
            return Ok(());
        }

        self.copy_value(value, slot)
    }
}
