use super::{Copier, fault, resolve, through_reference};
use crate::describe::{Describe, Peek, Poke};
use crate::errors::{CopyError, CopyErrorKind};
use crate::shape::{Def, Shape, allocate};

impl Copier<'_> {
    /// Rebuild `destination` from the elements of `source`.
    ///
    /// Elements are copied into fresh holders of the destination's element
    /// shape and installed all at once. The first failing element aborts the
    /// copy with its index and the destination keeps its previous contents.
    pub(crate) fn copy_sequence(
        &self,
        source: &dyn Describe,
        destination: &mut dyn Describe,
    ) -> Result<(), CopyError> {
        let Peek::Sequence(items) = source.peek() else {
            return Err(fault(format!("{} is not a sequence", source.shape())));
        };
        if let Def::Reference(_) = destination.shape().def {
            return self.copy_sequence(source, through_reference(destination)?);
        }

        let destination_shape = destination.shape();
        let Poke::Sequence(sequence) = destination.poke() else {
            return Err(CopyErrorKind::ShapeMismatch {
                source: source.shape().type_identifier,
                destination: destination_shape.type_identifier,
                source_is_sequence: true,
            }
            .into());
        };

        let element = sequence.element_shape();
        tracing::trace!(
            len = items.len(),
            element = element.type_identifier,
            "copying sequence"
        );

        let mut built = Vec::with_capacity(items.len());
        for index in 0..items.len() {
            let item = items
                .element(index)
                .ok_or_else(|| fault(format!("sequence lost element {index}")))?;
            let value = self
                .copy_element(item, element)
                .map_err(|error| error.at_index(index))?;
            built.push(value);
        }

        sequence.replace(built)?;
        Ok(())
    }

    fn copy_element(
        &self,
        item: &dyn Describe,
        element: &'static Shape,
    ) -> Result<Box<dyn Describe>, CopyError> {
        // An absent item stays absent when the element shape can express it.
        if let Def::Reference(_) = element.def {
            if resolve(item).is_none() {
                return Ok((element.zero)());
            }
        }

        let mut holder = allocate(element);
        self.copy_value(item, holder.target_mut())?;
        Ok(holder.into_value()?)
    }
}
