use super::{Copier, SourceFields, fault};
use crate::describe::{Describe, Poke};
use crate::errors::CopyError;

impl Copier<'_> {
    /// Insert the fields or entries of `source` into a mapping.
    ///
    /// Values are inserted as they are, without recursion or conversion, so
    /// the mapping must accept them as its declared value type. Record sources
    /// contribute every declared field, private ones included.
    pub(crate) fn assign_map(
        &self,
        source: &dyn Describe,
        destination: &mut dyn Describe,
    ) -> Result<(), CopyError> {
        let fields = SourceFields::of(source)?;
        let shape = destination.shape();
        let Poke::Mapping(mapping) = destination.poke() else {
            return Err(fault(format!("{shape} is not a mapping")));
        };

        let mut collected = Vec::new();
        for (key, value) in fields.entries() {
            if value.is_zero() {
                continue;
            }
            if let Err(kind) = mapping.insert(key, value) {
                self.settle(CopyError::from(kind).in_key(key), &mut collected)?;
            }
        }
        Self::finish(collected)
    }
}
