//! Error types for shape-directed copying.

use std::fmt;

use crate::path::{Path, PathSegment};

/// An error raised while copying a value.
///
/// `path` locates the failing field, key or index relative to the top-level
/// destination; it is empty when the top-level pair itself was rejected.
pub struct CopyError {
    pub path: Path,
    pub kind: CopyErrorKind,
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for CopyError {}

impl CopyError {
    /// Create a new error at the top-level value.
    pub fn new(kind: CopyErrorKind) -> Self {
        Self {
            path: Path::default(),
            kind,
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> &CopyErrorKind {
        &self.kind
    }

    /// Get the path to the failing value.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap the error with the name of the record field it happened in.
    pub(crate) fn in_field(mut self, name: &'static str) -> Self {
        self.prepend(PathSegment::Field(name));
        self
    }

    /// Wrap the error with the mapping key it happened under.
    pub(crate) fn in_key(mut self, key: &str) -> Self {
        self.prepend(PathSegment::Key(key.to_owned()));
        self
    }

    /// Wrap the error with the sequence index it happened at.
    pub(crate) fn at_index(mut self, index: usize) -> Self {
        self.prepend(PathSegment::Index(index));
        self
    }

    /// Gathered errors each carry their own location, so context goes to
    /// every one of them rather than to the collection.
    fn prepend(&mut self, segment: PathSegment) {
        match &mut self.kind {
            CopyErrorKind::Collected { errors } => {
                for error in errors {
                    error.prepend(segment.clone());
                }
            }
            _ => self.path.prepend(segment),
        }
    }

    /// Split a `Collected` error into the errors it gathered, each located
    /// from the top instead of from the collecting value.
    pub(crate) fn into_parts(self) -> Vec<CopyError> {
        let CopyError { path, kind } = self;
        match kind {
            CopyErrorKind::Collected { errors } => errors
                .into_iter()
                .map(|mut error| {
                    for segment in path.segments().iter().rev() {
                        error.path.prepend(segment.clone());
                    }
                    error
                })
                .collect(),
            kind => vec![CopyError { path, kind }],
        }
    }
}

impl From<CopyErrorKind> for CopyError {
    fn from(kind: CopyErrorKind) -> Self {
        Self::new(kind)
    }
}

/// The kind of copy error.
pub enum CopyErrorKind {
    /// The destination cannot be written through.
    InvalidDestination { shape: &'static str },
    /// Source and destination disagree on being a sequence.
    ShapeMismatch {
        source: &'static str,
        destination: &'static str,
        source_is_sequence: bool,
    },
    /// A reference destination has no target to write into.
    NilDestination { shape: &'static str },
    /// The destination field is not public.
    UnexportedFieldWrite { field: &'static str },
    /// No conversion is defined between the two representations.
    UnsupportedCoercion {
        from: &'static str,
        to: &'static str,
    },
    /// A numeric conversion is defined but the value does not fit.
    OutOfRange { value: String, to: &'static str },
    /// A checked cast or slot store failed mid-copy.
    InternalFault { detail: String },
    /// Several failures gathered in `OnFieldError::CollectAndContinue` mode.
    Collected { errors: Vec<CopyError> },
}

impl fmt::Display for CopyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyErrorKind::InvalidDestination { shape } => {
                write!(f, "destination must be a writable reference, got shared {shape}")
            }
            CopyErrorKind::ShapeMismatch {
                source,
                destination,
                source_is_sequence: true,
            } => {
                write!(
                    f,
                    "destination must be a sequence when source is a sequence \
                     (got {source} into {destination})"
                )
            }
            CopyErrorKind::ShapeMismatch {
                source,
                destination,
                source_is_sequence: false,
            } => {
                write!(
                    f,
                    "source must be a sequence when destination is a sequence \
                     (got {source} into {destination})"
                )
            }
            CopyErrorKind::NilDestination { shape } => {
                write!(f, "destination {shape} has no target")
            }
            CopyErrorKind::UnexportedFieldWrite { field } => {
                write!(f, "cannot write unexported field {field}")
            }
            CopyErrorKind::UnsupportedCoercion { from, to } => {
                write!(f, "unsupported coercion from {from} to {to}")
            }
            CopyErrorKind::OutOfRange { value, to } => {
                write!(f, "value {value} does not fit in {to}")
            }
            CopyErrorKind::InternalFault { detail } => {
                write!(f, "internal fault: {detail}")
            }
            CopyErrorKind::Collected { errors } => {
                write!(f, "{} field errors", errors.len())?;
                for error in errors {
                    write!(f, "; {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for CopyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
