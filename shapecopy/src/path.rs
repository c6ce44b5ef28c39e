//! Positional context for copy errors.
//!
//! A path is built inside-out: the failing leaf returns an error with an empty
//! path, and every enclosing record, mapping or sequence prepends its own
//! segment as the error travels back up.

use std::fmt;

use smallvec::SmallVec;

/// Inline storage for paths; most records are a few levels deep.
type PathVec = SmallVec<[PathSegment; 4]>;

/// One step into a nested value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field of a record.
    Field(&'static str),
    /// Key of a mapping entry.
    Key(String),
    /// Position in a sequence.
    Index(usize),
}

/// A path from the top-level destination to the value that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path(PathVec);

impl Path {
    /// Create an empty path.
    pub fn empty() -> Self {
        Self(PathVec::new())
    }

    /// Create a path from a slice of segments.
    pub fn from_segments(segments: &[PathSegment]) -> Self {
        Self(segments.iter().cloned().collect())
    }

    /// Put a segment in front of the path.
    pub fn prepend(&mut self, seg: PathSegment) {
        self.0.insert(0, seg);
    }

    /// Get the segments of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Check if the path is empty (the error is about the top-level value).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
