//! # shapecopy
//!
//! Shape-directed copying between records, mappings and sequences.
//!
//! [`copy`] takes any describable source and writes it into an existing
//! destination of a possibly different shape: records into records, records
//! into mappings and back, sequences element by element. Fields are matched
//! by name, references are followed or freshly allocated, and integers and
//! floats are narrowed or widened when the destination asks for it.
//!
//! ```
//! use shapecopy::{Value, copy};
//!
//! shapecopy::record! {
//!     #[derive(Clone, Debug, Default)]
//!     pub struct Account {
//!         pub name: String,
//!         pub limit: i32,
//!     }
//! }
//!
//! let rows = vec![
//!     Value::from([("name", Value::from("a")), ("limit", Value::Int(10))]),
//!     Value::from([("name", Value::from("b"))]),
//! ];
//! let mut accounts: Vec<Account> = Vec::new();
//! copy(&rows, &mut accounts).unwrap();
//! assert_eq!(accounts[0].limit, 10);
//! assert_eq!(accounts[1].name, "b");
//! ```

// --- path ---
mod path;
pub use path::{Path, PathSegment};

// --- errors ---
mod errors;
pub use errors::{CopyError, CopyErrorKind};

// --- shapes ---
mod shape;
pub use shape::{Def, Holder, ReferenceDef, ScalarKind, Shape, allocate, zero_of};

// --- describable values ---
mod describe;
pub use describe::{
    Describe, Field, Mapping, Peek, Poke, Record, Reference, ScalarSlot, Sequence, Shaped, Target,
    Visibility,
};

mod value;
pub use value::{Map, Value};

// --- record adapters ---
mod record;

// --- options ---
mod options;
pub use options::{CopyOptions, OnFieldError};

// --- engine ---
mod copy;
pub use copy::{copy, copy_with};
