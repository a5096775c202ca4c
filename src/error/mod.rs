//! Error types for validation failures.
//!
//! Validation errors are plain data describing what went wrong, structured
//! as a tree rather than a flat list: a compound or collection validator's
//! error carries every one of its subvalidators' errors underneath it, so a
//! caller can recover the full inventory of what failed.

mod flatten;
mod tree;

pub use flatten::flatten;
pub use tree::{ErrorKind, ValidationError, ValidatorTag};
