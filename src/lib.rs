//! # witness
//!
//! A composable value-validation engine: a small algebra of validators —
//! type checks, bounds, patterns, and the compound operators that combine
//! them — with a JSON Schema (draft-04) front-end that lowers a schema
//! document into the same algebra.
//!
//! Validation failures are a tree, not a flat list: a compound or
//! collection validator's error carries every one of its subvalidators'
//! failures underneath it, so a caller sees the complete inventory of what
//! went wrong rather than only the first failure.
//!
//! ## Core types
//!
//! - [`Validator`]: the tagged union every validation rule is built from
//! - [`ValidationError`]: the tree-shaped failure a validator produces
//! - [`JsonPath`]: a path to a value in nested JSON (e.g. `users[0].email`)
//!
//! ## Example
//!
//! ```rust
//! use witness::validator::{NumberValidator, Validator};
//! use serde_json::json;
//!
//! let age = Validator::Number(NumberValidator::new().min(0.0, false).requires_integer());
//! assert!(age.validate(&json!(30)).is_ok());
//! assert!(age.validate(&json!(-1)).is_err());
//! ```

pub mod error;
pub mod loader;
pub mod path;
pub mod schema;
pub mod value;
pub mod validator;

pub use error::{flatten, ErrorKind, ValidationError, ValidatorTag};
pub use loader::{LoaderError, ResourceLoader, SchemaCache};
pub use path::{JsonPath, PathSegment};
pub use schema::{validator_from_schema, validator_from_schema_with_loader, ParserError, ParserWarning, SchemaError};
pub use validator::{Validator, VRef};
pub use value::{json_deep_eq, matches_type_keyword, value_kind, ValueKind};
