//! The JSON Schema (draft-04) front-end (spec §4.E-§4.H): parses a schema
//! document into an AST, then lowers that AST into the validator algebra.

pub mod ast;
pub mod lowering;
pub mod parser;
pub mod pointer;

pub use ast::{SchemaNode, TopLevelNode, TypeKeyword};
pub use lowering::{lower_document, LoweringError};
pub use parser::{parse, ParserError, ParserWarning};

use crate::loader::{ResourceLoader, SchemaCache};
use crate::validator::VRef;

/// Parses and lowers a schema document in one step (spec §6.3's
/// programmatic entry point), returning the compiled validator plus every
/// recoverable parser warning.
pub fn validator_from_schema(
    document: &serde_json::Value,
) -> Result<(VRef, Vec<ParserWarning>), SchemaError> {
    let (node, warnings) = parse(document)?;
    let validator = lower_document(&node, None)?;
    Ok((validator, warnings))
}

/// As [`validator_from_schema`], but resolves external `$ref`s through the
/// given loader and cache.
pub fn validator_from_schema_with_loader(
    document: &serde_json::Value,
    loader: &dyn ResourceLoader,
    cache: &SchemaCache,
) -> Result<(VRef, Vec<ParserWarning>), SchemaError> {
    let (node, warnings) = parse(document)?;
    let validator = lower_document(&node, Some((loader, cache)))?;
    Ok((validator, warnings))
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Lowering(#[from] LoweringError),
}
