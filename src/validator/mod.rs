//! The validator algebra (spec §3, §4.C): a tagged union of composable,
//! immutable validators, each evaluated against a [`serde_json::Value`].
//!
//! Every variant's struct lives in its own submodule; this module only
//! defines the [`Validator`] enum that unifies them, the [`VRef`] shared
//! handle used to build a validator DAG, and the dispatch in
//! [`Validator::evaluate`].

pub mod block;
pub mod collection;
pub mod compound;
pub mod context;
pub mod json_array;
pub mod json_object;
pub mod json_object_schema;
pub mod keyed_collection;
pub mod kvc;
pub mod number;
pub mod reference;
pub mod string;
pub mod value_check;
pub mod value_set;

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError, ValidatorTag};

pub use block::BlockValidator;
pub use collection::CollectionValidator;
pub use compound::{CompoundKind, CompoundValidator};
pub use context::EvalContext;
pub use json_array::{ItemsMode, JsonArrayValidator};
pub use json_object::JsonObjectValidator;
pub use json_object_schema::{Dependency, JsonObjectSchemaValidator};
pub use keyed_collection::KeyedCollectionValidator;
pub use kvc::{canonical_selector, KeyValueCodingValidator, KvcSource};
pub use number::NumberValidator;
pub use reference::ReferenceValidator;
pub use string::StringValidator;
pub use value_check::ValueValidator;
pub use value_set::ValueSetValidator;

/// A shared handle into the validator DAG. Cloning a `VRef` clones a
/// pointer, not a subtree, which is what lets cyclic schemas exist at all.
pub type VRef = Arc<Validator>;

/// The full set of composable validators (spec §3.2).
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Value(ValueValidator),
    Number(NumberValidator),
    String(StringValidator),
    Block(BlockValidator),
    ValueSet(ValueSetValidator),
    Compound(CompoundValidator),
    KeyValueCoding(KeyValueCodingValidator),
    Collection(CollectionValidator),
    KeyedCollection(KeyedCollectionValidator),
    JsonObject(JsonObjectValidator),
    JsonArray(JsonArrayValidator),
    JsonObjectSchema(JsonObjectSchemaValidator),
    Reference(ReferenceValidator),
    /// Unconditional success, used as a placeholder during lowering (e.g.
    /// an absent `additionalProperties` defaults to this).
    AlwaysPass,
    /// Unconditional failure, used where draft-04 spells `additionalProperties: false`.
    AlwaysFail,
}

fn require_present<'a>(
    value: Option<&'a Value>,
    tag: ValidatorTag,
) -> Result<&'a Value, ValidationError> {
    value.ok_or_else(|| ValidationError::new(ErrorKind::ValueNil, tag, "value is absent"))
}

impl Validator {
    /// The standard entry point: validate a value that is known to be present.
    #[tracing::instrument(skip_all)]
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.evaluate(Some(value), &EvalContext::new())
    }

    /// Validates with a [`KvcSource`] installed, for trees containing a
    /// `KeyValueCoding` validator.
    #[tracing::instrument(skip_all)]
    pub fn validate_with_kvc(
        &self,
        value: &Value,
        source: Arc<dyn KvcSource>,
    ) -> Result<(), ValidationError> {
        self.evaluate(Some(value), &EvalContext::new().with_kvc_source(source))
    }

    /// Evaluates this validator against a possibly-absent value.
    ///
    /// Only [`Validator::Value`] and [`Validator::ValueSet`] give absence
    /// its own meaning (`allow_absent`); every other variant treats absence
    /// as a `value-nil` failure, since a real caller never invokes them
    /// without an actual instance in hand (collection elements, object
    /// values, and schema properties are only ever dispatched to a
    /// sub-validator when something is actually there to check).
    #[tracing::instrument(level = "trace", skip(self, value, ctx))]
    pub fn evaluate(&self, value: Option<&Value>, ctx: &EvalContext) -> Result<(), ValidationError> {
        match self {
            Validator::Value(v) => v.validate(value),
            Validator::ValueSet(v) => v.validate(value),
            Validator::AlwaysPass => Ok(()),
            Validator::AlwaysFail => Err(ValidationError::new(
                ErrorKind::NotInSet,
                ValidatorTag::AlwaysFail,
                "this validator always fails",
            )),
            Validator::Number(v) => {
                require_present(value, ValidatorTag::Number).and_then(|val| v.validate(val))
            }
            Validator::String(v) => {
                require_present(value, ValidatorTag::String).and_then(|val| v.validate(val))
            }
            Validator::Block(v) => {
                require_present(value, ValidatorTag::Block).and_then(|val| v.validate(val))
            }
            Validator::Compound(v) => {
                require_present(value, ValidatorTag::Compound).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::KeyValueCoding(v) => {
                require_present(value, ValidatorTag::KeyValueCoding).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::Collection(v) => {
                require_present(value, ValidatorTag::Collection).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::KeyedCollection(v) => {
                require_present(value, ValidatorTag::KeyedCollection).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::JsonObject(v) => {
                require_present(value, ValidatorTag::JsonObject).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::JsonArray(v) => {
                require_present(value, ValidatorTag::JsonArray).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::JsonObjectSchema(v) => {
                require_present(value, ValidatorTag::JsonObjectSchema).and_then(|val| v.evaluate(val, ctx))
            }
            Validator::Reference(v) => {
                require_present(value, ValidatorTag::Reference).and_then(|val| v.evaluate(val, ctx))
            }
        }
    }
}
