//! Key-value-coding adapter (spec §4.C.7, §4.D).
//!
//! Bridges the validator algebra to a host object's own validators,
//! supplied at evaluation time through [`KvcSource`] rather than baked into
//! the schema: precedence is instance validators, then class validators,
//! then the source's own self-validation fallback.

use indexmap::IndexMap;
use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

pub trait KvcSource: Send + Sync {
    /// Validators registered for `key` at the class level, if any.
    fn class_validators(&self, key: &str) -> Option<Vec<VRef>>;

    /// Validators registered for `key` on this particular instance, if any.
    /// Instance validators take precedence over class validators when both
    /// are present.
    fn instance_validators(&self, key: &str) -> Option<Vec<VRef>>;

    /// Fallback used when neither instance nor class validators exist for
    /// `key`. Defaults to always-pass.
    fn self_validate(&self, _key: &str, _value: &Value) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Canonicalizes `key` into the selector name (`validators_for_<Key>`) a
/// host can bind to take precedence over a generic per-key lookup.
pub fn canonical_selector(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("validators_for_{}{}", first.to_uppercase(), chars.as_str()),
        None => "validators_for_".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueCodingValidator {
    pub keys: Vec<String>,
}

impl KeyValueCodingValidator {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let source = match &ctx.kvc_source {
            Some(s) => s.clone(),
            None => {
                return Err(ValidationError::new(
                    ErrorKind::KvcError,
                    ValidatorTag::KeyValueCoding,
                    "key-value coding validator requires a KvcSource; evaluate with one installed in the context",
                )
                .with_value(value.clone()))
            }
        };

        let obj = value.as_object();
        let mut errors_by_key: IndexMap<String, Vec<ValidationError>> = IndexMap::new();

        for key in &self.keys {
            let field_value = obj.and_then(|o| o.get(key.as_str()));
            let mut key_errors = Vec::new();

            match field_value {
                None => key_errors.push(ValidationError::new(
                    ErrorKind::ValueNil,
                    ValidatorTag::KeyValueCoding,
                    format!("key '{}' is absent", key),
                )),
                Some(Value::Null) => key_errors.push(ValidationError::new(
                    ErrorKind::ValueNull,
                    ValidatorTag::KeyValueCoding,
                    format!("key '{}' is null", key),
                )),
                Some(field_value) => {
                    let validators = source
                        .instance_validators(key)
                        .or_else(|| source.class_validators(key));

                    match validators {
                        Some(validators) => {
                            let child_ctx = ctx.enter();
                            for v in &validators {
                                if let Err(e) = v.evaluate(Some(field_value), &child_ctx) {
                                    key_errors.push(e);
                                }
                            }
                        }
                        None => {
                            if let Err(e) = source.self_validate(key, field_value) {
                                key_errors.push(e);
                            }
                        }
                    }
                }
            }

            if !key_errors.is_empty() {
                errors_by_key.insert(key.clone(), key_errors);
            }
        }

        if errors_by_key.is_empty() {
            Ok(())
        } else {
            let underlying = errors_by_key.values().flatten().cloned().collect();
            Err(ValidationError::new(
                ErrorKind::KvcError,
                ValidatorTag::KeyValueCoding,
                "key-value coding validation failed",
            )
            .with_value(value.clone())
            .with_underlying(underlying)
            .with_errors_by_key(errors_by_key))
        }
    }
}
