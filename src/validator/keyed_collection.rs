//! Plain keyed-collection validator: object-shaped values with count, key,
//! value, and per-key-pair rules (spec §4.C.6).

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCollectionValidator {
    pub count: Option<VRef>,
    /// Each runs against every key, represented as a `Value::String`.
    pub key_validators: Vec<VRef>,
    /// Each runs against every value, regardless of key.
    pub value_validators: Vec<VRef>,
    /// Each runs only when its named key is present.
    pub pair_validators: Vec<(String, VRef)>,
}

impl KeyedCollectionValidator {
    pub fn new() -> Self {
        Self {
            count: None,
            key_validators: Vec::new(),
            value_validators: Vec::new(),
            pair_validators: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: VRef) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_key_validators(mut self, validators: Vec<VRef>) -> Self {
        self.key_validators = validators;
        self
    }

    pub fn with_value_validators(mut self, validators: Vec<VRef>) -> Self {
        self.value_validators = validators;
        self
    }

    pub fn with_pair_validators(mut self, validators: Vec<(String, VRef)>) -> Self {
        self.pair_validators = validators;
        self
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                return Err(ValidationError::new(
                    ErrorKind::NotAKeyedCollection,
                    ValidatorTag::KeyedCollection,
                    "expected an object",
                )
                .with_value(value.clone()))
            }
        };

        let count_error = self.count.as_ref().and_then(|c| {
            c.evaluate(Some(&Value::from(obj.len() as u64)), ctx).err()
        });

        let mut key_errors = Vec::new();
        for key in obj.keys() {
            let key_value = Value::String(key.clone());
            for v in &self.key_validators {
                if let Err(e) = v.evaluate(Some(&key_value), ctx) {
                    key_errors.push(e);
                }
            }
        }

        let mut value_errors = Vec::new();
        for val in obj.values() {
            for v in &self.value_validators {
                if let Err(e) = v.evaluate(Some(val), ctx) {
                    value_errors.push(e);
                }
            }
        }

        let mut pair_errors = Vec::new();
        for (key, validator) in &self.pair_validators {
            if let Some(val) = obj.get(key) {
                if let Err(e) = validator.evaluate(Some(val), ctx) {
                    pair_errors.push((key.clone(), e));
                }
            }
        }

        if count_error.is_none()
            && key_errors.is_empty()
            && value_errors.is_empty()
            && pair_errors.is_empty()
        {
            return Ok(());
        }

        let mut underlying = Vec::new();
        if let Some(ce) = &count_error {
            underlying.push(ce.clone());
        }
        underlying.extend(key_errors.iter().cloned());
        underlying.extend(value_errors.iter().cloned());
        underlying.extend(pair_errors.iter().map(|(_, e)| e.clone()));

        let mut err = ValidationError::new(
            ErrorKind::KeyedCollectionError,
            ValidatorTag::KeyedCollection,
            "keyed collection validation failed",
        )
        .with_value(value.clone())
        .with_underlying(underlying);
        if !key_errors.is_empty() {
            err = err.with_key_errors(key_errors);
        }
        if !value_errors.is_empty() {
            err = err.with_value_errors(value_errors);
        }
        if !pair_errors.is_empty() {
            err = err.with_pair_errors(pair_errors);
        }
        if let Some(ce) = count_error {
            err = err.with_count_error(ce);
        }
        Err(err)
    }
}

impl Default for KeyedCollectionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::number::NumberValidator;
    use crate::validator::Validator;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn pair_validator_only_runs_when_key_present() {
        let v = KeyedCollectionValidator::new().with_pair_validators(vec![(
            "age".to_string(),
            Arc::new(Validator::Number(NumberValidator::new().min(0.0, false))),
        )]);
        assert!(v.evaluate(&json!({"name": "a"}), &EvalContext::new()).is_ok());
        let err = v
            .evaluate(&json!({"age": -1}), &EvalContext::new())
            .unwrap_err();
        assert_eq!(err.pair_errors.unwrap().len(), 1);
    }

    #[test]
    fn non_object_fails_with_not_a_keyed_collection() {
        let v = KeyedCollectionValidator::new();
        let err = v.evaluate(&json!([1, 2]), &EvalContext::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAKeyedCollection);
    }
}
