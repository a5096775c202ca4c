//! Plain collection validator: array-shaped values with a count check and a
//! set of per-element rules (spec §4.C.5).

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionValidator {
    pub count: Option<VRef>,
    /// Every validator in this list runs against every element; an
    /// element's slot carries one error aggregating whichever of them
    /// failed for that element.
    pub element_validators: Vec<VRef>,
}

impl CollectionValidator {
    pub fn new() -> Self {
        Self {
            count: None,
            element_validators: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: VRef) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_element_validators(mut self, validators: Vec<VRef>) -> Self {
        self.element_validators = validators;
        self
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => {
                return Err(ValidationError::new(
                    ErrorKind::NotACollection,
                    ValidatorTag::Collection,
                    "expected an array",
                )
                .with_value(value.clone()))
            }
        };

        let count_error = self.count.as_ref().and_then(|c| {
            c.evaluate(Some(&Value::from(arr.len() as u64)), ctx).err()
        });

        let mut element_errors: Vec<Option<ValidationError>> = Vec::with_capacity(arr.len());
        let mut any_element_failed = false;
        for element in arr {
            let errs: Vec<ValidationError> = self
                .element_validators
                .iter()
                .filter_map(|v| v.evaluate(Some(element), ctx).err())
                .collect();
            if errs.is_empty() {
                element_errors.push(None);
            } else {
                any_element_failed = true;
                let err = if errs.len() == 1 {
                    errs.into_iter().next().unwrap()
                } else {
                    ValidationError::new(
                        ErrorKind::CompoundError,
                        ValidatorTag::Compound,
                        "multiple element validators failed",
                    )
                    .with_underlying(errs)
                };
                element_errors.push(Some(err));
            }
        }

        if count_error.is_none() && !any_element_failed {
            return Ok(());
        }

        let mut underlying = Vec::new();
        if let Some(ce) = &count_error {
            underlying.push(ce.clone());
        }
        underlying.extend(element_errors.iter().flatten().cloned());

        let mut err = ValidationError::new(
            ErrorKind::CollectionError,
            ValidatorTag::Collection,
            "collection validation failed",
        )
        .with_value(value.clone())
        .with_underlying(underlying)
        .with_element_errors(element_errors);
        if let Some(ce) = count_error {
            err = err.with_count_error(ce);
        }
        Err(err)
    }
}

impl Default for CollectionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::number::NumberValidator;
    use crate::validator::value_check::ValueValidator;
    use crate::validator::Validator;
    use crate::value::ValueKind;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn element_errors_length_matches_input_length() {
        let v = CollectionValidator::new().with_element_validators(vec![Arc::new(
            Validator::Value(ValueValidator::expect(ValueKind::Integer)),
        )]);
        let err = v
            .evaluate(&json!([1, "x", 3]), &EvalContext::new())
            .unwrap_err();
        assert_eq!(err.element_errors.unwrap().len(), 3);
    }

    #[test]
    fn count_validator_runs_against_length() {
        let v = CollectionValidator::new()
            .with_count(Arc::new(Validator::Number(NumberValidator::new().max(2.0, false))));
        assert!(v.evaluate(&json!([1, 2]), &EvalContext::new()).is_ok());
        assert!(v.evaluate(&json!([1, 2, 3]), &EvalContext::new()).is_err());
    }

    #[test]
    fn non_array_fails_with_not_a_collection() {
        let v = CollectionValidator::new();
        let err = v.evaluate(&json!({}), &EvalContext::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotACollection);
    }
}
