//! Object-shaped JSON Schema validation: property counts, `required`,
//! `properties`, `patternProperties`, `additionalProperties`, and
//! `dependencies` (spec §4.C.10). Grounded on the teacher's
//! `schema::object::ObjectSchema`, generalized to draft-04's dependency
//! forms.

use serde_json::Value;

use super::context::EvalContext;
use super::string::PatternConstraint;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// Presence of `key` requires every key in `requires` to also be present.
    Property { key: String, requires: Vec<String> },
    /// Presence of `key` requires the whole object to satisfy `schema`.
    Schema { key: String, schema: VRef },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonObjectSchemaValidator {
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub required: Vec<String>,
    pub properties: Vec<(String, VRef)>,
    pub pattern_properties: Vec<(PatternConstraint, VRef)>,
    pub additional_properties: VRef,
    pub dependencies: Vec<Dependency>,
}

impl JsonObjectSchemaValidator {
    pub fn new(additional_properties: VRef) -> Self {
        Self {
            min_properties: None,
            max_properties: None,
            required: Vec::new(),
            properties: Vec::new(),
            pattern_properties: Vec::new(),
            additional_properties,
            dependencies: Vec::new(),
        }
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                return Err(ValidationError::new(
                    ErrorKind::IncorrectType,
                    ValidatorTag::JsonObjectSchema,
                    "expected an object",
                )
                .with_value(value.clone()))
            }
        };

        let mut underlying = Vec::new();

        let mut count_error = None;
        if let Some(min) = self.min_properties {
            if obj.len() < min {
                count_error = Some(ValidationError::new(
                    ErrorKind::LengthLessThanMin,
                    ValidatorTag::JsonObjectSchema,
                    format!("{} properties is less than minimum {}", obj.len(), min),
                ));
            }
        }
        if count_error.is_none() {
            if let Some(max) = self.max_properties {
                if obj.len() > max {
                    count_error = Some(ValidationError::new(
                        ErrorKind::LengthGreaterThanMax,
                        ValidatorTag::JsonObjectSchema,
                        format!("{} properties is greater than maximum {}", obj.len(), max),
                    ));
                }
            }
        }
        if let Some(ce) = &count_error {
            underlying.push(ce.clone());
        }

        let mut missing_required = Vec::new();
        for key in &self.required {
            if !obj.contains_key(key) {
                missing_required.push(ValidationError::new(
                    ErrorKind::ValueNil,
                    ValidatorTag::JsonObjectSchema,
                    format!("required property '{}' is absent", key),
                ));
            }
        }
        underlying.extend(missing_required.iter().cloned());

        let mut pair_errors = Vec::new();

        for (key, val) in obj.iter() {
            let mut matched = false;

            if let Some((_, schema)) = self.properties.iter().find(|(k, _)| k == key) {
                matched = true;
                if let Err(e) = schema.evaluate(Some(val), ctx) {
                    pair_errors.push((key.clone(), e));
                }
            }

            for (pattern, schema) in &self.pattern_properties {
                if pattern.0.is_match(key) {
                    matched = true;
                    if let Err(e) = schema.evaluate(Some(val), ctx) {
                        pair_errors.push((key.clone(), e));
                    }
                }
            }

            if !matched {
                if let Err(e) = self.additional_properties.evaluate(Some(val), ctx) {
                    pair_errors.push((key.clone(), e));
                }
            }
        }

        for dependency in &self.dependencies {
            match dependency {
                Dependency::Property { key, requires } => {
                    if obj.contains_key(key) {
                        for req in requires {
                            if !obj.contains_key(req) {
                                pair_errors.push((
                                    key.clone(),
                                    ValidationError::new(
                                        ErrorKind::ValueNil,
                                        ValidatorTag::JsonObjectSchema,
                                        format!("presence of '{}' requires '{}' to be present", key, req),
                                    ),
                                ));
                            }
                        }
                    }
                }
                Dependency::Schema { key, schema } => {
                    if obj.contains_key(key) {
                        if let Err(e) = schema.evaluate(Some(value), ctx) {
                            pair_errors.push((key.clone(), e));
                        }
                    }
                }
            }
        }

        underlying.extend(pair_errors.iter().map(|(_, e)| e.clone()));

        if count_error.is_none() && missing_required.is_empty() && pair_errors.is_empty() {
            return Ok(());
        }

        let mut err = ValidationError::new(
            ErrorKind::KeyedCollectionError,
            ValidatorTag::JsonObjectSchema,
            "object schema validation failed",
        )
        .with_value(value.clone())
        .with_underlying(underlying);
        if let Some(ce) = count_error {
            err = err.with_count_error(ce);
        }
        if !missing_required.is_empty() {
            err = err.with_key_errors(missing_required);
        }
        if !pair_errors.is_empty() {
            err = err.with_pair_errors(pair_errors);
        }
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::number::NumberValidator;
    use crate::validator::Validator;
    use regex::Regex;
    use serde_json::json;
    use std::sync::Arc;

    fn always_pass() -> VRef {
        Arc::new(Validator::AlwaysPass)
    }

    #[test]
    fn required_property_absent_produces_key_error() {
        let mut v = JsonObjectSchemaValidator::new(always_pass());
        v.required = vec!["name".to_string()];
        let err = v.evaluate(&json!({}), &EvalContext::new()).unwrap_err();
        assert_eq!(err.key_errors.unwrap().len(), 1);
    }

    #[test]
    fn property_dependency_requires_co_presence() {
        let mut v = JsonObjectSchemaValidator::new(always_pass());
        v.dependencies = vec![Dependency::Property {
            key: "credit_card".to_string(),
            requires: vec!["billing_address".to_string()],
        }];
        assert!(v.evaluate(&json!({}), &EvalContext::new()).is_ok());
        let err = v
            .evaluate(&json!({"credit_card": "4111"}), &EvalContext::new())
            .unwrap_err();
        assert_eq!(err.pair_errors.unwrap().len(), 1);
    }

    #[test]
    fn pattern_properties_apply_to_matching_keys() {
        let mut v = JsonObjectSchemaValidator::new(always_pass());
        v.pattern_properties = vec![(
            PatternConstraint(Regex::new("^S_").unwrap()),
            Arc::new(Validator::Number(NumberValidator::new().min(0.0, false))),
        )];
        assert!(v.evaluate(&json!({"S_1": 5}), &EvalContext::new()).is_ok());
        assert!(v.evaluate(&json!({"S_1": -5}), &EvalContext::new()).is_err());
    }

    #[test]
    fn additional_properties_false_rejects_unmatched_keys() {
        let mut v = JsonObjectSchemaValidator::new(Arc::new(Validator::AlwaysFail));
        v.properties = vec![("name".to_string(), always_pass())];
        assert!(v.evaluate(&json!({"name": "a"}), &EvalContext::new()).is_ok());
        assert!(v.evaluate(&json!({"extra": 1}), &EvalContext::new()).is_err());
    }
}
