//! Combines the checks every JSON Schema node shares with its type-specific
//! checks (spec §4.C.8). Grounded on the teacher's `schema::object::ObjectSchema`,
//! which paired a common validator with a typed one the same way.

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};

#[derive(Debug, Clone, PartialEq)]
pub struct JsonObjectValidator {
    /// Checks that apply regardless of `type`: `enum`, `not`, `allOf`, and
    /// so on, lowered into ordinary compound/value-set validators.
    pub common: VRef,
    /// The type-specific schema (`JsonObjectSchema`, `JsonArray`, `Number`,
    /// `String`, or a plain `Value` type guard).
    pub typed: VRef,
}

impl JsonObjectValidator {
    pub fn new(common: VRef, typed: VRef) -> Self {
        Self { common, typed }
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Err(e) = self.common.evaluate(Some(value), ctx) {
            errors.push(e);
        }
        if let Err(e) = self.typed.evaluate(Some(value), ctx) {
            errors.push(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(
                ErrorKind::CompoundError,
                ValidatorTag::JsonObject,
                "schema validation failed",
            )
            .with_value(value.clone())
            .with_underlying(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn runs_both_common_and_typed_even_when_common_fails() {
        let v = JsonObjectValidator::new(Arc::new(Validator::AlwaysFail), Arc::new(Validator::AlwaysFail));
        let err = v.evaluate(&json!(1), &EvalContext::new()).unwrap_err();
        assert_eq!(err.underlying.len(), 2);
    }

    #[test]
    fn passes_when_both_pass() {
        let v = JsonObjectValidator::new(Arc::new(Validator::AlwaysPass), Arc::new(Validator::AlwaysPass));
        assert!(v.evaluate(&json!(1), &EvalContext::new()).is_ok());
    }
}
