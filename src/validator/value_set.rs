//! Membership-in-a-finite-set validator (spec §4.C.11, the `enum` keyword's
//! target).

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError, ValidatorTag};
use crate::value::json_deep_eq;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSetValidator {
    pub allowed: Vec<Value>,
    pub allow_absent: bool,
}

impl ValueSetValidator {
    pub fn new(allowed: Vec<Value>) -> Self {
        Self {
            allowed,
            allow_absent: false,
        }
    }

    pub fn validate(&self, value: Option<&Value>) -> Result<(), ValidationError> {
        let value = match value {
            None => {
                return if self.allow_absent {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::ValueNil,
                        ValidatorTag::ValueSet,
                        "value is absent",
                    ))
                };
            }
            Some(v) => v,
        };

        if self.allowed.iter().any(|candidate| json_deep_eq(candidate, value)) {
            Ok(())
        } else {
            Err(ValidationError::new(
                ErrorKind::NotInSet,
                ValidatorTag::ValueSet,
                "value is not in the allowed set",
            )
            .with_value(value.clone()))
        }
    }
}
