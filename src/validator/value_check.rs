//! Value / class check (spec §4.C.1).

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError, ValidatorTag};
use crate::value::{value_kind, ValueKind};

/// Gates on absence, nullness, and the value's class tag. Most other
/// validators are paired with one of these (implicitly, via
/// [`crate::validator::compound::CompoundValidator`]) to get type-guard
/// behavior for free.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueValidator {
    pub allow_null: bool,
    pub allow_absent: bool,
    pub expected: Option<ValueKind>,
}

impl ValueValidator {
    pub fn new() -> Self {
        Self {
            allow_null: true,
            allow_absent: true,
            expected: None,
        }
    }

    pub fn expect(kind: ValueKind) -> Self {
        Self {
            allow_null: false,
            allow_absent: false,
            expected: Some(kind),
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
                        ValidatorTag::Value,
                        "value is absent",
                    ))
                };
            }
            Some(v) => v,
        };

        if matches!(value, Value::Null) {
            return if self.allow_null {
                Ok(())
            } else {
                Err(ValidationError::new(
                    ErrorKind::ValueNull,
                    ValidatorTag::Value,
                    "value is null",
                )
                .with_value(Value::Null))
            };
        }

        if let Some(expected) = self.expected {
            let kind = value_kind(value);
            if kind != expected {
                return Err(ValidationError::new(
                    ErrorKind::IncorrectType,
                    ValidatorTag::Value,
                    format!(
                        "expected {}, got {}",
                        expected.type_name(),
                        kind.type_name()
                    ),
                )
                .with_value(value.clone()));
            }
        }

        Ok(())
    }
}

impl Default for ValueValidator {
    fn default() -> Self {
        Self::new()
    }
}
