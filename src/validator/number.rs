//! Number validator (spec §4.C.2).

use serde_json::Value;

use crate::error::{ErrorKind, ValidationError, ValidatorTag};
use crate::value::{value_kind, ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub struct NumberValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
    pub requires_integer: bool,
    /// `None` means no constraint; `Some(0.0)` is the parser's warn-and-accept
    /// encoding for a schema's `multipleOf: 0` and is treated as always-passing.
    pub multiple_of: Option<f64>,
}

impl NumberValidator {
    pub fn new() -> Self {
        Self {
            min: None,
            max: None,
            exclusive_min: false,
            exclusive_max: false,
            requires_integer: false,
            multiple_of: None,
        }
    }

    pub fn min(mut self, min: f64, exclusive: bool) -> Self {
        self.min = Some(min);
        self.exclusive_min = exclusive;
        self
    }

    pub fn max(mut self, max: f64, exclusive: bool) -> Self {
        self.max = Some(max);
        self.exclusive_max = exclusive;
        self
    }

    pub fn requires_integer(mut self) -> Self {
        self.requires_integer = true;
        self
    }

    pub fn multiple_of(mut self, m: f64) -> Self {
        self.multiple_of = Some(m);
        self
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let kind = value_kind(value);
        if !kind.is_numeric() {
            return Err(ValidationError::new(
                ErrorKind::IncorrectType,
                ValidatorTag::Number,
                format!("expected number, got {}", kind.type_name()),
            )
            .with_value(value.clone()));
        }
        let n = value.as_f64().expect("numeric ValueKind implies as_f64");

        if self.requires_integer && kind != ValueKind::Integer {
            return Err(ValidationError::new(
                ErrorKind::NonIntegral,
                ValidatorTag::Number,
                format!("{} has a non-zero fractional part", n),
            )
            .with_value(value.clone()));
        }

        if let Some(m) = self.multiple_of {
            let m = m.abs();
            if m != 0.0 {
                let quotient = n / m;
                let nearest = quotient.round();
                if (quotient - nearest).abs() > 1e-9_f64.max(nearest.abs() * 1e-12) {
                    return Err(ValidationError::new(
                        ErrorKind::FormatMismatch,
                        ValidatorTag::Number,
                        format!("{} is not a multiple of {}", n, m),
                    )
                    .with_value(value.clone()));
                }
            }
        }

        if let Some(min) = self.min {
            let fails = if self.exclusive_min { n <= min } else { n < min };
            if fails {
                return Err(ValidationError::new(
                    ErrorKind::LessThanMin,
                    ValidatorTag::Number,
                    format!(
                        "{} is less than {}minimum {}",
                        n,
                        if self.exclusive_min { "exclusive " } else { "" },
                        min
                    ),
                )
                .with_value(value.clone()));
            }
        }

        if let Some(max) = self.max {
            let fails = if self.exclusive_max { n >= max } else { n > max };
            if fails {
                return Err(ValidationError::new(
                    ErrorKind::GreaterThanMax,
                    ValidatorTag::Number,
                    format!(
                        "{} is greater than {}maximum {}",
                        n,
                        if self.exclusive_max { "exclusive " } else { "" },
                        max
                    ),
                )
                .with_value(value.clone()));
            }
        }

        Ok(())
    }
}

impl Default for NumberValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exclusive_max_rejects_exact_boundary() {
        let v = NumberValidator::new().max(10.0, true);
        assert!(v.validate(&json!(10)).is_err());
        assert!(NumberValidator::new().max(10.0, false).validate(&json!(10)).is_ok());
    }

    #[test]
    fn requires_integer_rejects_fractional_float() {
        let v = NumberValidator::new().requires_integer();
        assert!(v.validate(&json!(1.5)).is_err());
        assert!(v.validate(&json!(1.0)).is_ok());
        assert!(v.validate(&json!(1)).is_ok());
    }

    #[test]
    fn multiple_of_zero_is_always_pass() {
        let v = NumberValidator::new().multiple_of(0.0);
        assert!(v.validate(&json!(7)).is_ok());
    }

    #[test]
    fn multiple_of_ignores_sign() {
        let v = NumberValidator::new().multiple_of(-3.0);
        assert!(v.validate(&json!(9)).is_ok());
        assert!(v.validate(&json!(10)).is_err());
    }

    #[test]
    fn order_of_checks_type_before_bounds() {
        let v = NumberValidator::new().min(0.0, false);
        let err = v.validate(&json!("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IncorrectType);
    }
}
