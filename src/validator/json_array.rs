//! Array-shaped JSON Schema validation: `items`, `minItems`/`maxItems`, and
//! `uniqueItems` (spec §4.C.9). Grounded on the teacher's `schema::array::ArraySchema`.

use serde_json::Value;

use super::context::EvalContext;
use super::VRef;
use crate::error::{ErrorKind, ValidationError, ValidatorTag};
use crate::value::json_deep_eq;

#[derive(Debug, Clone, PartialEq)]
pub enum ItemsMode {
    /// `items` was a single schema: every element is checked against it.
    Single(VRef),
    /// `items` was a list of schemas applied positionally; `tail` is
    /// `additionalItems`, applied to any element beyond the list.
    Positional { schemas: Vec<VRef>, tail: VRef },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonArrayValidator {
    pub items: Option<ItemsMode>,
    pub unique_items: bool,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl JsonArrayValidator {
    pub fn new() -> Self {
        Self {
            items: None,
            unique_items: false,
            min_items: None,
            max_items: None,
        }
    }

    pub fn with_items(mut self, items: ItemsMode) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    pub fn with_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_items = min;
        self.max_items = max;
        self
    }

    pub fn evaluate(&self, value: &Value, ctx: &EvalContext) -> Result<(), ValidationError> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => {
                return Err(ValidationError::new(
                    ErrorKind::IncorrectType,
                    ValidatorTag::JsonArray,
                    "expected an array",
                )
                .with_value(value.clone()))
            }
        };

        let mut underlying = Vec::new();
        let mut count_error = None;

        if let Some(min) = self.min_items {
            if arr.len() < min {
                count_error = Some(ValidationError::new(
                    ErrorKind::LengthLessThanMin,
                    ValidatorTag::JsonArray,
                    format!("{} items is less than minimum {}", arr.len(), min),
                ));
            }
        }
        if count_error.is_none() {
            if let Some(max) = self.max_items {
                if arr.len() > max {
                    count_error = Some(ValidationError::new(
                        ErrorKind::LengthGreaterThanMax,
                        ValidatorTag::JsonArray,
                        format!("{} items is greater than maximum {}", arr.len(), max),
                    ));
                }
            }
        }
        if let Some(ce) = &count_error {
            underlying.push(ce.clone());
        }

        let mut element_errors: Vec<Option<ValidationError>> = Vec::with_capacity(arr.len());
        match &self.items {
            Some(ItemsMode::Single(schema)) => {
                for item in arr {
                    element_errors.push(schema.evaluate(Some(item), ctx).err());
                }
            }
            Some(ItemsMode::Positional { schemas, tail }) => {
                for (i, item) in arr.iter().enumerate() {
                    let schema = schemas.get(i).unwrap_or(tail);
                    element_errors.push(schema.evaluate(Some(item), ctx).err());
                }
            }
            None => element_errors.extend(arr.iter().map(|_| None)),
        }
        underlying.extend(element_errors.iter().flatten().cloned());

        let mut uniqueness_error = None;
        if self.unique_items {
            'outer: for i in 0..arr.len() {
                for j in (i + 1)..arr.len() {
                    if json_deep_eq(&arr[i], &arr[j]) {
                        uniqueness_error = Some(ValidationError::new(
                            ErrorKind::NotInSet,
                            ValidatorTag::JsonArray,
                            format!("items at index {} and {} are not unique", i, j),
                        ));
                        break 'outer;
                    }
                }
            }
        }
        if let Some(ue) = &uniqueness_error {
            underlying.push(ue.clone());
        }

        if count_error.is_none() && element_errors.iter().all(Option::is_none) && uniqueness_error.is_none() {
            return Ok(());
        }

        let mut err = ValidationError::new(
            ErrorKind::CollectionError,
            ValidatorTag::JsonArray,
            "array validation failed",
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

impl Default for JsonArrayValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_items_fail_with_element_errors_all_null() {
        let v = JsonArrayValidator::new().with_unique_items();
        let err = v.evaluate(&json!([1, 2, 2]), &EvalContext::new()).unwrap_err();
        assert!(err.element_errors.unwrap().iter().all(Option::is_none));
        assert_eq!(err.underlying.len(), 1);
    }

    #[test]
    fn duplicate_items_treats_int_and_float_as_equal() {
        let v = JsonArrayValidator::new().with_unique_items();
        assert!(v.evaluate(&json!([1, 1.0]), &EvalContext::new()).is_err());
    }

    #[test]
    fn bounds_are_checked_before_items() {
        let v = JsonArrayValidator::new().with_bounds(Some(2), None);
        let err = v.evaluate(&json!([1]), &EvalContext::new()).unwrap_err();
        assert_eq!(err.count_error.unwrap().kind, ErrorKind::LengthLessThanMin);
    }
}
