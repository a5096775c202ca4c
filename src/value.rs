//! Semantic value kinds understood by the validator algebra.
//!
//! "Class" in the key-value-coding sense is reinterpreted here as the tag
//! computed by [`value_kind`]; every type-checking validator matches on it.

use serde_json::Value;

/// The tag used for `Value`/class checks throughout the validator algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// The JSON Schema type name for this kind (`"number"` covers both
    /// `Integer` and `Float`).
    pub fn type_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }
}

/// Computes the semantic kind of a JSON value.
///
/// JSON has a single `number` type; this distinguishes integral numbers
/// from fractional ones because `type: integer` and `Number::requires_integer`
/// need to tell them apart.
pub fn value_kind(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                ValueKind::Integer
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => ValueKind::Integer,
                    _ => ValueKind::Float,
                }
            }
        }
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

/// Does `value`'s JSON type satisfy the draft-04 type keyword `expected`
/// (`"integer"`, `"number"`, `"any"`, ...)?
///
/// `"number"` accepts both integers and floats; `"any"` accepts everything;
/// every other keyword requires an exact [`ValueKind`] match.
pub fn matches_type_keyword(value: &Value, expected: &str) -> bool {
    let kind = value_kind(value);
    match expected {
        "any" => true,
        "number" => kind.is_numeric(),
        "integer" => kind == ValueKind::Integer,
        "null" => kind == ValueKind::Null,
        "boolean" => kind == ValueKind::Boolean,
        "string" => kind == ValueKind::String,
        "array" => kind == ValueKind::Array,
        "object" => kind == ValueKind::Object,
        _ => false,
    }
}

/// Deep structural equality for JSON values where numeric equality is
/// value-equality, not representation-equality: `1` is equal to `1.0`.
pub fn json_deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| json_deep_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| json_deep_eq(v, w)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_float_is_integer_kind() {
        assert_eq!(value_kind(&json!(1.0)), ValueKind::Integer);
        assert_eq!(value_kind(&json!(1.5)), ValueKind::Float);
        assert_eq!(value_kind(&json!(1)), ValueKind::Integer);
    }

    #[test]
    fn number_keyword_accepts_both_numeric_kinds() {
        assert!(matches_type_keyword(&json!(1), "number"));
        assert!(matches_type_keyword(&json!(1.5), "number"));
        assert!(!matches_type_keyword(&json!("x"), "number"));
    }

    #[test]
    fn deep_eq_treats_int_and_float_as_equal() {
        assert!(json_deep_eq(&json!(1), &json!(1.0)));
        assert!(!json_deep_eq(&json!(1), &json!(2)));
    }

    #[test]
    fn deep_eq_recurses_into_arrays_and_objects() {
        assert!(json_deep_eq(
            &json!({"a": [1, 2.0]}),
            &json!({"a": [1.0, 2]})
        ));
        assert!(!json_deep_eq(&json!({"a": 1}), &json!({"a": 2})));
    }
}
