//! Convenience flattening of an error tree into `(path, error)` pairs.
//!
//! This is not part of the core validation contract — the tree in
//! [`super::ValidationError`] is the source of truth — but most callers
//! displaying errors to a human want a flat list annotated with where each
//! failure occurred, so this walks the tree reconstructing paths the same
//! way the collection/keyed-collection validators built it.

use super::ValidationError;
use crate::path::JsonPath;

/// Walks an error tree, pairing every leaf-ish node with the path to the
/// value it concerns.
///
/// Compound errors (`underlying`) do not advance the path, since they
/// describe the same value as their parent — and are only walked when none
/// of the structured slots below fired, since `underlying` is otherwise
/// built from those same slots and would double-report them. Collection
/// element errors push an index segment; `pair_errors`/`errors_by_key`
/// push a field segment; `key_errors`/`value_errors` describe the
/// collection as a whole and stay at the parent path.
pub fn flatten(error: &ValidationError) -> Vec<(JsonPath, &ValidationError)> {
    let mut out = Vec::new();
    walk(error, JsonPath::root(), &mut out);
    out
}

fn walk<'a>(error: &'a ValidationError, path: JsonPath, out: &mut Vec<(JsonPath, &'a ValidationError)>) {
    let mut handled = false;

    if let Some(count_error) = &error.count_error {
        walk(count_error, path.clone(), out);
        handled = true;
    }

    if let Some(elements) = &error.element_errors {
        for (i, element) in elements.iter().enumerate() {
            if let Some(element_error) = element {
                walk(element_error, path.push_index(i), out);
            }
        }
        handled = true;
    }

    if let Some(pairs) = &error.pair_errors {
        for (key, pair_error) in pairs {
            walk(pair_error, path.push_field(key.clone()), out);
        }
        handled = true;
    }

    if let Some(by_key) = &error.errors_by_key {
        for (key, errors) in by_key {
            for key_error in errors {
                walk(key_error, path.push_field(key.clone()), out);
            }
        }
        handled = true;
    }

    if let Some(key_errors) = &error.key_errors {
        for key_error in key_errors {
            walk(key_error, path.clone(), out);
        }
        handled = true;
    }

    if let Some(value_errors) = &error.value_errors {
        for value_error in value_errors {
            walk(value_error, path.clone(), out);
        }
        handled = true;
    }

    // `underlying` is always built from the same slots walked above (see
    // `collection.rs`/`keyed_collection.rs`), so re-walking it here too
    // would double-report every one of them. Only fall back to it when
    // none of the specific slots fired.
    if handled {
        return;
    }

    if error.underlying.is_empty() {
        out.push((path, error));
    } else {
        for child in &error.underlying {
            walk(child, path.clone(), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ValidatorTag};

    #[test]
    fn flattens_compound_underlying_at_same_path() {
        let err = ValidationError::new(ErrorKind::CompoundError, ValidatorTag::Compound, "and")
            .with_underlying(vec![
                ValidationError::new(ErrorKind::IncorrectType, ValidatorTag::Value, "a"),
                ValidationError::new(ErrorKind::LessThanMin, ValidatorTag::Number, "b"),
            ]);

        let flat = flatten(&err);
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|(p, _)| p.is_root()));
    }

    #[test]
    fn flattens_element_errors_with_index_path() {
        let err = ValidationError::new(ErrorKind::CollectionError, ValidatorTag::Collection, "collection")
            .with_element_errors(vec![
                None,
                Some(ValidationError::new(ErrorKind::IncorrectType, ValidatorTag::Value, "bad")),
            ]);

        let flat = flatten(&err);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0.to_string(), "[1]");
    }

    #[test]
    fn flattens_pair_errors_with_field_path() {
        let err = ValidationError::new(
            ErrorKind::KeyedCollectionError,
            ValidatorTag::KeyedCollection,
            "keyed",
        )
        .with_pair_errors(vec![(
            "age".to_string(),
            ValidationError::new(ErrorKind::LessThanMin, ValidatorTag::Number, "too small"),
        )]);

        let flat = flatten(&err);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0.to_string(), "age");
    }

    #[test]
    fn does_not_double_report_real_collection_output() {
        use crate::validator::value_check::ValueValidator;
        use crate::validator::{CollectionValidator, EvalContext};
        use crate::value::ValueKind;
        use serde_json::json;
        use std::sync::Arc;

        let v = CollectionValidator::new().with_element_validators(vec![Arc::new(
            crate::validator::Validator::Value(ValueValidator::expect(ValueKind::Integer)),
        )]);
        let err = v.evaluate(&json!([1, "x", 3]), &EvalContext::new()).unwrap_err();

        let flat = flatten(&err);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].0.to_string(), "[1]");
    }

    #[test]
    fn key_and_value_errors_stay_at_the_parent_path() {
        let err = ValidationError::new(
            ErrorKind::KeyedCollectionError,
            ValidatorTag::KeyedCollection,
            "keyed",
        )
        .with_key_errors(vec![ValidationError::new(
            ErrorKind::IncorrectType,
            ValidatorTag::Value,
            "bad key",
        )])
        .with_value_errors(vec![ValidationError::new(
            ErrorKind::IncorrectType,
            ValidatorTag::Value,
            "bad value",
        )]);

        let flat = flatten(&err);
        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|(p, _)| p.is_root()));
    }
}
