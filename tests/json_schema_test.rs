//! End-to-end coverage: a JSON Schema document in, a compiled validator out,
//! checked against concrete pass/fail instances.

use serde_json::json;
use witness::validator_from_schema;
use witness::{ErrorKind, Validator};

fn compile(schema: serde_json::Value) -> Validator {
    let (v, warnings) = validator_from_schema(&schema).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    (*v).clone()
}

#[test]
fn integer_bounds_pass_and_fail() {
    let v = compile(json!({"type": "integer", "minimum": 0, "maximum": 10}));
    assert!(v.validate(&json!(5)).is_ok());

    let err = v.validate(&json!(11)).unwrap_err();
    // the schema's common checks trivially pass (no enum/allOf/...), so the
    // only real failure bubbles up from the typed half.
    let greater_than_max = find_kind(&err, ErrorKind::GreaterThanMax);
    assert!(greater_than_max, "expected a greater-than-max error: {:#?}", err);
}

#[test]
fn string_length_and_pattern_compound_reports_only_the_failing_half() {
    let v = compile(json!({"type": "string", "minLength": 3, "pattern": "^[A-Z]+$"}));
    let err = v.validate(&json!("AB")).unwrap_err();
    assert!(find_kind(&err, ErrorKind::LengthLessThanMin));
    assert!(!find_kind(&err, ErrorKind::FormatMismatch));
}

#[test]
fn unique_items_failure_leaves_element_errors_null() {
    let v = compile(json!({"type": "array", "items": {"type": "integer"}, "uniqueItems": true}));
    let err = v.validate(&json!([1, 2, 2])).unwrap_err();
    let array_error = find_collection_error(&err).expect("expected a collection-error node");
    assert!(array_error.element_errors.as_ref().unwrap().iter().all(Option::is_none));
}

#[test]
fn ref_cycle_through_definitions_resolves_and_validates() {
    let v = compile(json!({
        "definitions": {
            "node": {
                "type": "object",
                "properties": {"next": {"$ref": "#/definitions/node"}},
            }
        },
        "$ref": "#/definitions/node",
    }));
    assert!(v.validate(&json!({"next": {"next": {}}})).is_ok());
    assert!(v.validate(&json!({"next": {"next": {"next": "not an object"}}})).is_err());
}

#[test]
fn mutual_exclusion_of_three_with_two_passing_fails() {
    use std::sync::Arc;
    use witness::validator::{CompoundValidator, NumberValidator};

    let always_pass = Arc::new(Validator::AlwaysPass);
    let rejects_negative = Arc::new(Validator::Number(NumberValidator::new().min(0.0, false)));
    let v = Validator::Compound(CompoundValidator::mutual_exclusion(vec![
        always_pass.clone(),
        rejects_negative,
        always_pass,
    ]));

    let err = v.validate(&json!(5)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CompoundError);
    assert!(err.message.contains("2"));
}

#[test]
fn keyed_collection_pair_validator_reports_age_under_pair_errors() {
    use std::sync::Arc;
    use witness::validator::{KeyedCollectionValidator, NumberValidator};

    let v = Validator::KeyedCollection(KeyedCollectionValidator::new().with_pair_validators(vec![(
        "age".to_string(),
        Arc::new(Validator::Number(NumberValidator::new().min(0.0, false).requires_integer())),
    )]));

    let err = v.validate(&json!({"age": -3, "name": "x"})).unwrap_err();
    let pair_errors = err.pair_errors.unwrap();
    assert_eq!(pair_errors.len(), 1);
    assert_eq!(pair_errors[0].0, "age");
    assert_eq!(pair_errors[0].1.kind, ErrorKind::LessThanMin);
}

fn find_kind(err: &witness::ValidationError, kind: ErrorKind) -> bool {
    if err.kind == kind {
        return true;
    }
    err.underlying.iter().any(|e| find_kind(e, kind))
        || err
            .count_error
            .as_ref()
            .is_some_and(|e| find_kind(e, kind))
        || err
            .element_errors
            .as_ref()
            .is_some_and(|es| es.iter().flatten().any(|e| find_kind(e, kind)))
        || err
            .pair_errors
            .as_ref()
            .is_some_and(|ps| ps.iter().any(|(_, e)| find_kind(e, kind)))
}

fn find_collection_error(err: &witness::ValidationError) -> Option<&witness::ValidationError> {
    if err.kind == ErrorKind::CollectionError {
        return Some(err);
    }
    err.underlying.iter().find_map(find_collection_error)
}
