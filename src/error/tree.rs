//! The validation error tree.

use indexmap::IndexMap;
use serde_json::Value;

/// The kind of failure a [`ValidationError`] represents.
///
/// Every error carries exactly the kind its originating validator is
/// allowed to produce; the collection-specific slots on [`ValidationError`]
/// are only populated for the matching `*-collection` kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValueNil,
    ValueNull,
    IncorrectType,
    NonIntegral,
    LessThanMin,
    GreaterThanMax,
    FormatMismatch,
    LengthLessThanMin,
    LengthGreaterThanMax,
    NotInSet,
    NotACollection,
    NotAKeyedCollection,
    KvcError,
    CompoundError,
    CollectionError,
    KeyedCollectionError,
}

/// Identifies which validator variant produced an error.
///
/// This is a cheap discriminant copy rather than a reference to the
/// validator itself, so that building an error never clones a closure or a
/// subtree of validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorTag {
    Value,
    Number,
    String,
    Block,
    ValueSet,
    Compound,
    KeyValueCoding,
    Collection,
    KeyedCollection,
    JsonObject,
    JsonArray,
    JsonObjectSchema,
    Reference,
    AlwaysFail,
}

/// A node in the tree of validation failures.
///
/// `underlying` never contains the error that owns it — the error graph is
/// a tree, not a cyclic structure — and the collection-specific slots
/// (`count_error`, `element_errors`, `key_errors`, `value_errors`,
/// `pair_errors`, `errors_by_key`) are mutually exclusive with each other's
/// *family*: a `Collection` failure only ever populates `count_error` and
/// `element_errors`; a `KeyedCollection` failure only ever populates
/// `count_error`, `key_errors`, `value_errors`, and `pair_errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub validated_value: Option<Value>,
    pub failing_validator: ValidatorTag,
    pub message: String,
    pub underlying: Vec<ValidationError>,
    pub count_error: Option<Box<ValidationError>>,
    pub element_errors: Option<Vec<Option<ValidationError>>>,
    pub key_errors: Option<Vec<ValidationError>>,
    pub value_errors: Option<Vec<ValidationError>>,
    pub pair_errors: Option<Vec<(String, ValidationError)>>,
    pub errors_by_key: Option<IndexMap<String, Vec<ValidationError>>>,
}

impl ValidationError {
    /// Creates a new leaf error with no underlying or per-slot detail.
    pub fn new(
        kind: ErrorKind,
        failing_validator: ValidatorTag,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            validated_value: None,
            failing_validator,
            message: message.into(),
            underlying: Vec::new(),
            count_error: None,
            element_errors: None,
            key_errors: None,
            value_errors: None,
            pair_errors: None,
            errors_by_key: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.validated_value = Some(value);
        self
    }

    pub fn with_underlying(mut self, underlying: Vec<ValidationError>) -> Self {
        self.underlying = underlying;
        self
    }

    pub fn with_count_error(mut self, error: ValidationError) -> Self {
        self.count_error = Some(Box::new(error));
        self
    }

    pub fn with_element_errors(mut self, errors: Vec<Option<ValidationError>>) -> Self {
        self.element_errors = Some(errors);
        self
    }

    pub fn with_key_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.key_errors = Some(errors);
        self
    }

    pub fn with_value_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.value_errors = Some(errors);
        self
    }

    pub fn with_pair_errors(mut self, errors: Vec<(String, ValidationError)>) -> Self {
        self.pair_errors = Some(errors);
        self
    }

    pub fn with_errors_by_key(mut self, errors: IndexMap<String, Vec<ValidationError>>) -> Self {
        self.errors_by_key = Some(errors);
        self
    }

    /// Total count of leaf errors reachable from this node, including itself.
    pub fn leaf_count(&self) -> usize {
        if self.underlying.is_empty() {
            1
        } else {
            self.underlying.iter().map(ValidationError::leaf_count).sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_error_has_no_detail() {
        let err = ValidationError::new(ErrorKind::IncorrectType, ValidatorTag::Value, "nope");
        assert_eq!(err.kind, ErrorKind::IncorrectType);
        assert!(err.underlying.is_empty());
        assert!(err.count_error.is_none());
    }

    #[test]
    fn builder_chains_set_expected_fields() {
        let err = ValidationError::new(ErrorKind::CompoundError, ValidatorTag::Compound, "and failed")
            .with_underlying(vec![
                ValidationError::new(ErrorKind::IncorrectType, ValidatorTag::Value, "a"),
                ValidationError::new(ErrorKind::LessThanMin, ValidatorTag::Number, "b"),
            ]);

        assert_eq!(err.underlying.len(), 2);
        assert_eq!(err.leaf_count(), 2);
    }

    #[test]
    fn leaf_count_of_leaf_is_one() {
        let err = ValidationError::new(ErrorKind::ValueNil, ValidatorTag::Value, "absent");
        assert_eq!(err.leaf_count(), 1);
    }
}
