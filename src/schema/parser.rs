//! Turns a JSON Schema document into a [`SchemaNode`] tree (spec §4.F).
//!
//! Unknown keywords and malformed-but-recoverable constructs produce a
//! [`ParserWarning`] and are treated as absent; only conditions that leave no
//! sane fallback produce a [`ParserError`]. Grounded on the key-matching
//! shape of `remexre-json-schema`'s schema parser, rebuilt on `serde_json`
//! alone.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use super::ast::{
    ArrayFields, CommonFields, DependencyNode, ItemsSpec, NumberFields, ObjectFields, SchemaNode,
    StringFields, TopLevelNode, TypeKeyword,
};
use super::pointer::parse_ref;
use crate::loader::LoaderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserWarning {
    UnknownKeyword { pointer: String, keyword: String },
    UnrecognizedTypeName { pointer: String, name: String },
    InvalidPattern { pointer: String, keyword: String, message: String },
    NonPositiveMultipleOf { pointer: String, value: String },
    ExclusiveBoundWithoutBound { pointer: String, keyword: String },
    /// A negative `multipleOf` was replaced by its absolute value.
    NegativeMultipleOf { pointer: String, value: String },
    /// A negative unsigned-integer keyword (`minLength`, `minItems`, ...) was
    /// clamped to 0.
    NegativeUnsignedClamped { pointer: String, keyword: String, value: String },
    /// A non-integer unsigned-integer keyword was rounded (nearest,
    /// half away from zero).
    UnsignedRounded { pointer: String, keyword: String, value: String },
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("'{pointer}': 'type' must be a string or array of strings, got {value}")]
    InvalidClass { pointer: String, value: String },
    #[error("'{pointer}': '{keyword}' has an invalid value: {message}")]
    InvalidValue {
        pointer: String,
        keyword: String,
        message: String,
    },
    #[error("'{pointer}': '{keyword}' must have at least one item")]
    RequiresAtLeastOneItem { pointer: String, keyword: String },
    #[error("'{pointer}': failed to resolve remote reference: {source}")]
    RemoteReference {
        pointer: String,
        #[source]
        source: LoaderError,
    },
}

struct ParseCtx {
    warnings: Vec<ParserWarning>,
}

/// Parses a full schema document, returning the root node wrapped in
/// [`SchemaNode::TopLevel`] plus every warning collected along the way.
#[tracing::instrument(skip_all)]
pub fn parse(value: &Value) -> Result<(SchemaNode, Vec<ParserWarning>), ParserError> {
    let mut ctx = ParseCtx { warnings: Vec::new() };
    let root = parse_node(value, "#", &mut ctx)?;

    // `root` already carries its own `definitions` in `CommonFields` whenever
    // it has one (`parse_common_fields` handles that). The only case that
    // loses them is a document-root `$ref`, which short-circuits `parse_node`
    // before it looks at any sibling keyword — so only re-parse here when
    // `root` has nowhere of its own to keep them.
    let mut definitions = IndexMap::new();
    if root.common().is_none() {
        if let Some(defs) = value.as_object().and_then(|obj| obj.get("definitions")) {
            let defs_obj = defs.as_object().ok_or_else(|| ParserError::InvalidValue {
                pointer: "#".to_string(),
                keyword: "definitions".to_string(),
                message: "must be an object".to_string(),
            })?;
            for (key, val) in defs_obj {
                let sub_pointer = format!("#/definitions/{key}");
                definitions.insert(key.clone(), parse_node(val, &sub_pointer, &mut ctx)?);
            }
        }
    }

    let references = IndexMap::new();
    let top = SchemaNode::TopLevel(TopLevelNode {
        root: Box::new(root),
        definitions,
        references,
    });
    Ok((top, ctx.warnings))
}

fn parse_node(value: &Value, pointer: &str, ctx: &mut ParseCtx) -> Result<SchemaNode, ParserError> {
    match value {
        Value::Bool(b) => return Ok(SchemaNode::BooleanValue(*b)),
        Value::Object(obj) => {
            if let Some(Value::String(r)) = obj.get("$ref") {
                return Ok(SchemaNode::Reference(parse_ref(r)));
            }
        }
        _ => {
            return Err(ParserError::InvalidValue {
                pointer: pointer.to_string(),
                keyword: "<schema>".to_string(),
                message: "a schema must be an object or a boolean".to_string(),
            })
        }
    }

    let obj = value.as_object().expect("checked above");
    let valid_types = parse_type_keyword(obj, pointer, ctx)?;
    let common = parse_common_fields(obj, pointer, ctx)?;

    let node = match classify(&valid_types) {
        Classification::Ambiguous => SchemaNode::Ambiguous(common, valid_types),
        Classification::Single(TypeKeyword::Number) | Classification::Single(TypeKeyword::Integer) => {
            let requires_integer = valid_types.contains(&TypeKeyword::Integer) && !valid_types.contains(&TypeKeyword::Number);
            SchemaNode::Number(common, parse_number_fields(obj, pointer, requires_integer, ctx)?)
        }
        Classification::Single(TypeKeyword::String) => {
            SchemaNode::String(common, parse_string_fields(obj, pointer, ctx)?)
        }
        Classification::Single(TypeKeyword::Array) => {
            SchemaNode::Array(common, parse_array_fields(obj, pointer, ctx)?)
        }
        Classification::Single(TypeKeyword::Object) => {
            SchemaNode::Object(common, parse_object_fields(obj, pointer, ctx)?)
        }
        Classification::Single(_) | Classification::None => {
            if has_object_keywords(obj) {
                SchemaNode::Object(common, parse_object_fields(obj, pointer, ctx)?)
            } else if has_array_keywords(obj) {
                SchemaNode::Array(common, parse_array_fields(obj, pointer, ctx)?)
            } else if has_string_keywords(obj) {
                SchemaNode::String(common, parse_string_fields(obj, pointer, ctx)?)
            } else if has_number_keywords(obj) {
                SchemaNode::Number(common, parse_number_fields(obj, pointer, false, ctx)?)
            } else {
                SchemaNode::Generic(common)
            }
        }
    };

    Ok(node)
}

enum Classification {
    None,
    Single(TypeKeyword),
    Ambiguous,
}

fn classify(valid_types: &BTreeSet<TypeKeyword>) -> Classification {
    let substantive: Vec<TypeKeyword> = valid_types
        .iter()
        .copied()
        .filter(|t| *t != TypeKeyword::Any)
        .collect();
    match substantive.len() {
        0 => Classification::None,
        1 => Classification::Single(substantive[0]),
        _ => {
            // `["integer", "number"]` is not ambiguous: every integer is a number.
            if substantive.len() == 2
                && substantive.contains(&TypeKeyword::Integer)
                && substantive.contains(&TypeKeyword::Number)
            {
                Classification::Single(TypeKeyword::Integer)
            } else {
                Classification::Ambiguous
            }
        }
    }
}

fn parse_type_keyword(
    obj: &Map<String, Value>,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<BTreeSet<TypeKeyword>, ParserError> {
    let mut set = BTreeSet::new();
    match obj.get("type") {
        None => {}
        Some(Value::String(s)) => match TypeKeyword::from_str(s) {
            Some(t) => {
                set.insert(t);
            }
            None => {
                return Err(ParserError::InvalidClass {
                    pointer: pointer.to_string(),
                    value: s.clone(),
                })
            }
        },
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(s) => match TypeKeyword::from_str(s) {
                        Some(t) => {
                            set.insert(t);
                        }
                        None => ctx.warnings.push(ParserWarning::UnrecognizedTypeName {
                            pointer: pointer.to_string(),
                            name: s.clone(),
                        }),
                    },
                    other => {
                        return Err(ParserError::InvalidClass {
                            pointer: pointer.to_string(),
                            value: other.to_string(),
                        })
                    }
                }
            }
        }
        Some(other) => {
            return Err(ParserError::InvalidClass {
                pointer: pointer.to_string(),
                value: other.to_string(),
            })
        }
    }
    Ok(set)
}

fn parse_common_fields(
    obj: &Map<String, Value>,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<CommonFields, ParserError> {
    let mut common = CommonFields {
        type_is_explicit: obj.contains_key("type"),
        ..Default::default()
    };

    common.title = obj.get("title").and_then(|v| v.as_str()).map(str::to_string);
    common.description = obj.get("description").and_then(|v| v.as_str()).map(str::to_string);
    common.valid_types = parse_type_keyword(obj, pointer, ctx)?;

    if let Some(v) = obj.get("enum") {
        let items = v.as_array().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "enum".to_string(),
            message: "must be an array".to_string(),
        })?;
        if items.is_empty() {
            return Err(ParserError::RequiresAtLeastOneItem {
                pointer: pointer.to_string(),
                keyword: "enum".to_string(),
            });
        }
        common.enum_values = Some(items.clone());
    }

    common.all_of = parse_schema_array(obj, "allOf", pointer, ctx)?;
    common.any_of = parse_schema_array(obj, "anyOf", pointer, ctx)?;
    common.one_of = parse_schema_array(obj, "oneOf", pointer, ctx)?;

    if let Some(v) = obj.get("not") {
        common.not = Some(Box::new(parse_node(v, &format!("{pointer}/not"), ctx)?));
    }

    if let Some(defs) = obj.get("definitions") {
        let defs_obj = defs.as_object().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "definitions".to_string(),
            message: "must be an object".to_string(),
        })?;
        for (key, val) in defs_obj {
            let sub_pointer = format!("{pointer}/definitions/{key}");
            common.definitions.insert(key.clone(), parse_node(val, &sub_pointer, ctx)?);
        }
    }

    Ok(common)
}

fn parse_schema_array(
    obj: &Map<String, Value>,
    keyword: &str,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<Vec<SchemaNode>, ParserError> {
    let Some(v) = obj.get(keyword) else {
        return Ok(Vec::new());
    };
    let items = v.as_array().ok_or_else(|| ParserError::InvalidValue {
        pointer: pointer.to_string(),
        keyword: keyword.to_string(),
        message: "must be an array of schemas".to_string(),
    })?;
    if items.is_empty() {
        return Err(ParserError::RequiresAtLeastOneItem {
            pointer: pointer.to_string(),
            keyword: keyword.to_string(),
        });
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_node(item, &format!("{pointer}/{keyword}/{i}"), ctx))
        .collect()
}

fn as_f64_field(
    obj: &Map<String, Value>,
    keyword: &str,
    pointer: &str,
) -> Result<Option<f64>, ParserError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: keyword.to_string(),
            message: "must be a number".to_string(),
        }),
    }
}

/// Parses an unsigned-integer keyword (`minLength`, `minItems`, ...),
/// recovering rather than aborting: a negative value clamps to 0, a
/// non-integer value rounds to the nearest integer (half away from zero).
fn as_usize_field(
    obj: &Map<String, Value>,
    keyword: &str,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<Option<usize>, ParserError> {
    let Some(v) = obj.get(keyword) else {
        return Ok(None);
    };
    let n = v.as_f64().ok_or_else(|| ParserError::InvalidValue {
        pointer: pointer.to_string(),
        keyword: keyword.to_string(),
        message: "must be a number".to_string(),
    })?;

    let rounded = if n.fract() != 0.0 {
        // `f64::round` already rounds half away from zero.
        let r = n.round();
        ctx.warnings.push(ParserWarning::UnsignedRounded {
            pointer: pointer.to_string(),
            keyword: keyword.to_string(),
            value: n.to_string(),
        });
        r
    } else {
        n
    };

    if rounded < 0.0 {
        ctx.warnings.push(ParserWarning::NegativeUnsignedClamped {
            pointer: pointer.to_string(),
            keyword: keyword.to_string(),
            value: n.to_string(),
        });
        return Ok(Some(0));
    }

    Ok(Some(rounded as usize))
}

fn parse_number_fields(
    obj: &Map<String, Value>,
    pointer: &str,
    requires_integer: bool,
    ctx: &mut ParseCtx,
) -> Result<NumberFields, ParserError> {
    let mut fields = NumberFields {
        requires_integer,
        ..Default::default()
    };

    if let Some(m) = as_f64_field(obj, "multipleOf", pointer)? {
        if m == 0.0 {
            ctx.warnings.push(ParserWarning::NonPositiveMultipleOf {
                pointer: pointer.to_string(),
                value: m.to_string(),
            });
        } else if m < 0.0 {
            ctx.warnings.push(ParserWarning::NegativeMultipleOf {
                pointer: pointer.to_string(),
                value: m.to_string(),
            });
            fields.multiple_of = Some(m.abs());
        } else {
            fields.multiple_of = Some(m);
        }
    }

    fields.minimum = as_f64_field(obj, "minimum", pointer)?;
    fields.maximum = as_f64_field(obj, "maximum", pointer)?;

    let exclusive_min = obj.get("exclusiveMinimum").and_then(Value::as_bool).unwrap_or(false);
    let exclusive_max = obj.get("exclusiveMaximum").and_then(Value::as_bool).unwrap_or(false);
    if exclusive_min && fields.minimum.is_none() {
        ctx.warnings.push(ParserWarning::ExclusiveBoundWithoutBound {
            pointer: pointer.to_string(),
            keyword: "exclusiveMinimum".to_string(),
        });
    } else {
        fields.exclusive_minimum = exclusive_min;
    }
    if exclusive_max && fields.maximum.is_none() {
        ctx.warnings.push(ParserWarning::ExclusiveBoundWithoutBound {
            pointer: pointer.to_string(),
            keyword: "exclusiveMaximum".to_string(),
        });
    } else {
        fields.exclusive_maximum = exclusive_max;
    }

    Ok(fields)
}

fn parse_string_fields(
    obj: &Map<String, Value>,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<StringFields, ParserError> {
    let mut fields = StringFields {
        min_length: as_usize_field(obj, "minLength", pointer, ctx)?,
        max_length: as_usize_field(obj, "maxLength", pointer, ctx)?,
        pattern: None,
    };

    if let Some(Value::String(p)) = obj.get("pattern") {
        match regex::Regex::new(p) {
            Ok(_) => fields.pattern = Some(p.clone()),
            Err(e) => ctx.warnings.push(ParserWarning::InvalidPattern {
                pointer: pointer.to_string(),
                keyword: "pattern".to_string(),
                message: e.to_string(),
            }),
        }
    }

    Ok(fields)
}

fn parse_array_fields(
    obj: &Map<String, Value>,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<ArrayFields, ParserError> {
    let items = match obj.get("items") {
        None => None,
        Some(Value::Array(list)) => {
            let nodes = list
                .iter()
                .enumerate()
                .map(|(i, v)| parse_node(v, &format!("{pointer}/items/{i}"), ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Some(ItemsSpec::Positional(nodes))
        }
        Some(v) => Some(ItemsSpec::Single(Box::new(parse_node(v, &format!("{pointer}/items"), ctx)?))),
    };

    let additional_items = match obj.get("additionalItems") {
        Some(v) => Box::new(parse_node(v, &format!("{pointer}/additionalItems"), ctx)?),
        None => Box::new(SchemaNode::BooleanValue(true)),
    };

    Ok(ArrayFields {
        items,
        additional_items,
        min_items: as_usize_field(obj, "minItems", pointer, ctx)?,
        max_items: as_usize_field(obj, "maxItems", pointer, ctx)?,
        unique_items: obj.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn parse_object_fields(
    obj: &Map<String, Value>,
    pointer: &str,
    ctx: &mut ParseCtx,
) -> Result<ObjectFields, ParserError> {
    let mut required = Vec::new();
    if let Some(v) = obj.get("required") {
        let items = v.as_array().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "required".to_string(),
            message: "must be an array of strings".to_string(),
        })?;
        if items.is_empty() {
            return Err(ParserError::RequiresAtLeastOneItem {
                pointer: pointer.to_string(),
                keyword: "required".to_string(),
            });
        }
        for item in items {
            match item.as_str() {
                Some(s) => required.push(s.to_string()),
                None => {
                    return Err(ParserError::InvalidValue {
                        pointer: pointer.to_string(),
                        keyword: "required".to_string(),
                        message: "every entry must be a string".to_string(),
                    })
                }
            }
        }
    }

    let mut properties = Vec::new();
    if let Some(v) = obj.get("properties") {
        let props_obj = v.as_object().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "properties".to_string(),
            message: "must be an object".to_string(),
        })?;
        for (key, val) in props_obj {
            let sub_pointer = format!("{pointer}/properties/{key}");
            properties.push(SchemaNode::NamedProperty {
                key: key.clone(),
                schema: Box::new(parse_node(val, &sub_pointer, ctx)?),
            });
        }
    }

    let mut pattern_properties = Vec::new();
    if let Some(v) = obj.get("patternProperties") {
        let props_obj = v.as_object().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "patternProperties".to_string(),
            message: "must be an object".to_string(),
        })?;
        for (pattern, val) in props_obj {
            let sub_pointer = format!("{pointer}/patternProperties/{pattern}");
            if regex::Regex::new(pattern).is_err() {
                ctx.warnings.push(ParserWarning::InvalidPattern {
                    pointer: pointer.to_string(),
                    keyword: "patternProperties".to_string(),
                    message: format!("'{pattern}' does not compile as a regex"),
                });
                continue;
            }
            pattern_properties.push(SchemaNode::PatternProperty {
                pattern: pattern.clone(),
                schema: Box::new(parse_node(val, &sub_pointer, ctx)?),
            });
        }
    }

    let additional_properties = match obj.get("additionalProperties") {
        Some(v) => Box::new(parse_node(v, &format!("{pointer}/additionalProperties"), ctx)?),
        None => Box::new(SchemaNode::BooleanValue(true)),
    };

    let mut dependencies = Vec::new();
    if let Some(v) = obj.get("dependencies") {
        let deps_obj = v.as_object().ok_or_else(|| ParserError::InvalidValue {
            pointer: pointer.to_string(),
            keyword: "dependencies".to_string(),
            message: "must be an object".to_string(),
        })?;
        for (key, val) in deps_obj {
            let sub_pointer = format!("{pointer}/dependencies/{key}");
            match val {
                Value::Array(items) => {
                    let requires = items
                        .iter()
                        .map(|v| {
                            v.as_str().map(str::to_string).ok_or_else(|| ParserError::InvalidValue {
                                pointer: sub_pointer.clone(),
                                keyword: "dependencies".to_string(),
                                message: "property dependency entries must be strings".to_string(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    dependencies.push(SchemaNode::Dependency(DependencyNode::Property {
                        key: key.clone(),
                        requires,
                    }));
                }
                _ => {
                    let schema = parse_node(val, &sub_pointer, ctx)?;
                    dependencies.push(SchemaNode::Dependency(DependencyNode::Schema {
                        key: key.clone(),
                        schema: Box::new(schema),
                    }));
                }
            }
        }
    }

    Ok(ObjectFields {
        min_properties: as_usize_field(obj, "minProperties", pointer, ctx)?,
        max_properties: as_usize_field(obj, "maxProperties", pointer, ctx)?,
        required,
        properties,
        pattern_properties,
        additional_properties,
        dependencies,
    })
}

fn has_object_keywords(obj: &Map<String, Value>) -> bool {
    ["properties", "patternProperties", "additionalProperties", "required", "dependencies", "minProperties", "maxProperties"]
        .iter()
        .any(|k| obj.contains_key(*k))
}

fn has_array_keywords(obj: &Map<String, Value>) -> bool {
    ["items", "additionalItems", "minItems", "maxItems", "uniqueItems"]
        .iter()
        .any(|k| obj.contains_key(*k))
}

fn has_string_keywords(obj: &Map<String, Value>) -> bool {
    ["minLength", "maxLength", "pattern"].iter().any(|k| obj.contains_key(*k))
}

fn has_number_keywords(obj: &Map<String, Value>) -> bool {
    ["multipleOf", "minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum"]
        .iter()
        .any(|k| obj.contains_key(*k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_type_string_parses_string_fields() {
        let (top, warnings) = parse(&json!({"type": "string", "minLength": 2})).unwrap();
        assert!(warnings.is_empty());
        let SchemaNode::TopLevel(t) = top else { panic!() };
        assert!(matches!(*t.root, SchemaNode::String(_, _)));
    }

    #[test]
    fn implicit_type_inferred_from_keywords() {
        let (top, _) = parse(&json!({"minItems": 1})).unwrap();
        let SchemaNode::TopLevel(t) = top else { panic!() };
        assert!(matches!(*t.root, SchemaNode::Array(_, _)));
    }

    #[test]
    fn invalid_type_value_is_a_hard_error() {
        let err = parse(&json!({"type": 5}));
        assert!(matches!(err, Err(ParserError::InvalidClass { .. })));
    }

    #[test]
    fn empty_enum_is_a_hard_error() {
        let err = parse(&json!({"enum": []}));
        assert!(matches!(err, Err(ParserError::RequiresAtLeastOneItem { .. })));
    }

    #[test]
    fn bad_regex_pattern_is_a_warning_not_an_error() {
        let (_, warnings) = parse(&json!({"type": "string", "pattern": "("})).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ParserWarning::InvalidPattern { .. }));
    }

    #[test]
    fn non_positive_multiple_of_is_a_warning() {
        let (_, warnings) = parse(&json!({"type": "number", "multipleOf": 0})).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ParserWarning::NonPositiveMultipleOf { .. }));
    }

    #[test]
    fn negative_multiple_of_keeps_the_constraint_as_its_absolute_value() {
        let (top, warnings) = parse(&json!({"type": "number", "multipleOf": -3})).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ParserWarning::NegativeMultipleOf { .. }));
        let SchemaNode::TopLevel(t) = top else { panic!() };
        let SchemaNode::Number(_, fields) = *t.root else { panic!() };
        assert_eq!(fields.multiple_of, Some(3.0));
    }

    #[test]
    fn negative_min_length_clamps_to_zero() {
        let (top, warnings) = parse(&json!({"type": "string", "minLength": -5})).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ParserWarning::NegativeUnsignedClamped { .. }));
        let SchemaNode::TopLevel(t) = top else { panic!() };
        let SchemaNode::String(_, fields) = *t.root else { panic!() };
        assert_eq!(fields.min_length, Some(0));
    }

    #[test]
    fn non_integer_max_items_rounds_half_away_from_zero() {
        let (top, warnings) = parse(&json!({"type": "array", "maxItems": 2.5})).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ParserWarning::UnsignedRounded { .. }));
        let SchemaNode::TopLevel(t) = top else { panic!() };
        let SchemaNode::Array(_, fields) = *t.root else { panic!() };
        assert_eq!(fields.max_items, Some(3));
    }

    #[test]
    fn empty_required_array_is_a_hard_error() {
        let err = parse(&json!({"type": "object", "required": []}));
        assert!(matches!(err, Err(ParserError::RequiresAtLeastOneItem { .. })));
    }

    #[test]
    fn dollar_ref_parses_as_reference_node() {
        let (top, _) = parse(&json!({"$ref": "#/definitions/node"})).unwrap();
        let SchemaNode::TopLevel(t) = top else { panic!() };
        assert!(matches!(*t.root, SchemaNode::Reference(_)));
    }

    #[test]
    fn boolean_schema_parses_directly() {
        let (top, _) = parse(&json!(false)).unwrap();
        let SchemaNode::TopLevel(t) = top else { panic!() };
        assert!(matches!(*t.root, SchemaNode::BooleanValue(false)));
    }
}
