//! Lowers a [`SchemaNode`] tree into the validator algebra (spec §4.H).
//!
//! Cyclic schemas are resolved in two passes: every `$ref` lowers first into
//! a placeholder [`ReferenceValidator`](crate::validator::ReferenceValidator),
//! and only after the whole tree has been walked once are those placeholders
//! patched with their real targets — by which point every target has
//! necessarily been lowered at least once itself.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

use super::ast::{ArrayFields, CommonFields, ItemsSpec, NumberFields, ObjectFields, ReferencePath, SchemaNode, StringFields};
use crate::loader::{LoaderError, ResourceLoader, SchemaCache};
use crate::validator::json_array::ItemsMode;
use crate::validator::json_object_schema::Dependency;
use crate::validator::{
    CompoundValidator, JsonArrayValidator, JsonObjectSchemaValidator, JsonObjectValidator, NumberValidator,
    ReferenceValidator, StringValidator, VRef, Validator, ValueSetValidator, ValueValidator,
};
use crate::value::ValueKind;

use super::parser::ParserError;

#[derive(Debug, Error)]
pub enum LoweringError {
    #[error("'$ref' target '{0}' does not exist in this document")]
    DanglingReference(String),
    #[error("'$ref' to an external resource requires a loader to be configured")]
    NoLoaderConfigured,
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

struct PendingRef {
    path: ReferencePath,
    placeholder: VRef,
    resolved: Cell<bool>,
}

/// Per-lowering-pass state: the reference placeholder table plus, if
/// configured, a loader for resolving external `$ref`s.
pub struct LoweringContext<'a> {
    document_root: &'a SchemaNode,
    loader: Option<(&'a dyn ResourceLoader, &'a SchemaCache)>,
    pending: RefCell<IndexMap<String, PendingRef>>,
}

impl<'a> LoweringContext<'a> {
    fn new(document_root: &'a SchemaNode, loader: Option<(&'a dyn ResourceLoader, &'a SchemaCache)>) -> Self {
        Self {
            document_root,
            loader,
            pending: RefCell::new(IndexMap::new()),
        }
    }
}

/// Lowers a parsed schema document into a single validator, resolving every
/// internal `$ref` (and, if a loader is given, every external one too).
#[tracing::instrument(skip_all)]
pub fn lower_document(
    document: &SchemaNode,
    loader: Option<(&dyn ResourceLoader, &SchemaCache)>,
) -> Result<VRef, LoweringError> {
    // `document_root` stays the `TopLevel` wrapper itself (not its inner
    // `root`) so `node_for_path` can still see the document's top-level
    // `definitions` when resolving a `$ref` whose own root is, say, a bare
    // `$ref` with ignored keyword siblings.
    let ctx = LoweringContext::new(document, loader);
    let v = lower_node(document, &ctx)?;
    resolve_pending(&ctx)?;
    Ok(v)
}

fn resolve_pending(ctx: &LoweringContext) -> Result<(), LoweringError> {
    loop {
        let todo: Vec<(String, ReferencePath, VRef)> = ctx
            .pending
            .borrow()
            .iter()
            .filter(|(_, entry)| !entry.resolved.get())
            .map(|(key, entry)| (key.clone(), entry.path.clone(), entry.placeholder.clone()))
            .collect();
        if todo.is_empty() {
            return Ok(());
        }
        for (key, path, placeholder) in todo {
            let target_node = ctx
                .document_root
                .node_for_path(&path.components)
                .ok_or_else(|| LoweringError::DanglingReference(key.clone()))?;
            let target_vref = lower_node(target_node, ctx)?;
            if let Validator::Reference(rv) = placeholder.as_ref() {
                rv.resolve(target_vref);
            }
            if let Some(entry) = ctx.pending.borrow().get(&key) {
                entry.resolved.set(true);
            }
        }
    }
}

fn lower_node(node: &SchemaNode, ctx: &LoweringContext) -> Result<VRef, LoweringError> {
    match node {
        SchemaNode::BooleanValue(true) => Ok(Arc::new(Validator::AlwaysPass)),
        SchemaNode::BooleanValue(false) => Ok(Arc::new(Validator::AlwaysFail)),
        SchemaNode::TopLevel(top) => lower_node(&top.root, ctx),
        SchemaNode::Reference(path) => lower_reference(path, ctx),
        SchemaNode::Generic(common) => lower_common_and_typed(common, None, ctx),
        SchemaNode::Number(common, fields) => {
            lower_common_and_typed(common, Some(TypedFields::Number(fields)), ctx)
        }
        SchemaNode::String(common, fields) => {
            lower_common_and_typed(common, Some(TypedFields::String(fields)), ctx)
        }
        SchemaNode::Array(common, fields) => {
            lower_common_and_typed(common, Some(TypedFields::Array(fields)), ctx)
        }
        SchemaNode::Object(common, fields) => {
            lower_common_and_typed(common, Some(TypedFields::Object(fields)), ctx)
        }
        SchemaNode::Ambiguous(common, types) => {
            // `Any` admits every kind, so its presence collapses the whole
            // union to an unconditional pass regardless of what else is listed.
            let typed: VRef = if types.contains(&super::ast::TypeKeyword::Any) {
                Arc::new(Validator::AlwaysPass)
            } else {
                let branches: Vec<VRef> = types
                    .iter()
                    .flat_map(|t| kind_check_branches(*t))
                    .collect();
                Arc::new(Validator::Compound(CompoundValidator::or(branches)))
            };
            lower_common_and_typed(common, Some(TypedFields::Prebuilt(typed)), ctx)
        }
        SchemaNode::NamedProperty { .. } | SchemaNode::PatternProperty { .. } | SchemaNode::Dependency(_) => {
            unreachable!("named properties, pattern properties, and dependencies are lowered inline by object lowering")
        }
    }
}

enum TypedFields<'a> {
    Number(&'a NumberFields),
    String(&'a StringFields),
    Array(&'a ArrayFields),
    Object(&'a ObjectFields),
    Prebuilt(VRef),
}

fn type_keyword_to_value_kind(t: super::ast::TypeKeyword) -> ValueKind {
    use super::ast::TypeKeyword;
    match t {
        TypeKeyword::Any => unreachable!("callers filter out Any before mapping to a ValueKind"),
        TypeKeyword::Array => ValueKind::Array,
        TypeKeyword::Boolean => ValueKind::Boolean,
        TypeKeyword::Integer => ValueKind::Integer,
        TypeKeyword::Null => ValueKind::Null,
        TypeKeyword::Number => ValueKind::Float,
        TypeKeyword::Object => ValueKind::Object,
        TypeKeyword::String => ValueKind::String,
    }
}

/// The bare-kind checks that accept an instance of type keyword `t`. Plural
/// because `"number"` covers both JSON integers and floats — a single exact
/// `Float` check would wrongly reject an integer under a `"number"` branch
/// of an ambiguous `type` union.
fn kind_check_branches(t: super::ast::TypeKeyword) -> Vec<VRef> {
    use super::ast::TypeKeyword;
    if t == TypeKeyword::Number {
        return vec![
            Arc::new(Validator::Value(ValueValidator::expect(ValueKind::Integer))),
            Arc::new(Validator::Value(ValueValidator::expect(ValueKind::Float))),
        ];
    }
    vec![Arc::new(Validator::Value(ValueValidator::expect(type_keyword_to_value_kind(t))))]
}

fn lower_common_and_typed(
    common: &CommonFields,
    typed: Option<TypedFields>,
    ctx: &LoweringContext,
) -> Result<VRef, LoweringError> {
    let mut common_parts: Vec<VRef> = Vec::new();

    if let Some(values) = &common.enum_values {
        common_parts.push(Arc::new(Validator::ValueSet(ValueSetValidator::new(values.clone()))));
    }
    if !common.all_of.is_empty() {
        let subs = common.all_of.iter().map(|n| lower_node(n, ctx)).collect::<Result<Vec<_>, _>>()?;
        common_parts.push(Arc::new(Validator::Compound(CompoundValidator::and(subs))));
    }
    if !common.any_of.is_empty() {
        let subs = common.any_of.iter().map(|n| lower_node(n, ctx)).collect::<Result<Vec<_>, _>>()?;
        common_parts.push(Arc::new(Validator::Compound(CompoundValidator::or(subs))));
    }
    if !common.one_of.is_empty() {
        let subs = common.one_of.iter().map(|n| lower_node(n, ctx)).collect::<Result<Vec<_>, _>>()?;
        common_parts.push(Arc::new(Validator::Compound(CompoundValidator::mutual_exclusion(subs))));
    }
    if let Some(not_node) = &common.not {
        let sub = lower_node(not_node, ctx)?;
        common_parts.push(Arc::new(Validator::Compound(CompoundValidator::not(sub))));
    }

    let common_validator: VRef = if common_parts.is_empty() {
        Arc::new(Validator::AlwaysPass)
    } else {
        Arc::new(Validator::Compound(CompoundValidator::and(common_parts)))
    };

    let (typed_validator, explicit_kind): (VRef, Option<ValueKind>) = match typed {
        None => {
            let kind = single_explicit_kind(common);
            let validator = match kind {
                Some(k) => Arc::new(Validator::Value(ValueValidator::expect(k))),
                None => Arc::new(Validator::AlwaysPass),
            };
            (validator, kind)
        }
        Some(TypedFields::Number(fields)) => (lower_number(fields), Some(ValueKind::Float)),
        Some(TypedFields::String(fields)) => (lower_string(fields)?, Some(ValueKind::String)),
        Some(TypedFields::Array(fields)) => (lower_array(fields, ctx)?, Some(ValueKind::Array)),
        Some(TypedFields::Object(fields)) => (lower_object(fields, ctx)?, Some(ValueKind::Object)),
        Some(TypedFields::Prebuilt(v)) => (v, None),
    };

    // `type` numeric kind covers both Integer and Float instances.
    let typed_validator = if !common.type_is_explicit {
        match explicit_kind {
            Some(kind) => {
                let is_kind = Arc::new(Validator::Value(ValueValidator::expect(kind)));
                let guard = Arc::new(Validator::Compound(CompoundValidator::not(is_kind)));
                Arc::new(Validator::Compound(CompoundValidator::or(vec![guard, typed_validator])))
            }
            None => typed_validator,
        }
    } else {
        typed_validator
    };

    Ok(Arc::new(Validator::JsonObject(JsonObjectValidator::new(common_validator, typed_validator))))
}

/// For a `Generic` node (no type-specific fields) with exactly one declared
/// non-`any` type, the only check left to make is the bare kind.
fn single_explicit_kind(common: &CommonFields) -> Option<ValueKind> {
    let mut kinds = common.valid_types.iter().filter(|t| **t != super::ast::TypeKeyword::Any);
    let first = kinds.next()?;
    if kinds.next().is_some() {
        return None;
    }
    Some(type_keyword_to_value_kind(*first))
}

fn lower_number(fields: &NumberFields) -> VRef {
    let mut v = NumberValidator::new();
    if fields.requires_integer {
        v = v.requires_integer();
    }
    if let Some(m) = fields.multiple_of {
        v = v.multiple_of(m);
    }
    if let Some(min) = fields.minimum {
        v = v.min(min, fields.exclusive_minimum);
    }
    if let Some(max) = fields.maximum {
        v = v.max(max, fields.exclusive_maximum);
    }
    Arc::new(Validator::Number(v))
}

fn lower_string(fields: &StringFields) -> Result<VRef, LoweringError> {
    let mut v = StringValidator::new();
    if let Some(min) = fields.min_length {
        v = v.min_len(min);
    }
    if let Some(max) = fields.max_length {
        v = v.max_len(max);
    }
    if let Some(pattern) = &fields.pattern {
        let regex = Regex::new(pattern).expect("the parser only keeps patterns that compiled");
        v = v.with_pattern(regex);
    }
    Ok(Arc::new(Validator::String(v)))
}

fn lower_array(fields: &ArrayFields, ctx: &LoweringContext) -> Result<VRef, LoweringError> {
    let mut v = JsonArrayValidator::new().with_bounds(fields.min_items, fields.max_items);
    if fields.unique_items {
        v = v.with_unique_items();
    }
    if let Some(items) = &fields.items {
        let mode = match items {
            ItemsSpec::Single(node) => ItemsMode::Single(lower_node(node, ctx)?),
            ItemsSpec::Positional(nodes) => {
                let schemas = nodes.iter().map(|n| lower_node(n, ctx)).collect::<Result<Vec<_>, _>>()?;
                let tail = lower_node(&fields.additional_items, ctx)?;
                ItemsMode::Positional { schemas, tail }
            }
        };
        v = v.with_items(mode);
    }
    Ok(Arc::new(Validator::JsonArray(v)))
}

fn lower_object(fields: &ObjectFields, ctx: &LoweringContext) -> Result<VRef, LoweringError> {
    let additional_properties = lower_node(&fields.additional_properties, ctx)?;
    let mut v = JsonObjectSchemaValidator::new(additional_properties);
    v.min_properties = fields.min_properties;
    v.max_properties = fields.max_properties;
    v.required = fields.required.clone();

    for prop in &fields.properties {
        let SchemaNode::NamedProperty { key, schema } = prop else {
            unreachable!("ObjectFields::properties only ever holds NamedProperty nodes")
        };
        v.properties.push((key.clone(), lower_node(schema, ctx)?));
    }

    for prop in &fields.pattern_properties {
        let SchemaNode::PatternProperty { pattern, schema } = prop else {
            unreachable!("ObjectFields::pattern_properties only ever holds PatternProperty nodes")
        };
        let regex = Regex::new(pattern).expect("the parser drops patterns that fail to compile");
        v.pattern_properties
            .push((crate::validator::string::PatternConstraint(regex), lower_node(schema, ctx)?));
    }

    for dep in &fields.dependencies {
        let SchemaNode::Dependency(d) = dep else {
            unreachable!("ObjectFields::dependencies only ever holds Dependency nodes")
        };
        v.dependencies.push(match d {
            super::ast::DependencyNode::Property { key, requires } => Dependency::Property {
                key: key.clone(),
                requires: requires.clone(),
            },
            super::ast::DependencyNode::Schema { key, schema } => Dependency::Schema {
                key: key.clone(),
                schema: lower_node(schema, ctx)?,
            },
        });
    }

    Ok(Arc::new(Validator::JsonObjectSchema(v)))
}

fn lower_reference(path: &ReferencePath, ctx: &LoweringContext) -> Result<VRef, LoweringError> {
    if path.external.is_some() {
        return lower_external_reference(path, ctx);
    }

    let key = path.canonical_key();
    if let Some(entry) = ctx.pending.borrow().get(&key) {
        return Ok(entry.placeholder.clone());
    }
    let placeholder: VRef = Arc::new(Validator::Reference(ReferenceValidator::unresolved(key.clone())));
    ctx.pending.borrow_mut().insert(
        key,
        PendingRef {
            path: path.clone(),
            placeholder: placeholder.clone(),
            resolved: Cell::new(false),
        },
    );
    Ok(placeholder)
}

/// External references are resolved eagerly, in a fresh nested lowering
/// pass scoped to the loaded document: a `$ref` inside an external schema
/// must navigate relative to *that* document's root, not the one that
/// referenced it.
fn lower_external_reference(path: &ReferencePath, ctx: &LoweringContext) -> Result<VRef, LoweringError> {
    let (loader, cache) = ctx.loader.ok_or(LoweringError::NoLoaderConfigured)?;
    let external = path.external.as_ref().expect("checked by caller");
    let doc = cache.get_or_load(external, loader, |value| {
        super::parser::parse(value)
            .map(|(node, _warnings)| node)
            .map_err(|e| LoaderError::InvalidSchema {
                path: external.clone(),
                message: e.to_string(),
            })
    })?;

    let target = doc
        .node_for_path(&path.components)
        .ok_or_else(|| LoweringError::DanglingReference(path.canonical_key()))?;

    // Scoped to `doc` itself (not its unwrapped root) so a `definitions`
    // sibling of a document-root `$ref` stays navigable, same as the
    // top-level document's own lowering pass.
    let nested_ctx = LoweringContext::new(doc.as_ref(), ctx.loader);
    let v = lower_node(target, &nested_ctx)?;
    resolve_pending(&nested_ctx)?;
    Ok(v)
}
