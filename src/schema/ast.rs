//! The schema AST (spec §3.4/§4.E): built bottom-up by the parser, frozen,
//! then handed to the lowering visitor.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::validator::VRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKeyword {
    Any,
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl TypeKeyword {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "any" => Some(TypeKeyword::Any),
            "array" => Some(TypeKeyword::Array),
            "boolean" => Some(TypeKeyword::Boolean),
            "integer" => Some(TypeKeyword::Integer),
            "null" => Some(TypeKeyword::Null),
            "number" => Some(TypeKeyword::Number),
            "object" => Some(TypeKeyword::Object),
            "string" => Some(TypeKeyword::String),
            _ => None,
        }
    }
}

/// Fields every node variant carries, independent of `type`.
#[derive(Debug, Clone, Default)]
pub struct CommonFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub type_is_explicit: bool,
    pub valid_types: BTreeSet<TypeKeyword>,
    pub enum_values: Option<Vec<Value>>,
    pub all_of: Vec<SchemaNode>,
    pub any_of: Vec<SchemaNode>,
    pub one_of: Vec<SchemaNode>,
    pub not: Option<Box<SchemaNode>>,
    pub definitions: IndexMap<String, SchemaNode>,
}

#[derive(Debug, Clone, Default)]
pub struct NumberFields {
    pub multiple_of: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub requires_integer: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StringFields {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// `None` when the keyword was absent, or present but failed to compile
    /// as a regex (warning 2: dropped, always-passing for that keyword).
    pub pattern: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ItemsSpec {
    Single(Box<SchemaNode>),
    Positional(Vec<SchemaNode>),
}

#[derive(Debug, Clone)]
pub struct ArrayFields {
    pub items: Option<ItemsSpec>,
    pub additional_items: Box<SchemaNode>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
}

#[derive(Debug, Clone)]
pub struct ObjectFields {
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub required: Vec<String>,
    /// Each a `SchemaNode::NamedProperty`.
    pub properties: Vec<SchemaNode>,
    /// Each a `SchemaNode::PatternProperty`.
    pub pattern_properties: Vec<SchemaNode>,
    pub additional_properties: Box<SchemaNode>,
    /// Each a `SchemaNode::Dependency`.
    pub dependencies: Vec<SchemaNode>,
}

/// A parsed `$ref` target: optional external-resource key plus the
/// JSON-pointer path components inside that document (spec §6.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencePath {
    pub external: Option<String>,
    pub components: Vec<String>,
}

impl ReferencePath {
    /// A canonical string key for this path, used to index the top-level
    /// reference table and the remote-loader cache.
    pub fn canonical_key(&self) -> String {
        let pointer = if self.components.is_empty() {
            String::new()
        } else {
            format!("/{}", self.components.join("/"))
        };
        match &self.external {
            Some(ext) => format!("{}#{}", ext, pointer),
            None => format!("#{}", pointer),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DependencyNode {
    Property { key: String, requires: Vec<String> },
    Schema { key: String, schema: Box<SchemaNode> },
}

#[derive(Debug, Clone)]
pub struct TopLevelNode {
    pub root: Box<SchemaNode>,
    /// The document's top-level `definitions`, kept here (not only inside
    /// `root`'s own `CommonFields`) so `#/definitions/...` still resolves
    /// even when the root schema is itself a `$ref` — draft-04 lets a
    /// `$ref` schema ignore its keyword siblings for validation, but the
    /// document's pointer structure is still navigable.
    pub definitions: IndexMap<String, SchemaNode>,
    /// Every reference discovered in the subtree, keyed by
    /// `ReferencePath::canonical_key()`, resolved during lowering.
    pub references: IndexMap<String, Arc<OnceLock<VRef>>>,
}

#[derive(Debug, Clone)]
pub enum SchemaNode {
    Generic(CommonFields),
    Number(CommonFields, NumberFields),
    String(CommonFields, StringFields),
    Array(CommonFields, ArrayFields),
    Object(CommonFields, ObjectFields),
    /// `type` admitted multiple incompatible families; evaluation forks on
    /// the instance's runtime type.
    Ambiguous(CommonFields, BTreeSet<TypeKeyword>),
    /// A constant `true`/`false` schema.
    BooleanValue(bool),
    Reference(ReferencePath),
    NamedProperty { key: String, schema: Box<SchemaNode> },
    PatternProperty { pattern: String, schema: Box<SchemaNode> },
    Dependency(DependencyNode),
    TopLevel(TopLevelNode),
}

impl SchemaNode {
    pub fn common(&self) -> Option<&CommonFields> {
        match self {
            SchemaNode::Generic(c)
            | SchemaNode::Number(c, _)
            | SchemaNode::String(c, _)
            | SchemaNode::Array(c, _)
            | SchemaNode::Object(c, _)
            | SchemaNode::Ambiguous(c, _) => Some(c),
            _ => None,
        }
    }

    /// Post-order traversal collecting every `Reference` in this subtree.
    pub fn children_reference_nodes(&self) -> Vec<&ReferencePath> {
        let mut out = Vec::new();
        self.walk_references(&mut out);
        out
    }

    fn walk_references<'a>(&'a self, out: &mut Vec<&'a ReferencePath>) {
        if let Some(common) = self.common() {
            for n in &common.all_of {
                n.walk_references(out);
            }
            for n in &common.any_of {
                n.walk_references(out);
            }
            for n in &common.one_of {
                n.walk_references(out);
            }
            if let Some(n) = &common.not {
                n.walk_references(out);
            }
            for n in common.definitions.values() {
                n.walk_references(out);
            }
        }
        match self {
            SchemaNode::Array(_, fields) => {
                match &fields.items {
                    Some(ItemsSpec::Single(n)) => n.walk_references(out),
                    Some(ItemsSpec::Positional(list)) => {
                        for n in list {
                            n.walk_references(out);
                        }
                    }
                    None => {}
                }
                fields.additional_items.walk_references(out);
            }
            SchemaNode::Object(_, fields) => {
                for n in &fields.properties {
                    n.walk_references(out);
                }
                for n in &fields.pattern_properties {
                    n.walk_references(out);
                }
                fields.additional_properties.walk_references(out);
                for n in &fields.dependencies {
                    n.walk_references(out);
                }
            }
            SchemaNode::NamedProperty { schema, .. } | SchemaNode::PatternProperty { schema, .. } => {
                schema.walk_references(out);
            }
            SchemaNode::Dependency(DependencyNode::Schema { schema, .. }) => {
                schema.walk_references(out);
            }
            SchemaNode::TopLevel(top) => {
                top.root.walk_references(out);
                for n in top.definitions.values() {
                    n.walk_references(out);
                }
            }
            SchemaNode::Reference(r) => out.push(r),
            _ => {}
        }
    }

    /// Resolves a JSON-pointer-style path relative to this node, one
    /// component at a time. Unknown components return `None`.
    pub fn node_for_path(&self, components: &[String]) -> Option<&SchemaNode> {
        let Some((head, rest)) = components.split_first() else {
            return Some(self);
        };

        match self {
            SchemaNode::TopLevel(top) => {
                if head == "definitions" {
                    let (key, rest) = rest.split_first()?;
                    if let Some(def) = top.definitions.get(key) {
                        return def.node_for_path(rest);
                    }
                }
                top.root.node_for_path(components)
            }
            _ => {
                if head == "definitions" {
                    let (key, rest) = rest.split_first()?;
                    let def = self.common()?.definitions.get(key)?;
                    return def.node_for_path(rest);
                }
                if head == "not" {
                    return self.common()?.not.as_deref()?.node_for_path(rest);
                }
                if head == "allOf" {
                    let (idx, rest) = rest.split_first()?;
                    return self.common()?.all_of.get(idx.parse::<usize>().ok()?)?.node_for_path(rest);
                }
                if head == "anyOf" {
                    let (idx, rest) = rest.split_first()?;
                    return self.common()?.any_of.get(idx.parse::<usize>().ok()?)?.node_for_path(rest);
                }
                if head == "oneOf" {
                    let (idx, rest) = rest.split_first()?;
                    return self.common()?.one_of.get(idx.parse::<usize>().ok()?)?.node_for_path(rest);
                }
                match self {
                    SchemaNode::Array(_, fields) if head == "items" => match &fields.items {
                        Some(ItemsSpec::Single(n)) => n.node_for_path(rest),
                        Some(ItemsSpec::Positional(list)) => {
                            let (idx, rest) = rest.split_first()?;
                            list.get(idx.parse::<usize>().ok()?)?.node_for_path(rest)
                        }
                        None => None,
                    },
                    SchemaNode::Array(_, fields) if head == "additionalItems" => {
                        fields.additional_items.node_for_path(rest)
                    }
                    SchemaNode::Object(_, fields) if head == "properties" => {
                        let (key, rest) = rest.split_first()?;
                        fields
                            .properties
                            .iter()
                            .find_map(|n| match n {
                                SchemaNode::NamedProperty { key: k, schema } if k == key => {
                                    Some(schema.node_for_path(rest))
                                }
                                _ => None,
                            })
                            .flatten()
                    }
                    SchemaNode::Object(_, fields) if head == "patternProperties" => {
                        let (pattern, rest) = rest.split_first()?;
                        fields
                            .pattern_properties
                            .iter()
                            .find_map(|n| match n {
                                SchemaNode::PatternProperty { pattern: p, schema } if p == pattern => {
                                    Some(schema.node_for_path(rest))
                                }
                                _ => None,
                            })
                            .flatten()
                    }
                    SchemaNode::Object(_, fields) if head == "additionalProperties" => {
                        fields.additional_properties.node_for_path(rest)
                    }
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> SchemaNode {
        SchemaNode::Generic(CommonFields::default())
    }

    #[test]
    fn node_for_path_navigates_definitions() {
        let mut defs = IndexMap::new();
        defs.insert("node".to_string(), leaf());
        let root = SchemaNode::Object(
            CommonFields {
                definitions: defs,
                ..Default::default()
            },
            ObjectFields {
                min_properties: None,
                max_properties: None,
                required: vec![],
                properties: vec![],
                pattern_properties: vec![],
                additional_properties: Box::new(SchemaNode::BooleanValue(true)),
                dependencies: vec![],
            },
        );
        let found = root.node_for_path(&["definitions".to_string(), "node".to_string()]);
        assert!(found.is_some());
    }

    #[test]
    fn node_for_path_navigates_named_properties() {
        let root = SchemaNode::Object(
            CommonFields::default(),
            ObjectFields {
                min_properties: None,
                max_properties: None,
                required: vec![],
                properties: vec![SchemaNode::NamedProperty {
                    key: "name".to_string(),
                    schema: Box::new(leaf()),
                }],
                pattern_properties: vec![],
                additional_properties: Box::new(SchemaNode::BooleanValue(true)),
                dependencies: vec![],
            },
        );
        assert!(root
            .node_for_path(&["properties".to_string(), "name".to_string()])
            .is_some());
        assert!(root
            .node_for_path(&["properties".to_string(), "missing".to_string()])
            .is_none());
    }

    #[test]
    fn node_for_path_navigates_allof_by_index() {
        let root = SchemaNode::Generic(CommonFields {
            all_of: vec![
                SchemaNode::Generic(CommonFields {
                    title: Some("first".to_string()),
                    ..Default::default()
                }),
                SchemaNode::Generic(CommonFields {
                    title: Some("second".to_string()),
                    ..Default::default()
                }),
                SchemaNode::Generic(CommonFields {
                    title: Some("third".to_string()),
                    ..Default::default()
                }),
            ],
            ..Default::default()
        });

        let found = root
            .node_for_path(&["allOf".to_string(), "2".to_string()])
            .expect("index 2 should resolve");
        assert_eq!(found.common().unwrap().title.as_deref(), Some("third"));
    }

    #[test]
    fn children_reference_nodes_finds_nested_ref() {
        let root = SchemaNode::Array(
            CommonFields::default(),
            ArrayFields {
                items: Some(ItemsSpec::Single(Box::new(SchemaNode::Reference(ReferencePath {
                    external: None,
                    components: vec!["definitions".to_string(), "node".to_string()],
                })))),
                additional_items: Box::new(SchemaNode::BooleanValue(true)),
                min_items: None,
                max_items: None,
                unique_items: false,
            },
        );
        assert_eq!(root.children_reference_nodes().len(), 1);
    }

    #[test]
    fn reference_path_canonical_key_formats_internal_and_external() {
        let internal = ReferencePath {
            external: None,
            components: vec!["definitions".to_string(), "node".to_string()],
        };
        assert_eq!(internal.canonical_key(), "#/definitions/node");

        let external = ReferencePath {
            external: Some("other.json".to_string()),
            components: vec![],
        };
        assert_eq!(external.canonical_key(), "other.json#");
    }
}
