//! Template trees, token substitution, and pruning of unresolved branches.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Values supplied for token substitution, keyed by the full token text
/// (e.g. `"#url#"`).
pub type TokenValues = BTreeMap<String, Value>;

/// Returns true if the string is a placeholder token: fully delimited by `#`
/// with a non-empty, `#`-free name between the markers.
pub fn is_token(value: &str) -> bool {
    value.len() > 2
        && value.starts_with('#')
        && value.ends_with('#')
        && !value[1..value.len() - 1].contains('#')
}

/// An immutable template tree.
///
/// Templates are JSON skeletons in which any string scalar that looks like a
/// token becomes a substitution point. Substitution produces a fresh
/// `serde_json::Value`, leaving the template reusable across builds.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// A literal JSON scalar.
    Scalar(Value),
    /// A placeholder, stored as the full token text.
    Token(String),
    /// An ordered list of child templates.
    List(Vec<TemplateNode>),
    /// An object of named child templates, in source order.
    Map(Vec<(String, TemplateNode)>),
}

impl TemplateNode {
    /// Builds a template tree from a JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if is_token(s) => TemplateNode::Token(s.clone()),
            Value::Array(items) => {
                TemplateNode::List(items.iter().map(TemplateNode::from_value).collect())
            }
            Value::Object(map) => TemplateNode::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), TemplateNode::from_value(v)))
                    .collect(),
            ),
            other => TemplateNode::Scalar(other.clone()),
        }
    }

    /// Renders the template back to JSON with tokens as their literal text.
    pub fn to_value(&self) -> Value {
        self.substitute(&TokenValues::new())
    }

    /// Substitutes token values through the tree, producing a new JSON value.
    ///
    /// Tokens with no supplied value render as their own literal text; the
    /// pruning pass relies on that marker to drop unresolved branches.
    pub fn substitute(&self, values: &TokenValues) -> Value {
        match self {
            TemplateNode::Scalar(v) => v.clone(),
            TemplateNode::Token(token) => values
                .get(token)
                .cloned()
                .unwrap_or_else(|| Value::String(token.clone())),
            TemplateNode::List(items) => {
                Value::Array(items.iter().map(|item| item.substitute(values)).collect())
            }
            TemplateNode::Map(entries) => {
                let mut map = Map::new();
                for (key, child) in entries {
                    map.insert(key.clone(), child.substitute(values));
                }
                Value::Object(map)
            }
        }
    }

    /// Every token named anywhere in the template.
    pub fn tokens(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_tokens(&mut out);
        out
    }

    /// Returns a copy of the template with the given top-level entries set,
    /// replacing existing entries of the same name. Non-map templates are
    /// returned unchanged.
    pub fn with_entries(&self, extra: &[(&str, Value)]) -> TemplateNode {
        match self {
            TemplateNode::Map(entries) => {
                let mut merged: Vec<(String, TemplateNode)> = entries
                    .iter()
                    .filter(|(k, _)| !extra.iter().any(|(name, _)| name == k))
                    .cloned()
                    .collect();
                for (name, value) in extra {
                    merged.push((name.to_string(), TemplateNode::from_value(value)));
                }
                TemplateNode::Map(merged)
            }
            other => other.clone(),
        }
    }

    fn collect_tokens(&self, out: &mut BTreeSet<String>) {
        match self {
            TemplateNode::Token(token) => {
                out.insert(token.clone());
            }
            TemplateNode::List(items) => {
                for item in items {
                    item.collect_tokens(out);
                }
            }
            TemplateNode::Map(entries) => {
                for (_, child) in entries {
                    child.collect_tokens(out);
                }
            }
            TemplateNode::Scalar(_) => {}
        }
    }
}

/// Removes objects still containing unresolved tokens from substituted JSON.
///
/// Children are processed first. A string child that still equals its own
/// token text poisons the whole containing object or array, which collapses
/// to `None`; collapsed children are dropped from their parent, and arrays
/// are re-indexed by the removal. A top-level `None` means the value
/// contributes nothing and the caller must omit it.
pub fn prune_unresolved(value: &Value) -> Option<Value> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::new();
            for item in items {
                match item {
                    Value::Array(_) | Value::Object(_) => {
                        if let Some(kept) = prune_unresolved(item) {
                            out.push(kept);
                        }
                    }
                    Value::String(s) if is_token(s) => return None,
                    other => out.push(other.clone()),
                }
            }
            Some(Value::Array(out))
        }
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                match child {
                    Value::Array(_) | Value::Object(_) => {
                        if let Some(kept) = prune_unresolved(child) {
                            out.insert(key.clone(), kept);
                        }
                    }
                    Value::String(s) if is_token(s) => return None,
                    other => {
                        out.insert(key.clone(), other.clone());
                    }
                }
            }
            Some(Value::Object(out))
        }
        Value::String(s) if is_token(s) => None,
        other => Some(other.clone()),
    }
}
