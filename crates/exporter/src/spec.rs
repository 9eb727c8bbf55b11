//! Named component specs: themeable JSON templates with per-theme overrides.

use crate::error::{ExporterError, Result};
use crate::template::{TemplateNode, TokenValues};
use serde_json::Value;
use std::collections::HashMap;

/// Persistence collaborator for per-theme spec customizations.
///
/// Keys are `(component kind, spec name, theme name)`; the engine owns the
/// validation, the store owns the bytes.
pub trait SpecStore {
    /// Fetches the stored override, if any.
    fn get(&self, kind: &str, spec: &str, theme: &str) -> Option<Value>;
    /// Stores an override; returns true if the stored value changed.
    fn set(&mut self, kind: &str, spec: &str, theme: &str, value: Value) -> bool;
    /// Removes an override; returns true if one existed.
    fn delete(&mut self, kind: &str, spec: &str, theme: &str) -> bool;
}

/// In-memory spec store for tests and embedding hosts without persistence.
#[derive(Debug, Default)]
pub struct MemorySpecStore {
    entries: HashMap<(String, String, String), Value>,
}

impl MemorySpecStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpecStore for MemorySpecStore {
    fn get(&self, kind: &str, spec: &str, theme: &str) -> Option<Value> {
        self.entries
            .get(&(kind.to_string(), spec.to_string(), theme.to_string()))
            .cloned()
    }

    fn set(&mut self, kind: &str, spec: &str, theme: &str, value: Value) -> bool {
        let key = (kind.to_string(), spec.to_string(), theme.to_string());
        match self.entries.get(&key) {
            Some(existing) if *existing == value => false,
            _ => {
                self.entries.insert(key, value);
                true
            }
        }
    }

    fn delete(&mut self, kind: &str, spec: &str, theme: &str) -> bool {
        self.entries
            .remove(&(kind.to_string(), spec.to_string(), theme.to_string()))
            .is_some()
    }
}

/// Last-mile mutation hook for substituted component JSON, keyed by the
/// owning component kind. Injected into the compile context; the default
/// implementation passes values through untouched.
pub trait SpecPostProcessor {
    /// Processes the substituted JSON for one component build.
    fn process(&self, component_kind: &str, json: Value, content_id: &str) -> Value;
}

/// The do-nothing post-processor.
#[derive(Debug, Default)]
pub struct NoopPostProcessor;

impl SpecPostProcessor for NoopPostProcessor {
    fn process(&self, _component_kind: &str, json: Value, _content_id: &str) -> Value {
        json
    }
}

/// A named, overridable template owned by one component kind.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    /// The component kind this spec belongs to.
    pub component_kind: String,
    /// The spec name, unique within the owning kind.
    pub name: String,
    /// Human-readable label for customization UIs.
    pub label: String,
    /// The default template.
    pub template: TemplateNode,
    /// The parent kind when the owner was built as a subcomponent.
    pub parent_kind: Option<String>,
}

impl ComponentSpec {
    /// Creates a spec from a JSON template definition.
    pub fn new(
        component_kind: &str,
        name: &str,
        label: &str,
        template: &Value,
        parent_kind: Option<&str>,
    ) -> Self {
        Self {
            component_kind: component_kind.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            template: TemplateNode::from_value(template),
            parent_kind: parent_kind.map(str::to_string),
        }
    }

    /// The name this spec is stored and keyed under: subcomponent specs are
    /// namespaced as `<parentKind>-subcomponent-<name>`.
    pub fn store_name(&self) -> String {
        match &self.parent_kind {
            Some(parent) => format!("{parent}-subcomponent-{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Substitutes values against the active template.
    ///
    /// A non-empty theme customization replaces the default template
    /// wholesale; missing token values stay as literal token text.
    pub fn substitute(&self, values: &TokenValues, customization: Option<&Value>) -> Value {
        let active = match customization {
            Some(custom) if !custom.is_null() => TemplateNode::from_value(custom),
            _ => self.template.clone(),
        };
        active.substitute(values)
    }

    /// Persists a customization for the given theme.
    ///
    /// The raw value must parse as JSON and may only use tokens the default
    /// template declares. Returns whether the stored value changed; a value
    /// equal to the default clears the override instead of storing a copy.
    pub fn save(&self, raw: &str, theme: &str, store: &mut dyn SpecStore) -> Result<bool> {
        let value: Value = serde_json::from_str(raw)?;
        let allowed = self.template.tokens();
        let supplied = TemplateNode::from_value(&value).tokens();
        if let Some(unknown) = supplied.difference(&allowed).next() {
            return Err(ExporterError::InvalidCustomization(format!(
                "token {unknown} is not defined by the `{}` spec",
                self.name
            )));
        }

        if value == self.template.to_value() {
            return Ok(self.delete(theme, store));
        }
        Ok(store.set(&self.component_kind, &self.store_name(), theme, value))
    }

    /// Removes the customization for the given theme, returning whether one
    /// existed.
    pub fn delete(&self, theme: &str, store: &mut dyn SpecStore) -> bool {
        store.delete(&self.component_kind, &self.store_name(), theme)
    }

    /// Returns true if a customization is stored for the given theme.
    pub fn is_customized(&self, theme: &str, store: &dyn SpecStore) -> bool {
        store
            .get(&self.component_kind, &self.store_name(), theme)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_spec() -> ComponentSpec {
        ComponentSpec::new(
            "img",
            "json",
            "JSON",
            &json!({ "role": "photo", "URL": "#url#" }),
            None,
        )
    }

    #[test]
    fn substitutes_against_default_template() {
        let spec = image_spec();
        let mut values = TokenValues::new();
        values.insert("#url#".into(), json!("https://example.com/a.jpg"));
        let out = spec.substitute(&values, None);
        assert_eq!(out["URL"], json!("https://example.com/a.jpg"));
        assert_eq!(out["role"], json!("photo"));
    }

    #[test]
    fn customization_replaces_template_and_delete_restores_it() {
        let spec = image_spec();
        let mut store = MemorySpecStore::new();
        let changed = spec
            .save(r##"{ "role": "image", "URL": "#url#" }"##, "default", &mut store)
            .expect("valid customization");
        assert!(changed);
        assert!(spec.is_customized("default", &store));

        let custom = store.get("img", "json", "default");
        let out = spec.substitute(&TokenValues::new(), custom.as_ref());
        assert_eq!(out["role"], json!("image"));

        assert!(spec.delete("default", &mut store));
        assert!(!spec.is_customized("default", &store));
        let out = spec.substitute(&TokenValues::new(), None);
        assert_eq!(out["role"], json!("photo"));
    }

    #[test]
    fn rejects_customization_with_foreign_tokens() {
        let spec = image_spec();
        let mut store = MemorySpecStore::new();
        let err = spec
            .save(r##"{ "URL": "#other#" }"##, "default", &mut store)
            .expect_err("foreign token must be rejected");
        assert!(matches!(err, ExporterError::InvalidCustomization(_)));
    }

    #[test]
    fn saving_the_default_clears_the_override() {
        let spec = image_spec();
        let mut store = MemorySpecStore::new();
        spec.save(r##"{ "role": "image", "URL": "#url#" }"##, "default", &mut store)
            .expect("valid customization");
        let changed = spec
            .save(r##"{ "role": "photo", "URL": "#url#" }"##, "default", &mut store)
            .expect("default value accepted");
        assert!(changed);
        assert!(!spec.is_customized("default", &store));
    }

    #[test]
    fn subcomponent_specs_namespace_their_store_name() {
        let spec = ComponentSpec::new("body", "json", "JSON", &json!({}), Some("aside"));
        assert_eq!(spec.store_name(), "aside-subcomponent-json");
        let top = image_spec();
        assert_eq!(top.store_name(), "json");
    }
}
