//! Deduplicated registries for layouts, text styles, and component styles.

use serde_json::{Map, Value};

/// An ordered, idempotent key-to-JSON registry.
///
/// Components register finalized style and layout objects here and keep only
/// the derived key in their own output, which deduplicates identical objects
/// across the final document. Registering an existing key overwrites it in
/// place; insertion order is preserved.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: Vec<(String, Value)>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a finalized object under the given key.
    pub fn register(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Fetches the object registered under the key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Registered keys in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Renders the registry as a JSON object for document assembly.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_is_idempotent_by_key() {
        let mut registry = StyleRegistry::new();
        registry.register("default-body", json!({ "fontSize": 16 }));
        registry.register("default-body", json!({ "fontSize": 18 }));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("default-body"),
            Some(&json!({ "fontSize": 18 }))
        );
    }

    #[test]
    fn preserves_insertion_order() {
        let mut registry = StyleRegistry::new();
        registry.register("b", json!(1));
        registry.register("a", json!(2));
        assert_eq!(registry.keys(), vec!["b", "a"]);
    }

    #[test]
    fn to_json_keeps_insertion_order() {
        let mut registry = StyleRegistry::new();
        registry.register("title-layout", json!({ "margin": 10 }));
        registry.register("body-layout", json!({ "margin": 24 }));
        let json = registry.to_json();
        let keys: Vec<String> = json
            .as_object()
            .expect("registry object")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["title-layout", "body-layout"]);
    }
}
