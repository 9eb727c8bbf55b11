//! The component abstraction: matching, spec registration, and JSON output.

use crate::context::CompileContext;
use crate::spec::ComponentSpec;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Where a component wants to be anchored relative to the body flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPosition {
    /// Not anchored.
    #[default]
    None,
    /// Anchored; side decided by the body orientation.
    Auto,
    /// Anchored to the left rail.
    Left,
    /// Anchored to the right rail.
    Right,
}

/// The outcome of asking a handler whether it claims a markup node.
#[derive(Debug)]
pub enum MatchResult {
    /// The handler does not claim the node.
    NoMatch,
    /// The handler claims the node (possibly a descendant of the offered one).
    Single(MarkupNode),
    /// The node splits into several `(kind, html)` fragments, each to be
    /// built as its own component.
    Fragments(Vec<(String, String)>),
}

/// Static capabilities of a component kind.
#[derive(Debug, Clone, Copy)]
pub struct ComponentCaps {
    /// Other components may anchor to this one.
    pub can_be_anchor_target: bool,
    /// This component compiles child markup into subcomponents.
    pub can_be_parent: bool,
    /// Being anchored requires an explicit anchored layout. Body text flows
    /// around its anchors instead.
    pub needs_layout_if_anchored: bool,
}

impl Default for ComponentCaps {
    fn default() -> Self {
        Self {
            can_be_anchor_target: false,
            can_be_parent: false,
            needs_layout_if_anchored: true,
        }
    }
}

/// Defines one component kind: how it matches markup and how it builds JSON.
///
/// Handlers are stateless; all per-build state lives on the [`Component`]
/// instance and the [`CompileContext`].
pub trait ComponentHandler {
    /// Stable kind identifier, e.g. `"img"` or `"heading"`.
    fn kind(&self) -> &'static str;

    /// Static capabilities of this kind.
    fn caps(&self) -> ComponentCaps {
        ComponentCaps::default()
    }

    /// Decides whether this handler claims the node.
    fn matches(&self, node: &MarkupNode, ctx: &CompileContext) -> MatchResult;

    /// Declares the specs this kind builds from, resolved against the theme.
    fn register_specs(&self, component: &mut Component, theme: &Theme);

    /// Builds the component JSON from its claimed markup.
    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        factory: &crate::factory::ComponentFactory,
    );
}

/// One instance of a component kind, built from a markup fragment.
#[derive(Debug)]
pub struct Component {
    /// The kind identifier of the owning handler.
    pub kind: String,
    /// The markup fragment this component was built from.
    pub raw_markup: String,
    /// The requested anchoring, set during build from alignment markup.
    pub anchor_position: AnchorPosition,
    /// Capabilities copied from the owning handler.
    pub caps: ComponentCaps,
    /// The kind of the parent component, for subcomponents.
    pub parent_kind: Option<String>,
    json: Value,
    uid: Option<String>,
    specs: std::collections::BTreeMap<String, ComponentSpec>,
}

impl Component {
    /// Creates an empty component of the given kind.
    pub fn new(kind: &str, html: &str, parent_kind: Option<&str>, caps: ComponentCaps) -> Self {
        Self {
            kind: kind.to_string(),
            raw_markup: html.to_string(),
            anchor_position: AnchorPosition::None,
            caps,
            parent_kind: parent_kind.map(str::to_string),
            json: Value::Null,
            uid: None,
            specs: std::collections::BTreeMap::new(),
        }
    }

    /// Declares a named spec for this component.
    pub fn register_spec(&mut self, name: &str, label: &str, template: &Value) {
        let spec = ComponentSpec::new(&self.kind, name, label, template, self.parent_kind.as_deref());
        self.specs.insert(name.to_string(), spec);
    }

    /// The declared spec of the given name.
    pub fn spec(&self, name: &str) -> Option<&ComponentSpec> {
        self.specs.get(name)
    }

    /// Names of all declared specs.
    pub fn spec_names(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }

    /// True when this component was built inside a parent component.
    pub fn is_subcomponent(&self) -> bool {
        self.parent_kind.is_some()
    }

    /// Replaces the component JSON by substituting the named spec.
    ///
    /// An unknown spec name is a programming error in the handler; it is
    /// logged and the JSON is left untouched.
    pub fn register_json(&mut self, spec_name: &str, values: &TokenValues, ctx: &CompileContext) {
        match self.specs.get(spec_name) {
            Some(spec) => self.json = ctx.substitute_spec(spec, values),
            None => log::warn!("component `{}` has no spec `{spec_name}`", self.kind),
        }
    }

    /// Sets a single top-level property on the component JSON.
    pub fn set_json(&mut self, property: &str, value: Value) {
        if !self.json.is_object() {
            self.json = Value::Object(Map::new());
        }
        if let Some(map) = self.json.as_object_mut() {
            map.insert(property.to_string(), value);
        }
    }

    /// Reads a top-level property of the component JSON.
    pub fn get_json(&self, property: &str) -> Option<&Value> {
        self.json.get(property)
    }

    /// The whole JSON value as built so far.
    pub fn json_root(&self) -> &Value {
        &self.json
    }

    /// Replaces the whole JSON value, for handlers that post-process their
    /// own output.
    pub fn set_json_root(&mut self, value: Value) {
        self.json = value;
    }

    /// Registers a text style under this component's key for the name and
    /// points `property` at it.
    pub fn register_style(
        &mut self,
        name: &str,
        spec_name: &str,
        values: &TokenValues,
        property: Option<&str>,
        ctx: &mut CompileContext,
    ) {
        let Some(spec) = self.specs.get(spec_name) else {
            log::warn!("component `{}` has no spec `{spec_name}`", self.kind);
            return;
        };
        let style = ctx.substitute_spec(spec, values);
        let key = self.component_object_key(name);
        ctx.text_styles.register(&key, style);
        if let Some(property) = property {
            self.set_json(property, Value::String(key));
        }
    }

    /// Registers a component style under this component's key for the name
    /// and points `property` at it.
    pub fn register_component_style(
        &mut self,
        name: &str,
        spec_name: &str,
        values: &TokenValues,
        property: Option<&str>,
        ctx: &mut CompileContext,
    ) {
        let Some(spec) = self.specs.get(spec_name) else {
            log::warn!("component `{}` has no spec `{spec_name}`", self.kind);
            return;
        };
        let style = ctx.substitute_spec(spec, values);
        let key = self.component_object_key(name);
        ctx.component_styles.register(&key, style);
        if let Some(property) = property {
            self.set_json(property, Value::String(key));
        }
    }

    /// Registers a layout under this component's key for the name and points
    /// `property` at it.
    pub fn register_layout(
        &mut self,
        name: &str,
        spec_name: &str,
        values: &TokenValues,
        property: Option<&str>,
        ctx: &mut CompileContext,
    ) {
        let Some(spec) = self.specs.get(spec_name) else {
            log::warn!("component `{}` has no spec `{spec_name}`", self.kind);
            return;
        };
        let layout = ctx.substitute_spec(spec, values);
        let key = self.component_object_key(name);
        ctx.layouts.register(&key, layout);
        if let Some(property) = property {
            self.set_json(property, Value::String(key));
        }
    }

    /// Registers a layout whose column geometry lines up with the body.
    ///
    /// The column values are hardcoded into the spec before registration so
    /// customizations cannot contradict the body geometry.
    pub fn register_full_width_layout(
        &mut self,
        name: &str,
        spec_name: &str,
        values: &TokenValues,
        property: Option<&str>,
        ctx: &mut CompileContext,
    ) {
        let (start, span) = ctx.theme.full_width_columns();
        if let Some(spec) = self.specs.get_mut(spec_name) {
            spec.template = spec
                .template
                .with_entries(&[("columnStart", json!(start)), ("columnSpan", json!(span))]);
        }
        self.register_layout(name, spec_name, values, property, ctx);
    }

    /// The registry key for a per-component object: subcomponents namespace
    /// their keys under the parent kind.
    pub fn component_object_key(&self, name: &str) -> String {
        match &self.parent_kind {
            Some(parent) => format!("{parent}-subcomponent-{name}"),
            None => name.to_string(),
        }
    }

    /// Resolves a media source through the context's bundling policy.
    pub fn maybe_bundle_source(
        &self,
        source: &str,
        filename: Option<&str>,
        ctx: &mut CompileContext,
    ) -> String {
        ctx.resolve_media(source, filename)
    }

    /// A stable identifier for this component, generated on first use and
    /// written into the output JSON.
    pub fn uid(&mut self) -> String {
        match &self.uid {
            Some(uid) => uid.clone(),
            None => {
                let uid = format!("component-{}", Uuid::new_v4());
                self.uid = Some(uid.clone());
                self.set_json("identifier", Value::String(uid.clone()));
                uid
            }
        }
    }

    /// The identifier, if one was generated.
    pub fn maybe_uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// The finished JSON, or `None` when the component produced nothing.
    pub fn to_output(&self) -> Option<Value> {
        match &self.json {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            other => Some(other.clone()),
        }
    }
}
