//! Asides: class-selected containers whose children become subcomponents.

use crate::component::{Component, ComponentCaps, ComponentHandler, MatchResult};
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::{Value, json};

/// Aside component. Matching is driven entirely by the host-configured
/// class name; without one the matcher never fires.
pub struct Aside;

impl ComponentHandler for Aside {
    fn kind(&self) -> &'static str {
        "aside"
    }

    fn caps(&self) -> ComponentCaps {
        ComponentCaps {
            can_be_anchor_target: false,
            can_be_parent: true,
            needs_layout_if_anchored: true,
        }
    }

    fn matches(&self, node: &MarkupNode, ctx: &CompileContext) -> MatchResult {
        match &ctx.settings.aside_component_class {
            Some(class) if !class.is_empty() && node.has_class(class) => {
                MatchResult::Single(node.clone())
            }
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "aside",
                "components": "#components#",
                "layout": {
                    "margin": { "top": 10, "bottom": 10 },
                    "padding": 12,
                },
            }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        factory: &ComponentFactory,
    ) {
        let children = compile_children(self.kind(), html, ctx, factory);
        let mut values = TokenValues::new();
        values.insert("#components#".into(), Value::Array(children));
        component.register_json("json", &values, ctx);
    }
}

/// Compiles the child markup of a container element into subcomponent JSON.
///
/// The container's own element is skipped so it cannot match itself again;
/// descent starts at its children, mirroring the top-level walk.
pub(crate) fn compile_children(
    parent_kind: &str,
    html: &str,
    ctx: &mut CompileContext,
    factory: &ComponentFactory,
) -> Vec<Value> {
    let document = pressroom_markup::parse_markup(html);
    let mut out = Vec::new();
    for node in document.nodes() {
        for child in node.children() {
            match factory.components_from_node(&child, Some(parent_kind), ctx) {
                Ok(components) => {
                    out.extend(components.iter().filter_map(Component::to_output));
                }
                Err(err) => {
                    log::warn!("skipping over-deep subtree inside `{parent_kind}`: {err}");
                }
            }
        }
    }
    out
}
