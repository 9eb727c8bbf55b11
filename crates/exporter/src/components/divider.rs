//! Horizontal rules.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::json;

/// Divider component for `hr` elements.
pub struct Divider;

impl ComponentHandler for Divider {
    fn kind(&self) -> &'static str {
        "divider"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        match node.tag_name() {
            Some(tag) if tag == "hr" => MatchResult::Single(node.clone()),
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "divider",
                "layout": {
                    "margin": { "top": 25, "bottom": 25 },
                },
                "stroke": {
                    "color": "#divider_color#",
                    "width": "#divider_width#",
                },
            }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        _html: &str,
        ctx: &mut CompileContext,
        _factory: &ComponentFactory,
    ) {
        let theme = ctx.theme.clone();
        let mut values = TokenValues::new();
        if let Some(color) = theme.get("divider_color") {
            values.insert("#divider_color#".into(), color.clone());
        }
        values.insert(
            "#divider_width#".into(),
            json!(theme.get_int("divider_width").unwrap_or(1)),
        );
        component.register_json("json", &values, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn builds_divider_from_theme_values() {
        let mut ctx = CompileContext::new(Theme::default(), Settings::default(), "1");
        let factory = ComponentFactory::standard();
        let component = factory
            .component("divider", "<hr/>", None, &mut ctx)
            .expect("known kind");
        let json = component.to_output().expect("divider output");
        assert_eq!(json["role"], json!("divider"));
        assert_eq!(json["stroke"]["color"], json!("#e6e6e6"));
        assert_eq!(json["stroke"]["width"], json!(1));
    }
}
