//! Body text: paragraphs, lists, and preformatted blocks.

use crate::component::{Component, ComponentCaps, ComponentHandler, MatchResult};
use crate::components::strip_tags;
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::json;

/// The default text component. Body text flows around anchored components,
/// so it never takes an anchored layout itself.
pub struct Body;

const BODY_TAGS: [&str; 4] = ["p", "ol", "ul", "pre"];

impl ComponentHandler for Body {
    fn kind(&self) -> &'static str {
        "body"
    }

    fn caps(&self) -> ComponentCaps {
        ComponentCaps {
            can_be_anchor_target: true,
            can_be_parent: false,
            needs_layout_if_anchored: false,
        }
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        match node.tag_name() {
            Some(tag) if BODY_TAGS.contains(&tag.as_str()) => MatchResult::Single(node.clone()),
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "body",
                "text": "#text#",
                "format": "#format#",
            }),
        );

        let mut style = json!({
            "textAlignment": "left",
            "fontName": "#body_font#",
            "fontSize": "#body_size#",
            "tracking": "#body_tracking#",
            "lineHeight": "#body_line_height#",
            "textColor": "#body_color#",
            "linkStyle": {
                "textColor": "#body_link_color#",
            },
        });
        if theme.defines("body_color_dark") {
            style["conditional"] = json!({
                "textColor": "#body_color_dark#",
                "conditions": {
                    "minSpecVersion": "1.14",
                    "preferredColorScheme": "dark",
                },
            });
        }
        component.register_spec("default-body", "Default Body Text Style", &style);

        component.register_spec(
            "body-layout",
            "Body Layout",
            &json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": { "bottom": 24 },
            }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        _factory: &ComponentFactory,
    ) {
        // Empty wrappers contribute nothing.
        if strip_tags(html).trim().is_empty() {
            return;
        }

        let theme = ctx.theme.clone();
        let (format, text) = if ctx.settings.html_support {
            ("html", html.to_string())
        } else {
            ("none", strip_tags(html).trim().to_string())
        };
        let mut values = TokenValues::new();
        values.insert("#text#".into(), json!(text));
        values.insert("#format#".into(), json!(format));
        component.register_json("json", &values, ctx);

        let mut style_values = TokenValues::new();
        for key in ["body_font", "body_color", "body_link_color", "body_color_dark"] {
            if let Some(value) = theme.get(key) {
                style_values.insert(format!("#{key}#"), value.clone());
            }
        }
        style_values.insert("#body_size#".into(), json!(theme.get_int("body_size").unwrap_or(0)));
        style_values.insert(
            "#body_line_height#".into(),
            json!(theme.get_int("body_line_height").unwrap_or(0)),
        );
        style_values.insert(
            "#body_tracking#".into(),
            json!(theme.get_int("body_tracking").unwrap_or(0) as f64 / 100.0),
        );
        component.register_style("default-body", "default-body", &style_values, Some("textStyle"), ctx);

        let offset = match theme.body_orientation.as_str() {
            "center" => (theme.layout_columns.saturating_sub(theme.body_column_span)) / 2,
            "right" => theme.layout_columns.saturating_sub(theme.body_column_span),
            _ => 0,
        };
        let mut layout_values = TokenValues::new();
        layout_values.insert("#body_offset#".into(), json!(offset));
        layout_values.insert("#body_column_span#".into(), json!(theme.body_column_span));
        component.register_layout("body-layout", "body-layout", &layout_values, Some("layout"), ctx);
    }
}
