//! Block quotes.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::components::strip_tags;
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use pressroom_markup::MarkupNode;
use regex::Regex;
use serde_json::json;

/// Pull-quote component for `blockquote` elements.
pub struct Quote;

static INNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<blockquote[^>]*>(.*)</blockquote>\s*$").unwrap());

impl ComponentHandler for Quote {
    fn kind(&self) -> &'static str {
        "blockquote"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        match node.tag_name() {
            Some(tag) if tag == "blockquote" => MatchResult::Single(node.clone()),
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "quote",
                "text": "#text#",
                "format": "#format#",
            }),
        );
        component.register_spec(
            "default-pullquote",
            "Default Pull Quote Style",
            &json!({
                "textAlignment": "center",
                "fontName": "#quote_font#",
                "fontSize": "#quote_size#",
                "lineHeight": "#quote_line_height#",
                "textColor": "#quote_color#",
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
        let text = INNER
            .captures(html.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(html);
        if strip_tags(text).trim().is_empty() {
            return;
        }

        let theme = ctx.theme.clone();
        let (format, text) = if ctx.settings.html_support {
            ("html", text.to_string())
        } else {
            ("none", strip_tags(text).trim().to_string())
        };
        let mut values = TokenValues::new();
        values.insert("#text#".into(), json!(text));
        values.insert("#format#".into(), json!(format));
        component.register_json("json", &values, ctx);

        let mut style_values = TokenValues::new();
        for key in ["quote_font", "quote_color"] {
            if let Some(value) = theme.get(key) {
                style_values.insert(format!("#{key}#"), value.clone());
            }
        }
        style_values.insert("#quote_size#".into(), json!(theme.get_int("quote_size").unwrap_or(24)));
        style_values.insert(
            "#quote_line_height#".into(),
            json!(theme.get_int("quote_line_height").unwrap_or(36)),
        );
        component.register_style(
            "default-pullquote",
            "default-pullquote",
            &style_values,
            Some("textStyle"),
            ctx,
        );
    }
}
