//! Headings `h1` through `h6`.

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

/// Heading component. A heading with an embedded image decomposes into an
/// image component followed by the heading itself.
pub struct Heading;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<img[^>]*>").unwrap());
static LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<h([1-6])").unwrap());
static INNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^<h[1-6][^>]*>(.*)</h[1-6]>\s*$").unwrap());

impl ComponentHandler for Heading {
    fn kind(&self) -> &'static str {
        "heading"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        let is_heading = node
            .tag_name()
            .is_some_and(|tag| HEADING_TAGS.contains(&tag.as_str()));
        if !is_heading {
            return MatchResult::NoMatch;
        }
        // An image inside the heading splits into its own component so it is
        // not lost when the heading text is extracted.
        match node.find_descendant("img") {
            Some(img) => MatchResult::Fragments(vec![
                ("img".to_string(), img.to_html()),
                ("heading".to_string(), node.to_html()),
            ]),
            None => MatchResult::Single(node.clone()),
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "#heading_level#",
                "text": "#text#",
                "format": "#format#",
            }),
        );
        component.register_spec(
            "default-heading",
            "Default Heading Style",
            &json!({
                "fontName": "#header_font#",
                "fontSize": "#header_size#",
                "textColor": "#header_color#",
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
        let Some(level) = LEVEL
            .captures(html.trim_start())
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        else {
            return;
        };

        let text = INNER
            .captures(html.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(html);
        let text = IMG_TAG.replace_all(text, "").trim().to_string();
        if strip_tags(&text).trim().is_empty() {
            return;
        }

        let theme = ctx.theme.clone();
        let (format, text) = if ctx.settings.html_support {
            ("html", text)
        } else {
            ("none", strip_tags(&text).trim().to_string())
        };
        let mut values = TokenValues::new();
        values.insert("#heading_level#".into(), json!(format!("heading{level}")));
        values.insert("#text#".into(), json!(text));
        values.insert("#format#".into(), json!(format));
        component.register_json("json", &values, ctx);

        let mut style_values = TokenValues::new();
        if let Some(font) = theme.get("header_font") {
            style_values.insert("#header_font#".into(), font.clone());
        }
        if let Some(color) = theme.get("header_color") {
            style_values.insert("#header_color#".into(), color.clone());
        }
        style_values.insert(
            "#header_size#".into(),
            json!(theme.get_int(&format!("header{level}_size")).unwrap_or(18)),
        );
        component.register_style(
            &format!("default-heading-{level}"),
            "default-heading",
            &style_values,
            Some("textStyle"),
            ctx,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use pressroom_markup::parse_markup;

    fn ctx() -> CompileContext {
        CompileContext::new(Theme::default(), Settings::default(), "1")
    }

    #[test]
    fn plain_heading_is_a_single_match() {
        let ctx = ctx();
        let document = parse_markup("<h2>Section</h2>");
        assert!(matches!(
            Heading.matches(&document.nodes()[0], &ctx),
            MatchResult::Single(_)
        ));
    }

    #[test]
    fn heading_with_embedded_image_splits_into_fragments() {
        let ctx = ctx();
        let document = parse_markup("<h2><img src=\"https://x.test/a.jpg\">Section</h2>");
        match Heading.matches(&document.nodes()[0], &ctx) {
            MatchResult::Fragments(fragments) => {
                assert_eq!(fragments.len(), 2);
                assert_eq!(fragments[0].0, "img");
                assert_eq!(fragments[1].0, "heading");
            }
            other => panic!("expected fragments, got {other:?}"),
        }
    }

    #[test]
    fn builds_role_from_heading_level() {
        let mut ctx = ctx();
        let factory = ComponentFactory::standard();
        let component = factory
            .component("heading", "<h3>Deep dive</h3>", None, &mut ctx)
            .expect("known kind");
        let json = component.to_output().expect("heading output");
        assert_eq!(json["role"], json!("heading3"));
        assert_eq!(json["text"], json!("Deep dive"));
        assert_eq!(json["textStyle"], json!("default-heading-3"));
        let style = ctx.text_styles.get("default-heading-3").expect("style");
        assert_eq!(style["fontSize"], json!(24));
    }

    #[test]
    fn html_support_off_strips_heading_markup() {
        let mut ctx = CompileContext::new(
            Theme::default(),
            Settings {
                html_support: false,
                ..Settings::default()
            },
            "1",
        );
        let factory = ComponentFactory::standard();
        let component = factory
            .component("heading", "<h2>Very <em>deep</em></h2>", None, &mut ctx)
            .expect("known kind");
        let json = component.to_output().expect("heading output");
        assert_eq!(json["format"], json!("none"));
        assert_eq!(json["text"], json!("Very deep"));
    }

    #[test]
    fn embedded_images_are_stripped_from_heading_text() {
        let mut ctx = ctx();
        let factory = ComponentFactory::standard();
        let component = factory
            .component(
                "heading",
                "<h2><img src=\"https://x.test/a.jpg\">Section</h2>",
                None,
                &mut ctx,
            )
            .expect("known kind");
        let json = component.to_output().expect("heading output");
        assert_eq!(json["text"], json!("Section"));
    }
}
