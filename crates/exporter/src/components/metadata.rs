//! Components built from article metadata rather than markup.
//!
//! These kinds never claim a markup node; the compile driver constructs them
//! directly from the article's title, byline, and cover image.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::json;

/// The article title.
pub struct Title;

impl ComponentHandler for Title {
    fn kind(&self) -> &'static str {
        "title"
    }

    fn matches(&self, _node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        MatchResult::NoMatch
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "title",
                "text": "#text#",
                "format": "html",
                "textStyle": "default-title",
                "layout": "title-layout",
            }),
        );
        component.register_spec(
            "default-title",
            "Default Title Style",
            &json!({
                "fontName": "#title_font#",
                "fontSize": "#title_size#",
                "textColor": "#title_color#",
            }),
        );
        component.register_spec(
            "title-layout",
            "Title Layout",
            &json!({ "margin": { "top": 30, "bottom": 10 } }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        _factory: &ComponentFactory,
    ) {
        if html.trim().is_empty() {
            return;
        }
        let theme = ctx.theme.clone();
        let mut values = TokenValues::new();
        values.insert("#text#".into(), json!(html));
        component.register_json("json", &values, ctx);

        let mut style_values = TokenValues::new();
        if let Some(font) = theme.get("title_font") {
            style_values.insert("#title_font#".into(), font.clone());
        }
        if let Some(color) = theme.get("title_color") {
            style_values.insert("#title_color#".into(), color.clone());
        }
        style_values.insert("#title_size#".into(), json!(theme.get_int("title_size").unwrap_or(48)));
        component.register_style("default-title", "default-title", &style_values, None, ctx);
        component.register_layout("title-layout", "title-layout", &TokenValues::new(), None, ctx);
    }
}

/// The article byline.
pub struct Byline;

impl ComponentHandler for Byline {
    fn kind(&self) -> &'static str {
        "byline"
    }

    fn matches(&self, _node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        MatchResult::NoMatch
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "byline",
                "text": "#text#",
                "textStyle": "default-byline",
                "layout": "byline-layout",
            }),
        );
        component.register_spec(
            "default-byline",
            "Default Byline Style",
            &json!({
                "fontName": "#byline_font#",
                "fontSize": "#byline_size#",
                "textColor": "#byline_color#",
            }),
        );
        component.register_spec(
            "byline-layout",
            "Byline Layout",
            &json!({ "margin": { "top": 10, "bottom": 25 } }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        _factory: &ComponentFactory,
    ) {
        if html.trim().is_empty() {
            return;
        }
        let theme = ctx.theme.clone();
        let mut values = TokenValues::new();
        values.insert("#text#".into(), json!(html));
        component.register_json("json", &values, ctx);

        let mut style_values = TokenValues::new();
        if let Some(font) = theme.get("byline_font") {
            style_values.insert("#byline_font#".into(), font.clone());
        }
        if let Some(color) = theme.get("byline_color") {
            style_values.insert("#byline_color#".into(), color.clone());
        }
        style_values.insert("#byline_size#".into(), json!(theme.get_int("byline_size").unwrap_or(13)));
        component.register_style("default-byline", "default-byline", &style_values, None, ctx);
        component.register_layout("byline-layout", "byline-layout", &TokenValues::new(), None, ctx);
    }
}

/// The header image. Built from the cover URL, not markup; the layout lines
/// up with the body like other full-width components.
pub struct Cover;

impl ComponentHandler for Cover {
    fn kind(&self) -> &'static str {
        "cover"
    }

    fn matches(&self, _node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        MatchResult::NoMatch
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "header",
                "layout": "header-layout",
                "style": {
                    "fill": {
                        "type": "image",
                        "URL": "#url#",
                        "fillMode": "cover",
                        "verticalAlignment": "center",
                    },
                },
            }),
        );
        component.register_spec(
            "header-layout",
            "Header Layout",
            &json!({ "margin": { "top": 0, "bottom": 30 } }),
        );
    }

    fn build(
        &self,
        component: &mut Component,
        html: &str,
        ctx: &mut CompileContext,
        _factory: &ComponentFactory,
    ) {
        let url = html.trim();
        if url.is_empty() {
            return;
        }
        let mut values = TokenValues::new();
        let resolved = component.maybe_bundle_source(url, None, ctx);
        values.insert("#url#".into(), json!(resolved));
        component.register_json("json", &values, ctx);
        component.register_full_width_layout(
            "header-layout",
            "header-layout",
            &TokenValues::new(),
            None,
            ctx,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn ctx() -> CompileContext {
        CompileContext::new(Theme::default(), Settings::default(), "1")
    }

    #[test]
    fn title_registers_style_and_layout() {
        let mut ctx = ctx();
        let factory = ComponentFactory::standard();
        let component = factory
            .component("title", "An Article", None, &mut ctx)
            .expect("known kind");
        let json = component.to_output().expect("title output");
        assert_eq!(json["role"], json!("title"));
        assert_eq!(json["textStyle"], json!("default-title"));
        assert!(ctx.text_styles.get("default-title").is_some());
        assert!(ctx.layouts.get("title-layout").is_some());
    }

    #[test]
    fn cover_layout_matches_body_geometry() {
        let mut ctx = ctx();
        ctx.theme.body_orientation = "center".to_string();
        let factory = ComponentFactory::standard();
        let component = factory
            .component("cover", "https://x.test/hero.jpg", None, &mut ctx)
            .expect("known kind");
        let json = component.to_output().expect("cover output");
        assert_eq!(json["role"], json!("header"));
        assert_eq!(json["style"]["fill"]["URL"], json!("https://x.test/hero.jpg"));
        let layout = ctx.layouts.get("header-layout").expect("layout");
        assert_eq!(layout["columnStart"], json!(1));
        assert_eq!(layout["columnSpan"], json!(7));
    }

    #[test]
    fn empty_byline_produces_nothing() {
        let mut ctx = ctx();
        let factory = ComponentFactory::standard();
        let component = factory
            .component("byline", "  ", None, &mut ctx)
            .expect("known kind");
        assert_eq!(component.to_output(), None);
    }
}
