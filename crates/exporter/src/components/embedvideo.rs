//! Embedded web videos hosted in iframes.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::components::url_from_src;
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::json;

/// Embed component: claims the first `iframe` at any depth under the offered
/// node, so embeds survive the wrapper markup most editors produce.
pub struct EmbedVideo;

impl ComponentHandler for EmbedVideo {
    fn kind(&self) -> &'static str {
        "embedvideo"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        match node.find_descendant("iframe") {
            Some(iframe) if iframe.attr("src").is_some() => MatchResult::Single(iframe),
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "embedwebvideo",
                "URL": "#url#",
                "aspectRatio": 1.777,
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
        let Some(url) = url_from_src(html) else {
            return;
        };
        let mut values = TokenValues::new();
        values.insert("#url#".into(), json!(url));
        component.register_json("json", &values, ctx);
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
    fn claims_nested_iframes() {
        let ctx = ctx();
        let document =
            parse_markup("<figure><div><iframe src=\"https://v.test/e/1\"></iframe></div></figure>");
        match EmbedVideo.matches(&document.nodes()[0], &ctx) {
            MatchResult::Single(node) => {
                assert_eq!(node.tag_name().as_deref(), Some("iframe"));
            }
            other => panic!("expected single match, got {other:?}"),
        }
    }

    #[test]
    fn builds_embed_json_from_iframe_src() {
        let mut ctx = ctx();
        let factory = ComponentFactory::standard();
        let component = factory
            .component(
                "embedvideo",
                "<iframe src=\"https://v.test/e/1\"></iframe>",
                None,
                &mut ctx,
            )
            .expect("known kind");
        let json = component.to_output().expect("embed output");
        assert_eq!(json["role"], json!("embedwebvideo"));
        assert_eq!(json["URL"], json!("https://v.test/e/1"));
    }
}
