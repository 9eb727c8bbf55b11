//! Native video elements.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use pressroom_markup::MarkupNode;
use serde_json::json;

/// Video component for `video` elements carrying a playable source.
pub struct Video;

fn video_source(node: &MarkupNode) -> Option<String> {
    if let Some(src) = node.attr("src") {
        return Some(src);
    }
    node.children()
        .iter()
        .find(|child| child.tag_name().as_deref() == Some("source"))
        .and_then(|source| source.attr("src"))
}

impl ComponentHandler for Video {
    fn kind(&self) -> &'static str {
        "video"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        match node.find_descendant("video") {
            Some(video) if video_source(&video).is_some() => MatchResult::Single(video),
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, _theme: &Theme) {
        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "video",
                "URL": "#url#",
            }),
        );
        component.register_spec(
            "json-with-poster",
            "JSON with Poster Frame",
            &json!({
                "role": "video",
                "URL": "#url#",
                "stillURL": "#still_url#",
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
        let document = pressroom_markup::parse_markup(html);
        let Some(video) = document
            .nodes()
            .first()
            .and_then(|node| node.find_descendant("video"))
        else {
            return;
        };
        let Some(src) = video_source(&video) else {
            return;
        };

        let mut values = TokenValues::new();
        let url = component.maybe_bundle_source(&src, None, ctx);
        values.insert("#url#".into(), json!(url));

        let spec_name = match video.attr("poster") {
            Some(poster) if !poster.is_empty() => {
                let still = component.maybe_bundle_source(&poster, None, ctx);
                values.insert("#still_url#".into(), json!(still));
                "json-with-poster"
            }
            _ => "json",
        };
        component.register_json(spec_name, &values, ctx);
    }
}
