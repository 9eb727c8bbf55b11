//! Images, with caption grouping and anchored/full-width layout selection.

use crate::component::{AnchorPosition, Component, ComponentHandler, MatchResult};
use crate::context::{CompileContext, filename_from_source};
use crate::components::url_from_src;
use crate::factory::ComponentFactory;
use crate::template::TokenValues;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use pressroom_markup::MarkupNode;
use regex::Regex;
use serde_json::json;

/// Image component. A captioned image becomes a container wrapping the image
/// and a caption text block; the bare and captioned branches use entirely
/// different spec and layout names.
pub struct Image;

static ALIGN_LEFT_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)align="left""#).unwrap());
static ALIGN_LEFT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)class="[^"]*alignleft[^"]*""#).unwrap());
static ALIGN_RIGHT_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)align="right""#).unwrap());
static ALIGN_RIGHT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)class="[^"]*alignright[^"]*""#).unwrap());
static FIGCAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<figcaption[^>]*>(.*?)</figcaption>").unwrap());

fn sniff_anchor(html: &str) -> AnchorPosition {
    if ALIGN_LEFT_ATTR.is_match(html) || ALIGN_LEFT_CLASS.is_match(html) {
        AnchorPosition::Left
    } else if ALIGN_RIGHT_ATTR.is_match(html) || ALIGN_RIGHT_CLASS.is_match(html) {
        AnchorPosition::Right
    } else {
        AnchorPosition::None
    }
}

impl ComponentHandler for Image {
    fn kind(&self) -> &'static str {
        "img"
    }

    fn matches(&self, node: &MarkupNode, _ctx: &CompileContext) -> MatchResult {
        let tag = node.tag_name().unwrap_or_default();
        let is_image = tag == "img"
            || node.has_class("wp-block-cover")
            || (tag == "figure"
                && (node.has_class("wp-caption") || node.find_descendant("img").is_some()));
        if is_image {
            MatchResult::Single(node.clone())
        } else {
            MatchResult::NoMatch
        }
    }

    fn register_specs(&self, component: &mut Component, theme: &Theme) {
        component.register_spec(
            "json-without-caption",
            "JSON without caption",
            &json!({
                "role": "#role#",
                "URL": "#url#",
                "layout": "#layout#",
            }),
        );

        let mut caption_style = json!({
            "textAlignment": "#text_alignment#",
            "fontName": "#caption_font#",
            "fontSize": "#caption_size#",
            "tracking": "#caption_tracking#",
            "lineHeight": "#caption_line_height#",
            "textColor": "#caption_color#",
        });
        if theme.defines("caption_color_dark") {
            caption_style["conditional"] = json!({
                "textColor": "#caption_color_dark#",
                "conditions": {
                    "minSpecVersion": "1.14",
                    "preferredColorScheme": "dark",
                },
            });
        }

        component.register_spec(
            "json-with-caption",
            "JSON with caption",
            &json!({
                "role": "container",
                "components": [
                    {
                        "role": "#role#",
                        "URL": "#url#",
                        "layout": "#layout#",
                        "caption": {
                            "format": "html",
                            "text": "#caption#",
                            "textStyle": {
                                "fontName": "#caption_font#",
                            },
                        },
                    },
                    {
                        "role": "caption",
                        "text": "#caption_text#",
                        "format": "html",
                        "textStyle": caption_style,
                        "layout": {
                            "ignoreDocumentMargin": "#full_bleed_images#",
                            "margin": { "bottom": "#caption_margin_bottom#" },
                        },
                    },
                ],
                "layout": {
                    "ignoreDocumentMargin": "#full_bleed_images#",
                },
            }),
        );

        component.register_spec(
            "anchored-image",
            "Anchored Layout (Without Caption)",
            &json!({ "margin": { "top": 25, "bottom": 25 } }),
        );
        component.register_spec(
            "anchored-image-with-caption",
            "Anchored Layout (With Caption)",
            &json!({ "margin": { "top": 25, "bottom": 10 } }),
        );
        component.register_spec(
            "non-anchored-image",
            "Non Anchored Layout (Without Caption)",
            &json!({
                "margin": { "top": 25, "bottom": 25 },
                "columnSpan": "#layout_columns_minus_4#",
                "columnStart": 2,
            }),
        );
        component.register_spec(
            "non-anchored-image-with-caption",
            "Non Anchored Layout (With Caption)",
            &json!({
                "margin": { "top": 25, "bottom": 10 },
                "columnSpan": "#layout_columns_minus_4#",
                "columnStart": 2,
            }),
        );
        component.register_spec(
            "non-anchored-full-bleed-image",
            "Non Anchored Full Bleed Layout (Without Caption)",
            &json!({
                "margin": { "top": 25, "bottom": 25 },
                "ignoreDocumentMargin": true,
            }),
        );
        component.register_spec(
            "non-anchored-full-bleed-image-with-caption",
            "Non Anchored Full Bleed Layout (With Caption)",
            &json!({
                "margin": { "top": 25, "bottom": 10 },
                "ignoreDocumentMargin": true,
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

        let filename = filename_from_source(&url);
        let mut values = TokenValues::new();
        let resolved = component.maybe_bundle_source(&url, Some(&filename), ctx);
        values.insert("#url#".into(), json!(resolved));
        values.insert(
            "#role#".into(),
            json!(if ctx.settings.use_image_component { "image" } else { "photo" }),
        );

        component.anchor_position = sniff_anchor(html);

        let caption = FIGCAPTION
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|text| !text.is_empty());

        let spec_name = match &caption {
            Some(text) => {
                group_caption_values(text, component.anchor_position, ctx, &mut values);
                "json-with-caption"
            }
            None => "json-without-caption",
        };

        let layout_key = if component.anchor_position == AnchorPosition::None {
            register_non_anchor_layout(component, caption.is_some(), ctx)
        } else {
            register_anchor_layout(component, caption.is_some(), ctx)
        };
        values.insert("#layout#".into(), json!(layout_key));

        component.register_json(spec_name, &values, ctx);
    }
}

/// Rolls the caption theme values into the token map for the container spec.
fn group_caption_values(
    caption: &str,
    anchor: AnchorPosition,
    ctx: &CompileContext,
    values: &mut TokenValues,
) {
    let theme = &ctx.theme;
    values.insert("#caption#".into(), json!(caption));
    values.insert("#caption_text#".into(), json!(caption));
    values.insert(
        "#text_alignment#".into(),
        json!(caption_alignment(anchor, theme)),
    );
    for key in ["caption_font", "caption_color", "caption_color_dark"] {
        if let Some(value) = theme.get(key) {
            values.insert(format!("#{key}#"), value.clone());
        }
    }
    values.insert(
        "#caption_size#".into(),
        json!(theme.get_int("caption_size").unwrap_or(16)),
    );
    values.insert(
        "#caption_tracking#".into(),
        json!(theme.get_int("caption_tracking").unwrap_or(0) as f64 / 100.0),
    );
    values.insert(
        "#caption_line_height#".into(),
        json!(theme.get_int("caption_line_height").unwrap_or(24)),
    );
    values.insert(
        "#caption_margin_bottom#".into(),
        json!(theme.get_int("caption_margin_bottom").unwrap_or(18)),
    );
    values.insert(
        "#full_bleed_images#".into(),
        json!(ctx.settings.full_bleed_images),
    );
}

fn caption_alignment(anchor: AnchorPosition, theme: &Theme) -> &'static str {
    match anchor {
        AnchorPosition::Auto if theme.body_orientation == "left" => "right",
        _ => "left",
    }
}

fn register_anchor_layout(
    component: &mut Component,
    has_caption: bool,
    ctx: &mut CompileContext,
) -> String {
    let layout_name = if has_caption {
        "anchored-image-with-caption"
    } else {
        "anchored-image"
    };
    component.register_layout(layout_name, layout_name, &TokenValues::new(), None, ctx);
    component.component_object_key(layout_name)
}

fn register_non_anchor_layout(
    component: &mut Component,
    has_caption: bool,
    ctx: &mut CompileContext,
) -> String {
    let mut layout_values = TokenValues::new();
    let mut spec_name = if ctx.settings.full_bleed_images {
        "non-anchored-full-bleed-image".to_string()
    } else {
        layout_values.insert(
            "#layout_columns_minus_4#".into(),
            json!(ctx.theme.layout_columns.saturating_sub(4)),
        );
        "non-anchored-image".to_string()
    };

    let mut layout_name = "full-width-image".to_string();
    if has_caption {
        layout_name.push_str("-with-caption");
        spec_name.push_str("-with-caption");
    }

    component.register_full_width_layout(&layout_name, &spec_name, &layout_values, None, ctx);
    component.component_object_key(&layout_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use pressroom_markup::parse_markup;

    fn ctx() -> CompileContext {
        CompileContext::new(Theme::default(), Settings::default(), "1")
    }

    fn build(html: &str, ctx: &mut CompileContext) -> Component {
        ComponentFactory::standard()
            .component("img", html, None, ctx)
            .expect("known kind")
    }

    #[test]
    fn matches_img_and_figures_with_images() {
        let ctx = ctx();
        let document = parse_markup(concat!(
            "<img src=\"https://x.test/a.jpg\">",
            "<figure><img src=\"https://x.test/b.jpg\"></figure>",
            "<figure class=\"wp-caption\"></figure>",
            "<figure><p>no image</p></figure>",
        ));
        let nodes = document.nodes();
        assert!(matches!(Image.matches(&nodes[0], &ctx), MatchResult::Single(_)));
        assert!(matches!(Image.matches(&nodes[1], &ctx), MatchResult::Single(_)));
        assert!(matches!(Image.matches(&nodes[2], &ctx), MatchResult::Single(_)));
        assert!(matches!(Image.matches(&nodes[3], &ctx), MatchResult::NoMatch));
    }

    #[test]
    fn bare_image_uses_the_no_caption_branch() {
        let mut ctx = ctx();
        let component = build("<img src=\"https://x.test/a.jpg\">", &mut ctx);
        let json = component.to_output().expect("image output");
        assert_eq!(json["role"], json!("photo"));
        assert_eq!(json["URL"], json!("https://x.test/a.jpg"));
        assert_eq!(json["layout"], json!("full-width-image"));
        assert!(ctx.layouts.get("full-width-image").is_some());
    }

    #[test]
    fn captioned_image_becomes_a_container_with_distinct_names() {
        let mut ctx = ctx();
        let component = build(
            "<figure><img src=\"https://x.test/a.jpg\"><figcaption>A fine shot</figcaption></figure>",
            &mut ctx,
        );
        let json = component.to_output().expect("image output");
        assert_eq!(json["role"], json!("container"));
        assert_eq!(json["components"][0]["URL"], json!("https://x.test/a.jpg"));
        assert_eq!(json["components"][1]["role"], json!("caption"));
        assert_eq!(json["components"][1]["text"], json!("A fine shot"));
        // Caption branch never reuses the no-caption layout name.
        assert_eq!(
            json["components"][0]["layout"],
            json!("full-width-image-with-caption")
        );
        assert!(ctx.layouts.get("full-width-image-with-caption").is_some());
        assert!(ctx.layouts.get("full-width-image").is_none());
    }

    #[test]
    fn alignment_classes_set_the_anchor_position() {
        let mut ctx = ctx();
        let left = build(
            "<img class=\"size-full alignleft\" src=\"https://x.test/a.jpg\">",
            &mut ctx,
        );
        assert_eq!(left.anchor_position, AnchorPosition::Left);
        assert!(ctx.layouts.get("anchored-image").is_some());

        let right = build("<img align=\"right\" src=\"https://x.test/b.jpg\">", &mut ctx);
        assert_eq!(right.anchor_position, AnchorPosition::Right);
    }

    #[test]
    fn full_bleed_setting_switches_the_layout_spec() {
        let mut ctx = CompileContext::new(
            Theme::default(),
            Settings {
                full_bleed_images: true,
                ..Settings::default()
            },
            "1",
        );
        build("<img src=\"https://x.test/a.jpg\">", &mut ctx);
        let layout = ctx.layouts.get("full-width-image").expect("layout");
        assert_eq!(layout["ignoreDocumentMargin"], json!(true));
        assert!(layout.get("columnSpan").is_some());
    }

    #[test]
    fn non_anchored_layout_inherits_column_inset() {
        let mut ctx = ctx();
        build("<img src=\"https://x.test/a.jpg\">", &mut ctx);
        let layout = ctx.layouts.get("full-width-image").expect("layout");
        // register_full_width_layout overwrites the authored columns.
        assert_eq!(layout["columnStart"], json!(0));
        assert_eq!(layout["columnSpan"], json!(9));
    }

    #[test]
    fn bundles_source_when_remote_media_is_off() {
        let mut ctx = CompileContext::new(
            Theme::default(),
            Settings {
                use_remote_media: false,
                ..Settings::default()
            },
            "1",
        );
        let component = build("<img src=\"https://x.test/shots/a.jpg?w=640\">", &mut ctx);
        let json = component.to_output().expect("image output");
        assert_eq!(json["URL"], json!("bundle://a.jpg"));
        assert_eq!(ctx.bundle_requests[0].0, "a.jpg");
    }
}
