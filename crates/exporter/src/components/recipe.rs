//! Recipes compiled from structured schema data.
//!
//! The matcher fires on a host-configured class. Values come from a JSON-LD
//! style schema item supplied by the context's schema provider; the `json`
//! spec is prunable, so schema fields that are absent drop their whole
//! template branch instead of leaking placeholder text.

use crate::component::{Component, ComponentCaps, ComponentHandler, MatchResult};
use crate::components::aside::compile_children;
use crate::context::CompileContext;
use crate::factory::ComponentFactory;
use crate::spec::ComponentSpec;
use crate::template::{TokenValues, prune_unresolved};
use crate::theme::Theme;
use html_escape::encode_text;
use once_cell::sync::Lazy;
use pressroom_markup::MarkupNode;
use regex::Regex;
use serde_json::{Map, Value, json};

/// Recipe component.
pub struct Recipe;

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
});

fn dark_conditions() -> Value {
    json!({ "minSpecVersion": "1.14", "preferredColorScheme": "dark" })
}

/// Appends a dark-mode conditional to a style when the theme defines any of
/// the given dark values. `fields` maps theme keys to style fields;
/// `linkStyle` wraps its token in a nested object.
fn with_dark_conditional(mut style: Value, theme: &Theme, fields: &[(&str, &str)]) -> Value {
    let mut conditional = Map::new();
    for (theme_key, field) in fields {
        if theme.defines(theme_key) {
            let token = Value::String(format!("#{theme_key}#"));
            if *field == "linkStyle" {
                conditional.insert("linkStyle".to_string(), json!({ "textColor": token }));
            } else {
                conditional.insert((*field).to_string(), token);
            }
        }
    }
    if !conditional.is_empty() {
        conditional.insert("conditions".to_string(), dark_conditions());
        style["conditional"] = Value::Object(conditional);
    }
    style
}

impl ComponentHandler for Recipe {
    fn kind(&self) -> &'static str {
        "recipe"
    }

    fn caps(&self) -> ComponentCaps {
        ComponentCaps {
            can_be_anchor_target: false,
            can_be_parent: true,
            needs_layout_if_anchored: true,
        }
    }

    fn matches(&self, node: &MarkupNode, ctx: &CompileContext) -> MatchResult {
        match &ctx.settings.recipe_component_class {
            Some(class) if !class.is_empty() && node.has_class(class) => {
                MatchResult::Single(node.clone())
            }
            _ => MatchResult::NoMatch,
        }
    }

    fn register_specs(&self, component: &mut Component, theme: &Theme) {
        let caption_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_caption_font#",
                "fontSize": "#recipe_caption_size#",
                "tracking": "#recipe_caption_tracking#",
                "lineHeight": "#recipe_caption_line_height#",
                "textColor": "#recipe_caption_color#",
                "linkStyle": { "textColor": "#recipe_caption_link_color#" },
            }),
            theme,
            &[
                ("recipe_caption_color_dark", "textColor"),
                ("recipe_caption_link_color_dark", "linkStyle"),
            ],
        );
        let title_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_title_font#",
                "fontSize": "#recipe_title_size#",
                "tracking": "#recipe_title_tracking#",
                "lineHeight": "#recipe_title_line_height#",
                "textColor": "#recipe_title_color#",
            }),
            theme,
            &[("recipe_title_color_dark", "textColor")],
        );
        let body_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_body_font#",
                "fontSize": "#recipe_body_size#",
                "tracking": "#recipe_body_tracking#",
                "lineHeight": "#recipe_body_line_height#",
                "textColor": "#recipe_body_color#",
                "linkStyle": { "textColor": "#recipe_body_link_color#" },
            }),
            theme,
            &[
                ("recipe_body_color_dark", "textColor"),
                ("recipe_body_background_color_dark", "backgroundColor"),
                ("recipe_body_link_color_dark", "linkStyle"),
            ],
        );
        let header2_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_header2_font#",
                "fontSize": "#recipe_header2_size#",
                "tracking": "#recipe_header2_tracking#",
                "lineHeight": "#recipe_header2_line_height#",
                "textColor": "#recipe_header2_color#",
            }),
            theme,
            &[("recipe_header2_color_dark", "textColor")],
        );
        let header3_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_header3_font#",
                "fontSize": "#recipe_header3_size#",
                "tracking": "#recipe_header3_tracking#",
                "lineHeight": "#recipe_header3_line_height#",
                "textColor": "#recipe_header3_color#",
            }),
            theme,
            &[("recipe_header3_color_dark", "textColor")],
        );
        let details_style = with_dark_conditional(
            json!({
                "textAlignment": "left",
                "fontName": "#recipe_details_font#",
                "fontSize": "#recipe_details_size#",
                "tracking": "#recipe_details_tracking#",
                "lineHeight": "#recipe_details_line_height#",
                "textColor": "#recipe_details_color#",
                "linkStyle": { "textColor": "#recipe_details_link_color#" },
            }),
            theme,
            &[
                ("recipe_details_color_dark", "textColor"),
                ("recipe_details_link_color_dark", "linkStyle"),
            ],
        );

        let component_style = with_dark_conditional(
            json!({ "backgroundColor": "#recipe_background_color#" }),
            theme,
            &[("recipe_background_color_dark", "backgroundColor")],
        );

        let detail_line = |token: &str| {
            json!({
                "role": "body",
                "layout": "recipe-details-layout",
                "textStyle": "recipe-details-style",
                "text": token,
                "format": "html",
            })
        };

        component.register_spec(
            "json",
            "JSON",
            &json!({
                "role": "recipe",
                "URL": "#url#",
                "layout": { "margin": { "top": 5, "bottom": 5 } },
                "style": component_style,
                "components": [
                    {
                        "role": "photo",
                        "layout": { "margin": { "top": 0, "bottom": 12 } },
                        "URL": "#recipe_photo_url#",
                        "caption": {
                            "text": "#recipe_photo_caption#",
                            "format": "html",
                            "textStyle": caption_style,
                        },
                    },
                    {
                        "role": "container",
                        "layout": { "padding": { "left": 12, "right": 12 } },
                        "components": [
                            {
                                "role": "title",
                                "layout": { "margin": { "top": 8, "bottom": 12 } },
                                "textStyle": title_style,
                                "text": "#recipe_title#",
                                "format": "html",
                            },
                            {
                                "role": "heading2",
                                "layout": "recipe-header2-layout",
                                "textStyle": "recipe-header2-style",
                                "text": "Recipe Information",
                                "format": "html",
                            },
                            {
                                "role": "container",
                                "layout": {
                                    "columnSpan": 4,
                                    "columnStart": 0,
                                    "margin": { "top": 24, "bottom": 10 },
                                    "padding": { "left": 0, "right": 0, "top": 10, "bottom": 0 },
                                },
                                "contentDisplay": {
                                    "type": "collection",
                                    "gutter": "20",
                                    "rowSpacing": "10",
                                    "alignment": "left",
                                    "minimumWidth": 200,
                                },
                                "components": [
                                    detail_line("#recipe_yield#"),
                                    detail_line("#recipe_prep_time#"),
                                    detail_line("#recipe_cook_time#"),
                                    detail_line("#recipe_total_time#"),
                                    detail_line("#recipe_calories_per_serving#"),
                                ],
                            },
                            {
                                "role": "divider",
                                "style": {
                                    "border": {
                                        "all": { "width": 1, "style": "solid", "color": "#000" },
                                        "left": false,
                                        "right": false,
                                        "top": false,
                                    },
                                    "layout": { "margin": { "top": 10, "bottom": 30 } },
                                },
                            },
                            {
                                "role": "section",
                                "components": [
                                    {
                                        "role": "container",
                                        "components": [
                                            {
                                                "role": "container",
                                                "layout": { "margin": { "top": 20, "bottom": 20 } },
                                                "components": [
                                                    {
                                                        "role": "heading2",
                                                        "layout": "recipe-header2-layout",
                                                        "textStyle": "recipe-header2-style",
                                                        "text": "Ingredients",
                                                        "format": "html",
                                                    },
                                                    {
                                                        "role": "body",
                                                        "layout": "recipe-body-layout",
                                                        "textStyle": "recipe-body-style",
                                                        "text": "#recipe_ingredients#",
                                                        "format": "html",
                                                    },
                                                ],
                                            },
                                            {
                                                "role": "container",
                                                "components": [
                                                    {
                                                        "role": "heading2",
                                                        "layout": "recipe-header2-layout",
                                                        "textStyle": "recipe-header2-style",
                                                        "text": "Directions",
                                                        "format": "html",
                                                    },
                                                    {
                                                        "role": "container",
                                                        "components": "#recipe_instructions#",
                                                    },
                                                ],
                                            },
                                        ],
                                    },
                                ],
                            },
                        ],
                    },
                ],
            }),
        );

        component.register_spec(
            "recipe-body-layout",
            "Recipe Body Layout",
            &json!({ "margin": { "bottom": 10 } }),
        );
        component.register_spec("recipe-body-style", "Recipe Body Text Style", &body_style);
        component.register_spec(
            "recipe-header2-layout",
            "Recipe Header 2 Layout",
            &json!({ "margin": { "top": 6, "bottom": 6 } }),
        );
        component.register_spec("recipe-header2-style", "Recipe Header 2 Text Style", &header2_style);
        component.register_spec(
            "recipe-header3-layout",
            "Recipe Header 3 Layout",
            &json!({ "margin": { "top": 6, "bottom": 6 } }),
        );
        component.register_spec("recipe-header3-style", "Recipe Header 3 Text Style", &header3_style);
        component.register_spec(
            "recipe-details-layout",
            "Recipe Details Layout",
            &json!({ "margin": { "bottom": 10 } }),
        );
        component.register_spec("recipe-details-style", "Recipe Details Text Style", &details_style);

        component.register_spec(
            "recipe-section-json",
            "JSON for a Section of Recipe Instructions",
            &json!({
                "role": "container",
                "components": [
                    {
                        "role": "heading3",
                        "layout": "recipe-header3-layout",
                        "textStyle": "recipe-header3-style",
                        "text": "#recipe_section_name#",
                        "format": "html",
                    },
                    {
                        "role": "container",
                        "components": "#components#",
                    },
                ],
            }),
        );
        component.register_spec(
            "recipe-section-step-json",
            "JSON for a Step Within a Section",
            &json!({
                "role": "container",
                "components": [
                    {
                        "role": "heading4",
                        "layout": "recipe-header3-layout",
                        "textStyle": "recipe-header3-style",
                        "text": "#recipe_step_name#",
                        "format": "html",
                    },
                    {
                        "role": "photo",
                        "layout": { "margin": { "top": 6, "bottom": 12 } },
                        "URL": "#recipe_step_photo_url#",
                    },
                    {
                        "role": "body",
                        "layout": "recipe-body-layout",
                        "textStyle": "recipe-body-style",
                        "text": "#recipe_step_text#",
                        "format": "html",
                    },
                ],
            }),
        );
        component.register_spec(
            "recipe-step-json",
            "JSON for a Standalone Step",
            &json!({
                "role": "container",
                "components": [
                    {
                        "role": "heading3",
                        "layout": "recipe-header3-layout",
                        "textStyle": "recipe-header3-style",
                        "text": "#recipe_step_name#",
                        "format": "html",
                    },
                    {
                        "role": "photo",
                        "layout": { "margin": { "top": 6, "bottom": 12 } },
                        "URL": "#recipe_step_photo_url#",
                    },
                    {
                        "role": "body",
                        "layout": "recipe-body-layout",
                        "textStyle": "recipe-body-style",
                        "text": "#recipe_step_text#",
                        "format": "html",
                    },
                ],
            }),
        );
        component.register_spec(
            "wrapper-only-json",
            "JSON for a Wrapper Only",
            &json!({
                "role": "recipe",
                "URL": "#url#",
                "components": "#components#",
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
        let Some(schema) = ctx.recipe_schema(html) else {
            return;
        };

        if !ctx.settings.recipe_component_use_schema {
            let children = compile_children(self.kind(), html, ctx, factory);
            let mut values = TokenValues::new();
            if let Some(url) = url_value(&schema, ctx) {
                values.insert("#url#".into(), url);
            }
            values.insert("#components#".into(), Value::Array(children));
            component.register_json("wrapper-only-json", &values, ctx);
            return;
        }

        let theme = ctx.theme.clone();
        let mut values = TokenValues::new();
        let insert = |values: &mut TokenValues, token: &str, value: Option<Value>| {
            if let Some(value) = value {
                values.insert(token.to_string(), value);
            }
        };

        insert(&mut values, "#url#", url_value(&schema, ctx));
        let photo = photo_url(schema.get("image"))
            .map(|url| component.maybe_bundle_source(&url, None, ctx));
        insert(&mut values, "#recipe_photo_url#", photo.map(Value::String));
        insert(
            &mut values,
            "#recipe_photo_caption#",
            schema
                .get("image")
                .and_then(|image| image.get("caption"))
                .cloned(),
        );
        insert(&mut values, "#recipe_title#", schema.get("name").cloned());
        insert(
            &mut values,
            "#recipe_yield#",
            schema
                .get("recipeYield")
                .and_then(Value::as_str)
                .map(|text| detail_line("Yields:", text)),
        );
        insert(&mut values, "#recipe_prep_time#", duration_line(&schema, "prepTime", "Prep Time:"));
        insert(&mut values, "#recipe_cook_time#", duration_line(&schema, "cookTime", "Cook Time:"));
        insert(
            &mut values,
            "#recipe_total_time#",
            duration_line(&schema, "totalTime", "Total Time:"),
        );
        insert(&mut values, "#recipe_calories_per_serving#", calories_line(&schema));
        insert(&mut values, "#recipe_ingredients#", ingredients_list(&schema));
        insert(
            &mut values,
            "#recipe_instructions#",
            instructions_value(component, &schema, ctx),
        );

        component.register_json("json", &values, ctx);
        let pruned = prune_unresolved(component.json_root()).unwrap_or(Value::Null);
        component.set_json_root(pruned);

        register_support_styles(component, &theme, ctx);
    }
}

fn detail_line(label: &str, text: &str) -> Value {
    json!(format!(
        "<p><strong>{}</strong> {}</p>",
        encode_text(label),
        encode_text(text)
    ))
}

fn url_value(schema: &Value, ctx: &CompileContext) -> Option<Value> {
    schema
        .get("url")
        .and_then(Value::as_str)
        .map(|url| json!(url))
        .or_else(|| ctx.permalink.as_ref().map(|url| json!(url)))
}

/// The photo URL from a schema `image` value, which can be an ImageObject,
/// a list, or a bare URL string.
fn photo_url(image: Option<&Value>) -> Option<String> {
    let image = image?;
    let url = image
        .get("contentUrl")
        .or_else(|| image.get("url"))
        .or_else(|| image.get(0))
        .unwrap_or(image);
    url.as_str().map(str::to_string)
}

/// Seconds counted from an ISO 8601 duration string.
fn duration_seconds(duration: &str) -> Option<u64> {
    let caps = DURATION.captures(duration)?;
    let part = |index: usize| {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    if (1..=5).all(|index| caps.get(index).is_none()) {
        return None;
    }
    Some(part(1) * 604_800 + part(2) * 86_400 + part(3) * 3_600 + part(4) * 60 + part(5))
}

/// Renders a duration as `N hr M mins`, omitting zero parts.
fn format_duration(seconds: u64) -> String {
    let minute_seconds = seconds % 3_600;
    let hour_seconds = seconds - minute_seconds;
    let mut out = Vec::new();
    if hour_seconds > 0 {
        out.push(format!("{} hr", hour_seconds / 3_600));
    }
    if minute_seconds > 0 {
        out.push(format!("{} mins", (minute_seconds as f64 / 60.0).round() as u64));
    }
    out.join(" ")
}

fn duration_line(schema: &Value, field: &str, label: &str) -> Option<Value> {
    let duration = schema.get(field)?.as_str()?;
    let seconds = duration_seconds(duration)?;
    Some(detail_line(label, &format_duration(seconds)))
}

fn calories_line(schema: &Value) -> Option<Value> {
    let calories = schema.get("nutrition")?.get("calories")?.as_str()?;
    let digits: String = calories.chars().filter(char::is_ascii_digit).collect();
    Some(detail_line("Calories/Serving:", &digits))
}

fn ingredients_list(schema: &Value) -> Option<Value> {
    let ingredients = schema.get("recipeIngredient")?;
    let mut out = String::from("<ul>");
    match ingredients {
        Value::Array(items) => {
            for item in items {
                if let Some(text) = item.as_str() {
                    out.push_str(&format!("<li>{}</li>", encode_text(text)));
                }
            }
        }
        Value::String(text) => out.push_str(&format!("<li>{}</li>", encode_text(text))),
        _ => return None,
    }
    out.push_str("</ul>");
    Some(json!(out))
}

/// Compiles `recipeInstructions` into an array of step containers. Supports
/// a bare string, a list of strings, and HowToStep / HowToSection objects.
fn instructions_value(
    component: &mut Component,
    schema: &Value,
    ctx: &mut CompileContext,
) -> Option<Value> {
    let instructions = schema.get("recipeInstructions")?;
    let step_spec = component.spec("recipe-step-json")?.clone();
    let section_spec = component.spec("recipe-section-json").cloned();
    let section_step_spec = component.spec("recipe-section-step-json").cloned();

    let steps = match instructions {
        Value::String(text) => vec![plain_step(&step_spec, text, ctx)],
        Value::Array(items) if !items.is_empty() => {
            if items[0].is_string() {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|text| plain_step(&step_spec, text, ctx))
                    .collect()
            } else if items[0].is_object() {
                how_to_steps(
                    component,
                    items,
                    &step_spec,
                    section_spec.as_ref(),
                    section_step_spec.as_ref(),
                    ctx,
                )
            } else {
                return None;
            }
        }
        _ => return None,
    };

    prune_unresolved(&Value::Array(steps))
}

fn plain_step(step_spec: &ComponentSpec, text: &str, ctx: &CompileContext) -> Value {
    let mut values = TokenValues::new();
    values.insert("#recipe_step_text#".into(), json!(text));
    ctx.substitute_spec(step_spec, &values)
}

/// HowToStep objects, possibly grouped into HowToSection objects.
fn how_to_steps(
    component: &Component,
    items: &[Value],
    step_spec: &ComponentSpec,
    section_spec: Option<&ComponentSpec>,
    section_step_spec: Option<&ComponentSpec>,
    ctx: &mut CompileContext,
) -> Vec<Value> {
    let mut out = Vec::new();
    for item in items {
        match item.get("@type").and_then(Value::as_str) {
            Some("HowToSection") => {
                let (Some(section_spec), Some(section_step_spec)) = (section_spec, section_step_spec)
                else {
                    continue;
                };
                let Some(elements) = item.get("itemListElement").and_then(Value::as_array) else {
                    continue;
                };
                let inner = how_to_steps(
                    component,
                    elements,
                    section_step_spec,
                    Some(section_spec),
                    Some(section_step_spec),
                    ctx,
                );
                let mut values = TokenValues::new();
                if let Some(name) = item.get("name").cloned() {
                    values.insert("#recipe_section_name#".into(), name);
                }
                values.insert("#components#".into(), Value::Array(inner));
                out.push(ctx.substitute_spec(section_spec, &values));
            }
            Some("HowToStep") => {
                let mut name = item.get("name").and_then(Value::as_str);
                let text = item.get("text").and_then(Value::as_str);
                // Some generators emit identical name and text; use just the
                // body text in that case.
                if name == text {
                    name = None;
                }
                let mut values = TokenValues::new();
                if let Some(name) = name {
                    values.insert("#recipe_step_name#".into(), json!(name));
                }
                if let Some(url) = photo_url(item.get("image")) {
                    let bundled = component.maybe_bundle_source(&url, None, ctx);
                    values.insert("#recipe_step_photo_url#".into(), json!(bundled));
                }
                if let Some(text) = text {
                    values.insert("#recipe_step_text#".into(), json!(text));
                }
                out.push(ctx.substitute_spec(step_spec, &values));
            }
            _ => {}
        }
    }
    out
}

fn register_support_styles(component: &mut Component, theme: &Theme, ctx: &mut CompileContext) {
    let str_token = |values: &mut TokenValues, key: &str| {
        values.insert(
            format!("#{key}#"),
            theme.get(key).cloned().unwrap_or_else(|| json!("")),
        );
    };
    let int_token = |values: &mut TokenValues, key: &str| {
        values.insert(format!("#{key}#"), json!(theme.get_int(key).unwrap_or(0)));
    };
    let tracking_token = |values: &mut TokenValues, key: &str| {
        values.insert(
            format!("#{key}#"),
            json!(theme.get_int(key).unwrap_or(0) as f64 / 100.0),
        );
    };

    let style_values = |prefix: &str, link: bool| {
        let mut values = TokenValues::new();
        str_token(&mut values, &format!("{prefix}_font"));
        int_token(&mut values, &format!("{prefix}_size"));
        int_token(&mut values, &format!("{prefix}_line_height"));
        tracking_token(&mut values, &format!("{prefix}_tracking"));
        str_token(&mut values, &format!("{prefix}_color"));
        str_token(&mut values, &format!("{prefix}_color_dark"));
        if link {
            str_token(&mut values, &format!("{prefix}_link_color"));
            str_token(&mut values, &format!("{prefix}_link_color_dark"));
        }
        values
    };

    let empty = TokenValues::new();
    component.register_layout("recipe-body-layout", "recipe-body-layout", &empty, None, ctx);
    component.register_style(
        "recipe-body-style",
        "recipe-body-style",
        &style_values("recipe_body", true),
        None,
        ctx,
    );
    component.register_layout("recipe-header2-layout", "recipe-header2-layout", &empty, None, ctx);
    component.register_style(
        "recipe-header2-style",
        "recipe-header2-style",
        &style_values("recipe_header2", false),
        None,
        ctx,
    );
    component.register_layout("recipe-header3-layout", "recipe-header3-layout", &empty, None, ctx);
    component.register_style(
        "recipe-header3-style",
        "recipe-header3-style",
        &style_values("recipe_header3", false),
        None,
        ctx,
    );
    component.register_layout("recipe-details-layout", "recipe-details-layout", &empty, None, ctx);
    component.register_style(
        "recipe-details-style",
        "recipe-details-style",
        &style_values("recipe_details", true),
        None,
        ctx,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RecipeSchemaProvider;
    use crate::settings::Settings;

    struct FixedSchema(Value);

    impl RecipeSchemaProvider for FixedSchema {
        fn schema_for(&self, _html: &str, _content_id: &str) -> Option<Value> {
            Some(self.0.clone())
        }
    }

    fn ctx_with_schema(schema: Value, settings: Settings) -> CompileContext {
        CompileContext::new(Theme::default(), settings, "7")
            .with_recipe_schemas(Box::new(FixedSchema(schema)))
    }

    fn settings() -> Settings {
        Settings {
            recipe_component_class: Some("recipe-card".to_string()),
            ..Settings::default()
        }
    }

    fn stew_schema() -> Value {
        json!({
            "@type": "Recipe",
            "url": "https://x.test/stew",
            "name": "Winter Stew",
            "recipeYield": "4 servings",
            "prepTime": "PT20M",
            "cookTime": "PT1H30M",
            "recipeIngredient": ["1 onion", "2 carrots & parsnips"],
            "recipeInstructions": [
                { "@type": "HowToStep", "name": "Prep", "text": "Chop everything." },
                { "@type": "HowToStep", "text": "Simmer for an hour." },
            ],
        })
    }

    fn build(html: &str, ctx: &mut CompileContext) -> Component {
        ComponentFactory::standard()
            .component("recipe", html, None, ctx)
            .expect("known kind")
    }

    #[test]
    fn parses_iso_durations() {
        assert_eq!(duration_seconds("PT20M"), Some(1200));
        assert_eq!(duration_seconds("PT1H30M"), Some(5400));
        assert_eq!(duration_seconds("P1DT2H"), Some(93600));
        assert_eq!(duration_seconds("20 minutes"), None);
        assert_eq!(duration_seconds("P"), None);
    }

    #[test]
    fn formats_durations_without_zero_parts() {
        assert_eq!(format_duration(1200), "20 mins");
        assert_eq!(format_duration(5400), "1 hr 30 mins");
        assert_eq!(format_duration(7200), "2 hr");
    }

    #[test]
    fn compiles_schema_into_recipe_json() {
        let mut ctx = ctx_with_schema(stew_schema(), settings());
        let component = build("<div class=\"recipe-card\"><p>Winter Stew</p></div>", &mut ctx);
        let output = component.to_output().expect("recipe output");
        assert_eq!(output["role"], json!("recipe"));
        assert_eq!(output["URL"], json!("https://x.test/stew"));
        let rendered = serde_json::to_string(&output).expect("serializes");
        assert!(rendered.contains("Winter Stew"));
        assert!(rendered.contains("<p><strong>Prep Time:</strong> 20 mins</p>"));
        assert!(rendered.contains("<p><strong>Cook Time:</strong> 1 hr 30 mins</p>"));
        assert!(rendered.contains("<li>2 carrots &amp; parsnips</li>"));
        // No placeholder text may leak into the final document.
        assert!(!rendered.contains("#recipe_"));
        assert!(ctx.text_styles.get("recipe-body-style").is_some());
        assert!(ctx.layouts.get("recipe-details-layout").is_some());
    }

    #[test]
    fn step_without_name_omits_the_heading_slot() {
        let mut ctx = ctx_with_schema(stew_schema(), settings());
        let component = build("<div class=\"recipe-card\"></div>", &mut ctx);
        let rendered = serde_json::to_string(&component.to_output().expect("output")).unwrap();
        assert!(rendered.contains("Chop everything."));
        assert!(rendered.contains("Simmer for an hour."));
        // The second step has no name, so its heading container is pruned.
        assert_eq!(rendered.matches("heading3").count(), 1);
    }

    #[test]
    fn identical_name_and_text_suppresses_the_heading() {
        let schema = json!({
            "@type": "Recipe",
            "url": "https://x.test/r",
            "name": "R",
            "recipeInstructions": [
                { "@type": "HowToStep", "name": "Stir.", "text": "Stir." },
            ],
        });
        let mut ctx = ctx_with_schema(schema, settings());
        let component = build("<div class=\"recipe-card\"></div>", &mut ctx);
        let rendered = serde_json::to_string(&component.to_output().expect("output")).unwrap();
        assert_eq!(rendered.matches("Stir.").count(), 1);
    }

    #[test]
    fn sections_nest_their_steps() {
        let schema = json!({
            "@type": "Recipe",
            "url": "https://x.test/r",
            "name": "R",
            "recipeInstructions": [
                {
                    "@type": "HowToSection",
                    "name": "Make the dough",
                    "itemListElement": [
                        { "@type": "HowToStep", "text": "Mix flour and water." },
                    ],
                },
            ],
        });
        let mut ctx = ctx_with_schema(schema, settings());
        let component = build("<div class=\"recipe-card\"></div>", &mut ctx);
        let rendered = serde_json::to_string(&component.to_output().expect("output")).unwrap();
        assert!(rendered.contains("Make the dough"));
        assert!(rendered.contains("Mix flour and water."));
    }

    #[test]
    fn no_schema_means_no_output() {
        let mut ctx = CompileContext::new(Theme::default(), settings(), "7");
        let component = build("<div class=\"recipe-card\"></div>", &mut ctx);
        assert_eq!(component.to_output(), None);
    }

    #[test]
    fn wrapper_mode_compiles_children_as_subcomponents() {
        let mut ctx = ctx_with_schema(
            stew_schema(),
            Settings {
                recipe_component_use_schema: false,
                ..settings()
            },
        );
        let component = build(
            "<div class=\"recipe-card\"><h2>Winter Stew</h2><p>Chop and simmer.</p></div>",
            &mut ctx,
        );
        let output = component.to_output().expect("wrapper output");
        assert_eq!(output["role"], json!("recipe"));
        let children = output["components"].as_array().expect("children");
        assert_eq!(children.len(), 2);
        assert!(ctx.text_styles.get("recipe-subcomponent-default-body").is_some());
    }
}
