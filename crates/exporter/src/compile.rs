//! The compile driver: one article in, one component document out.

use crate::anchors::resolve_anchors;
use crate::component::Component;
use crate::context::CompileContext;
use crate::error::Result;
use crate::factory::ComponentFactory;
use pressroom_markup::parse_markup;
use serde::Serialize;
use serde_json::Value;

/// One article supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct Article {
    /// Opaque per-article identifier.
    pub content_id: String,
    /// Title text; empty means no title component.
    pub title: String,
    /// Byline text; empty means no byline component.
    pub byline: String,
    /// Cover image URL for the header component.
    pub cover_url: Option<String>,
    /// Canonical URL of the article.
    pub permalink: Option<String>,
    /// The article body markup.
    pub html: String,
}

/// The compiled document: component JSON in document order plus the
/// registries the components referenced by key.
#[derive(Debug, Serialize)]
pub struct CompiledDocument {
    /// Finalized component JSON objects in document order.
    pub components: Vec<Value>,
    /// Layout registry as a JSON object.
    pub layouts: Value,
    /// Text style registry as a JSON object.
    pub text_styles: Value,
    /// Component style registry as a JSON object.
    pub component_styles: Value,
    /// Structural diagnostics recorded during the compile.
    pub errors: Vec<(String, String)>,
    /// Media bundle requests recorded during the compile.
    pub bundle_requests: Vec<(String, String)>,
}

/// Compiles one article with a fresh context.
///
/// Metadata components lead the sequence, then the markup descent, then
/// anchor resolution. Components that produced no usable output are absent
/// from the result rather than failing the compile.
pub fn compile_article(article: &Article, mut ctx: CompileContext) -> Result<CompiledDocument> {
    ctx.content_id = article.content_id.clone();
    ctx.permalink = article.permalink.clone();

    let factory = ComponentFactory::standard();
    let mut components = Vec::new();

    if let Some(cover) = &article.cover_url {
        components.extend(factory.component("cover", cover, None, &mut ctx));
    }
    components.extend(factory.component("title", &article.title, None, &mut ctx));
    components.extend(factory.component("byline", &article.byline, None, &mut ctx));

    let document = parse_markup(&article.html);
    for node in document.nodes() {
        components.extend(factory.components_from_node(&node, None, &mut ctx)?);
    }

    resolve_anchors(&mut components, &mut ctx);

    Ok(CompiledDocument {
        components: components.iter().filter_map(Component::to_output).collect(),
        layouts: ctx.layouts.to_json(),
        text_styles: ctx.text_styles.to_json(),
        component_styles: ctx.component_styles.to_json(),
        errors: ctx.diagnostics.errors.clone(),
        bundle_requests: ctx.bundle_requests.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::theme::Theme;
    use serde_json::json;

    fn article(html: &str) -> Article {
        Article {
            content_id: "42".to_string(),
            title: "A Test Article".to_string(),
            byline: "by A. Writer".to_string(),
            cover_url: None,
            permalink: Some("https://x.test/a-test-article".to_string()),
            html: html.to_string(),
        }
    }

    fn compile(html: &str) -> CompiledDocument {
        let ctx = CompileContext::new(Theme::default(), Settings::default(), "42");
        compile_article(&article(html), ctx).expect("compiles")
    }

    #[test]
    fn metadata_components_lead_the_sequence() {
        let document = compile("<p>Hello.</p>");
        let roles: Vec<&str> = document
            .components
            .iter()
            .filter_map(|c| c["role"].as_str())
            .collect();
        assert_eq!(roles, vec!["title", "byline", "body"]);
    }

    #[test]
    fn empty_metadata_is_omitted() {
        let ctx = CompileContext::new(Theme::default(), Settings::default(), "42");
        let document = compile_article(
            &Article {
                html: "<p>Hello.</p>".to_string(),
                ..Article::default()
            },
            ctx,
        )
        .expect("compiles");
        let roles: Vec<&str> = document
            .components
            .iter()
            .filter_map(|c| c["role"].as_str())
            .collect();
        assert_eq!(roles, vec!["body"]);
    }

    #[test]
    fn unmatched_nodes_surface_as_errors_not_failures() {
        let document = compile("<p>Kept.</p><marquee>hi</marquee>");
        assert_eq!(document.components.len(), 3);
        assert_eq!(
            document.errors,
            vec![("component_errors".to_string(), "marquee".to_string())]
        );
    }

    #[test]
    fn registries_carry_referenced_objects() {
        let document = compile("<p>Hello.</p><hr>");
        assert!(document.text_styles.get("default-body").is_some());
        assert!(document.layouts.get("body-layout").is_some());
        assert_eq!(document.components[3]["role"], json!("divider"));
    }

    #[test]
    fn cover_component_bundles_when_remote_media_is_off() {
        let ctx = CompileContext::new(
            Theme::default(),
            Settings {
                use_remote_media: false,
                ..Settings::default()
            },
            "42",
        );
        let mut article = article("<p>Hello.</p>");
        article.cover_url = Some("https://x.test/img/hero.jpg".to_string());
        let document = compile_article(&article, ctx).expect("compiles");
        assert_eq!(
            document.components[0]["style"]["fill"]["URL"],
            json!("bundle://hero.jpg")
        );
        assert_eq!(
            document.bundle_requests,
            vec![(
                "hero.jpg".to_string(),
                "https://x.test/img/hero.jpg".to_string()
            )]
        );
    }
}
