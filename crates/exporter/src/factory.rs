//! Recursive descent over the markup tree using the ordered matcher table.

use crate::component::{Component, ComponentHandler, MatchResult};
use crate::components::standard_roster;
use crate::context::CompileContext;
use crate::error::{ExporterError, Result};
use pressroom_markup::MarkupNode;

/// Bound on markup nesting depth during descent.
pub const MAX_DEPTH: usize = 128;

/// Builds components from markup nodes via an ordered handler table.
///
/// Ordering is a correctness-relevant tie-break: the first handler that
/// claims a node wins, so specific matchers sit in front of generic ones.
pub struct ComponentFactory {
    handlers: Vec<Box<dyn ComponentHandler>>,
}

impl ComponentFactory {
    /// The factory with the standard matcher table.
    pub fn standard() -> Self {
        Self {
            handlers: standard_roster(),
        }
    }

    /// A factory with a custom handler table, in match order.
    pub fn with_handlers(handlers: Vec<Box<dyn ComponentHandler>>) -> Self {
        Self { handlers }
    }

    /// The handler registered for a kind.
    pub fn handler(&self, kind: &str) -> Option<&dyn ComponentHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.kind() == kind)
            .map(Box::as_ref)
    }

    /// Constructs and builds one component of the given kind from a markup
    /// fragment. Returns `None` for a kind with no registered handler.
    pub fn component(
        &self,
        kind: &str,
        html: &str,
        parent_kind: Option<&str>,
        ctx: &mut CompileContext,
    ) -> Option<Component> {
        let Some(handler) = self.handler(kind) else {
            log::warn!("no handler registered for component kind `{kind}`");
            return None;
        };
        let mut component = Component::new(kind, html, parent_kind, handler.caps());
        handler.register_specs(&mut component, &ctx.theme);
        handler.build(&mut component, html, ctx, self);
        Some(component)
    }

    /// Components for one markup node, in document order.
    pub fn components_from_node(
        &self,
        node: &MarkupNode,
        parent_kind: Option<&str>,
        ctx: &mut CompileContext,
    ) -> Result<Vec<Component>> {
        self.descend(node, parent_kind, ctx, 0)
    }

    fn descend(
        &self,
        node: &MarkupNode,
        parent_kind: Option<&str>,
        ctx: &mut CompileContext,
        depth: usize,
    ) -> Result<Vec<Component>> {
        if depth > MAX_DEPTH {
            return Err(ExporterError::MarkupTooDeep { limit: MAX_DEPTH });
        }

        for handler in &self.handlers {
            match handler.matches(node, ctx) {
                MatchResult::NoMatch => continue,
                MatchResult::Single(matched) => {
                    let html = matched.to_html();
                    return Ok(self
                        .component(handler.kind(), &html, parent_kind, ctx)
                        .into_iter()
                        .collect());
                }
                // A multi-fragment match replaces the node entirely; its
                // children are not visited again.
                MatchResult::Fragments(fragments) => {
                    let mut out = Vec::new();
                    for (kind, html) in fragments {
                        if let Some(component) = self.component(&kind, &html, parent_kind, ctx) {
                            out.push(component);
                        }
                    }
                    return Ok(out);
                }
            }
        }

        // Unmatched nodes are transparent to their children.
        let mut out = Vec::new();
        for child in node.children() {
            out.extend(self.descend(&child, parent_kind, ctx, depth + 1)?);
        }

        // An unmatched element whose subtree contributed nothing is dropped
        // and reported, except for the default text wrapper.
        if out.is_empty() && node.is_element() {
            let tag = node.tag_name().unwrap_or_default();
            if tag != "p" {
                ctx.log_error("component_errors", &tag);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::theme::Theme;
    use pressroom_markup::parse_markup;

    fn ctx() -> CompileContext {
        CompileContext::new(Theme::default(), Settings::default(), "1")
    }

    fn compile(html: &str, ctx: &mut CompileContext) -> Vec<Component> {
        let factory = ComponentFactory::standard();
        let document = parse_markup(html);
        let mut out = Vec::new();
        for node in document.nodes() {
            out.extend(
                factory
                    .components_from_node(&node, None, ctx)
                    .expect("within depth bound"),
            );
        }
        out
    }

    #[test]
    fn preserves_document_order_across_match_arities() {
        let mut ctx = ctx();
        let components = compile(
            concat!(
                "<p>Intro</p>",
                "<h2><img src=\"https://x.test/a.jpg\">Section</h2>",
                "<p>Outro</p>",
            ),
            &mut ctx,
        );
        let kinds: Vec<&str> = components.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["body", "img", "heading", "body"]);
    }

    #[test]
    fn unmatched_element_with_text_child_is_logged() {
        let mut ctx = ctx();
        let components = compile("<marquee>hi</marquee>", &mut ctx);
        assert!(components.is_empty());
        assert_eq!(
            ctx.diagnostics.in_category("component_errors"),
            vec!["marquee"]
        );
    }

    #[test]
    fn empty_unmatched_subtrees_report_every_level() {
        let mut ctx = ctx();
        let components = compile("<div><marquee>hi</marquee></div>", &mut ctx);
        assert!(components.is_empty());
        assert_eq!(
            ctx.diagnostics.in_category("component_errors"),
            vec!["marquee", "div"]
        );
    }

    #[test]
    fn containers_are_transparent() {
        let mut ctx = ctx();
        let components = compile(
            "<div><section><p>Wrapped text</p><marquee>hi</marquee></section></div>",
            &mut ctx,
        );
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind, "body");
        assert_eq!(
            ctx.diagnostics.in_category("component_errors"),
            vec!["marquee"]
        );
    }

    #[test]
    fn earlier_handlers_win_overlapping_matches() {
        // A figure holding an iframe is matched by the embed handler before
        // the image handler can claim the figure.
        let mut ctx = ctx();
        let components = compile(
            "<figure><iframe src=\"https://v.test/e\"></iframe><img src=\"https://x.test/a.jpg\"></figure>",
            &mut ctx,
        );
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind, "embedvideo");
    }

    #[test]
    fn pathological_nesting_raises_a_depth_error() {
        let mut ctx = ctx();
        let html = format!("{}<p>deep</p>{}", "<div>".repeat(200), "</div>".repeat(200));
        let factory = ComponentFactory::standard();
        let document = parse_markup(&html);
        let result = factory.components_from_node(&document.nodes()[0], None, &mut ctx);
        assert!(matches!(result, Err(ExporterError::MarkupTooDeep { .. })));
    }
}
