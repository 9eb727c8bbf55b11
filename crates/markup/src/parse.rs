//! Tolerant parsing of article markup.

use crate::MarkupNode;
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::RcDom;

/// A parsed article markup document.
///
/// Holds the full DOM so node handles remain valid; the interesting content
/// is the sequence of top-level nodes inside `<body>`.
pub struct MarkupDocument {
    dom: RcDom,
}

impl MarkupDocument {
    /// Top-level content nodes in document order.
    ///
    /// These are the direct children of the document body; the html/head/body
    /// scaffolding the parser synthesizes is not part of article content.
    pub fn nodes(&self) -> Vec<MarkupNode> {
        let root = MarkupNode::from_handle(self.dom.document.clone());
        match root.find_descendant("body") {
            Some(body) => body.children(),
            None => Vec::new(),
        }
    }
}

/// Parses potentially broken article markup into a document.
///
/// The parser recovers from malformed input the way browsers do; this never
/// fails, it just produces the tree the recovery rules imply.
pub fn parse_markup(html: &str) -> MarkupDocument {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    MarkupDocument { dom }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_top_level_sequence_in_order() {
        let doc = parse_markup("<p>one</p><h2>two</h2><p>three</p>");
        let tags: Vec<_> = doc.nodes().iter().filter_map(|n| n.tag_name()).collect();
        assert_eq!(tags, vec!["p", "h2", "p"]);
    }

    #[test]
    fn tolerates_malformed_markup() {
        let doc = parse_markup("<p>unclosed <em>nested<div>block</p>");
        assert!(!doc.nodes().is_empty());
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        let doc = parse_markup("");
        assert!(doc.nodes().is_empty());
    }
}
