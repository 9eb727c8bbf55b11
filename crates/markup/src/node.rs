//! A cheap handle over a parsed markup node.

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};

/// A node in a parsed article markup tree.
///
/// Wraps an `rcdom` handle so cloning is cheap and the owning document stays
/// alive for subtree re-serialization.
#[derive(Clone)]
pub struct MarkupNode {
    handle: Handle,
}

impl MarkupNode {
    /// Wraps a raw `rcdom` handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    /// Returns the underlying `rcdom` handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns true if this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self.handle.data, NodeData::Element { .. })
    }

    /// Returns true if this node is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self.handle.data, NodeData::Text { .. })
    }

    /// The lowercase tag name, or `None` for non-element nodes.
    pub fn tag_name(&self) -> Option<String> {
        match &self.handle.data {
            NodeData::Element { name, .. } => Some(name.local.to_ascii_lowercase().to_string()),
            _ => None,
        }
    }

    /// The value of the named attribute, if present.
    pub fn attr(&self, attr_name: &str) -> Option<String> {
        match &self.handle.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    /// Returns true if the node's `class` attribute contains the given class,
    /// matched against whitespace-delimited entries.
    pub fn has_class(&self, class_name: &str) -> bool {
        match self.attr("class") {
            Some(classes) => classes.split_whitespace().any(|c| c == class_name),
            None => false,
        }
    }

    /// Child nodes in document order.
    pub fn children(&self) -> Vec<MarkupNode> {
        self.handle
            .children
            .borrow()
            .iter()
            .map(|child| MarkupNode::from_handle(child.clone()))
            .collect()
    }

    /// Returns true if the node has any children.
    pub fn has_children(&self) -> bool {
        !self.handle.children.borrow().is_empty()
    }

    /// The concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.handle, &mut out);
        out
    }

    /// Depth-first search for the first element with the given tag name,
    /// including this node itself.
    pub fn find_descendant(&self, tag: &str) -> Option<MarkupNode> {
        if self.tag_name().as_deref() == Some(tag) {
            return Some(self.clone());
        }
        for child in self.children() {
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Re-serializes this subtree (including the node itself) to markup text.
    ///
    /// Text nodes serialize to their content; serialization failures degrade
    /// to an empty string rather than aborting a compile.
    pub fn to_html(&self) -> String {
        match &self.handle.data {
            NodeData::Text { contents } => return contents.borrow().to_string(),
            NodeData::Element { .. } => {}
            _ => return String::new(),
        }

        let mut buf = Vec::new();
        let serializable = SerializableHandle::from(self.handle.clone());
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        };
        if let Err(err) = serialize(&mut buf, &serializable, opts) {
            log::warn!("failed to serialize markup subtree: {err}");
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }

    /// Re-serializes only the node's children, concatenated in order.
    pub fn inner_html(&self) -> String {
        self.children().iter().map(|c| c.to_html()).collect()
    }
}

impl std::fmt::Debug for MarkupNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tag_name() {
            Some(tag) => write!(f, "MarkupNode(<{tag}>)"),
            None => write!(f, "MarkupNode(#text)"),
        }
    }
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_markup;

    fn first_node(html: &str) -> crate::MarkupNode {
        parse_markup(html)
            .nodes()
            .into_iter()
            .next()
            .expect("expected at least one node")
    }

    #[test]
    fn reports_tag_and_attributes() {
        let node = first_node(r#"<p class="lead intro" id="p1">Hi</p>"#);
        assert_eq!(node.tag_name().as_deref(), Some("p"));
        assert_eq!(node.attr("id").as_deref(), Some("p1"));
        assert!(node.has_class("lead"));
        assert!(node.has_class("intro"));
        assert!(!node.has_class("le"));
    }

    #[test]
    fn text_content_spans_descendants() {
        let node = first_node("<p>Hello <strong>bold</strong> world</p>");
        assert_eq!(node.text_content(), "Hello bold world");
    }

    #[test]
    fn finds_nested_descendant() {
        let node = first_node("<figure><span><img src=\"x.jpg\"></span></figure>");
        let img = node.find_descendant("img").expect("img should be found");
        assert_eq!(img.attr("src").as_deref(), Some("x.jpg"));
    }

    #[test]
    fn serializes_subtree_back_to_markup() {
        let node = first_node("<p>Hello <em>there</em></p>");
        let html = node.to_html();
        assert!(html.starts_with("<p>"));
        assert!(html.contains("<em>there</em>"));
    }
}
