#![deny(missing_docs)]
//! Pressroom markup: tolerant HTML parsing and tree access for article content.

/// Markup tree node handle and queries.
pub mod node;
/// Tolerant document parsing.
pub mod parse;

pub use node::MarkupNode;
pub use parse::{MarkupDocument, parse_markup};
