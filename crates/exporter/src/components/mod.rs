//! The component roster: one module per kind, plus shared markup probes.
//!
//! Roster order is correctness-relevant. Specific matchers (aside, recipe)
//! run before generic ones (body), and media matchers run before the text
//! matchers that would otherwise swallow their containers.

use crate::component::ComponentHandler;
use once_cell::sync::Lazy;
use regex::Regex;

mod aside;
mod body;
mod divider;
mod embedvideo;
mod heading;
mod image;
mod metadata;
mod quote;
mod recipe;
mod video;

pub use aside::Aside;
pub use body::Body;
pub use divider::Divider;
pub use embedvideo::EmbedVideo;
pub use heading::Heading;
pub use image::Image;
pub use metadata::{Byline, Cover, Title};
pub use quote::Quote;
pub use recipe::Recipe;
pub use video::Video;

/// The standard matcher table, in match order.
pub fn standard_roster() -> Vec<Box<dyn ComponentHandler>> {
    vec![
        Box::new(Aside),
        Box::new(Recipe),
        Box::new(EmbedVideo),
        Box::new(Image),
        Box::new(Video),
        Box::new(Heading),
        Box::new(Quote),
        Box::new(Body),
        Box::new(Divider),
        Box::new(Title),
        Box::new(Byline),
        Box::new(Cover),
    ]
}

static SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src\s*=\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());

/// Extracts the first `src` attribute value from a markup fragment.
pub(crate) fn url_from_src(html: &str) -> Option<String> {
    SRC_ATTR.captures(html).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Strips markup tags, leaving text content.
pub(crate) fn strip_tags(html: &str) -> String {
    TAGS.replace_all(html, "").to_string()
}
