//! Site-wide settings supplied by the host application.

use serde::{Deserialize, Serialize};

/// Named configuration values that influence a compile.
///
/// These come from the host's settings storage; the exporter only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keep media at their remote URLs instead of bundling them.
    pub use_remote_media: bool,
    /// Let non-anchored images ignore the document margin.
    pub full_bleed_images: bool,
    /// Emit rich HTML text instead of lightweight markup.
    pub html_support: bool,
    /// Use the `image` role instead of `photo` for images.
    pub use_image_component: bool,
    /// Class that marks an element as a recipe block.
    pub recipe_component_class: Option<String>,
    /// Compile recipes from discovered schema instead of their markup.
    pub recipe_component_use_schema: bool,
    /// Class that marks an element as an aside block.
    pub aside_component_class: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_remote_media: true,
            full_bleed_images: false,
            html_support: true,
            use_image_component: false,
            recipe_component_class: None,
            recipe_component_use_schema: true,
            aside_component_class: None,
        }
    }
}
