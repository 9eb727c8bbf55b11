//! Themes: named bundles of style and layout parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// A named bundle of styling values plus layout geometry.
///
/// Exactly one theme is active per compile; themes are immutable value
/// objects loaded from configuration. Styling values are looked up by name;
/// a missing value suppresses the template branch that would have used it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Theme name, used to key spec customizations.
    pub name: String,
    /// Total layout columns in the document grid.
    pub layout_columns: u64,
    /// Columns spanned by the body text.
    pub body_column_span: u64,
    /// Body orientation: `left`, `center`, or `right`.
    pub body_orientation: String,
    /// Named styling values (fonts, sizes, colors, spacing).
    pub values: BTreeMap<String, Value>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in [
            ("body_font", json!("AvenirNext-Regular")),
            ("body_size", json!(18)),
            ("body_line_height", json!(26)),
            ("body_tracking", json!(0)),
            ("body_color", json!("#4f4f4f")),
            ("body_link_color", json!("#428bca")),
            ("caption_font", json!("AvenirNext-Italic")),
            ("caption_size", json!(16)),
            ("caption_line_height", json!(24)),
            ("caption_tracking", json!(0)),
            ("caption_color", json!("#4f4f4f")),
            ("caption_margin_bottom", json!(18)),
            ("header_font", json!("AvenirNext-Bold")),
            ("header1_size", json!(48)),
            ("header2_size", json!(32)),
            ("header3_size", json!(24)),
            ("header4_size", json!(21)),
            ("header5_size", json!(18)),
            ("header6_size", json!(16)),
            ("header_color", json!("#333333")),
            ("quote_font", json!("AvenirNext-Bold")),
            ("quote_size", json!(24)),
            ("quote_line_height", json!(36)),
            ("quote_color", json!("#767676")),
            ("divider_color", json!("#e6e6e6")),
            ("divider_width", json!(1)),
            ("title_font", json!("AvenirNext-Bold")),
            ("title_size", json!(48)),
            ("title_color", json!("#333333")),
            ("byline_font", json!("AvenirNext-Medium")),
            ("byline_size", json!(13)),
            ("byline_color", json!("#7c7c7c")),
            ("recipe_background_color", json!("#f7f7f7")),
            ("recipe_title_font", json!("AvenirNext-Bold")),
            ("recipe_title_size", json!(32)),
            ("recipe_title_color", json!("#333333")),
            ("recipe_body_font", json!("AvenirNext-Regular")),
            ("recipe_body_size", json!(16)),
            ("recipe_body_line_height", json!(24)),
            ("recipe_body_tracking", json!(0)),
            ("recipe_body_color", json!("#4f4f4f")),
            ("recipe_body_link_color", json!("#428bca")),
            ("recipe_header2_font", json!("AvenirNext-Bold")),
            ("recipe_header2_size", json!(24)),
            ("recipe_header2_color", json!("#333333")),
            ("recipe_header3_font", json!("AvenirNext-Demibold")),
            ("recipe_header3_size", json!(20)),
            ("recipe_header3_color", json!("#333333")),
            ("recipe_details_font", json!("AvenirNext-Regular")),
            ("recipe_details_size", json!(14)),
            ("recipe_details_color", json!("#4f4f4f")),
            ("recipe_caption_font", json!("AvenirNext-Italic")),
            ("recipe_caption_size", json!(14)),
            ("recipe_caption_color", json!("#4f4f4f")),
        ] {
            values.insert(key.to_string(), value);
        }

        Self {
            name: "default".to_string(),
            layout_columns: 9,
            body_column_span: 7,
            body_orientation: "left".to_string(),
            values,
        }
    }
}

impl Theme {
    /// Looks up a named styling value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Looks up a styling value as an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Returns true if the theme defines a non-empty value for the key.
    ///
    /// Conditional template branches (dark-mode variants and the like) hang
    /// off this check: absence suppresses the branch entirely.
    pub fn defines(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    /// Builder-style value insertion, mainly for tests and theme loading.
    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// The column inset pair for full-width layouts.
    ///
    /// A centered body does not span all columns; full-width components line
    /// up with the body instead: `colStart = (columns - span) / 2`.
    pub fn full_width_columns(&self) -> (u64, u64) {
        if self.body_orientation == "center" {
            let start = (self.layout_columns.saturating_sub(self.body_column_span)) / 2;
            (start, self.body_column_span)
        } else {
            (0, self.layout_columns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_body_computes_symmetric_inset() {
        let theme = Theme {
            layout_columns: 7,
            body_column_span: 5,
            body_orientation: "center".to_string(),
            ..Theme::default()
        };
        assert_eq!(theme.full_width_columns(), (1, 5));
    }

    #[test]
    fn left_body_spans_all_columns() {
        let theme = Theme::default();
        assert_eq!(theme.full_width_columns(), (0, 9));
    }

    #[test]
    fn defines_treats_empty_strings_as_absent() {
        let theme = Theme::default()
            .with_value("caption_color_dark", json!(""))
            .with_value("body_color_dark", json!("#ffffff"));
        assert!(!theme.defines("caption_color_dark"));
        assert!(theme.defines("body_color_dark"));
        assert!(!theme.defines("never_set"));
    }
}
