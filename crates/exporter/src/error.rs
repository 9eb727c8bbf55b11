use thiserror::Error;

/// Errors surfaced by the exporter.
///
/// Structural problems with article markup are deliberately not errors; they
/// are reported through the diagnostics sink and the offending node is
/// dropped. Only configuration-class defects propagate here.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Markup nesting exceeded the descent guard.
    #[error("markup nesting exceeds {limit} levels")]
    MarkupTooDeep {
        /// The configured depth limit.
        limit: usize,
    },
    /// A spec customization was rejected.
    #[error("invalid spec customization: {0}")]
    InvalidCustomization(String),
    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for exporter results.
pub type Result<T> = std::result::Result<T, ExporterError>;
