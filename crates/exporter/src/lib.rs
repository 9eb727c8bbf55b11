#![deny(missing_docs)]
//! Pressroom exporter: compiles article markup into a themeable component
//! document for a third-party publishing platform.

/// Anchor resolution across the component sequence.
pub mod anchors;
/// The compile driver and article/document types.
pub mod compile;
/// The component abstraction and handler trait.
pub mod component;
/// The component roster, one module per kind.
pub mod components;
/// Compile-scoped state and injected collaborators.
pub mod context;
/// Exporter error types.
pub mod error;
/// Recursive descent tree builder.
pub mod factory;
/// Deduplicated style and layout registries.
pub mod registry;
/// Host-supplied settings.
pub mod settings;
/// Component specs and per-theme customization.
pub mod spec;
/// Template trees, tokens, and pruning.
pub mod template;
/// Themes and layout geometry.
pub mod theme;

pub use anchors::resolve_anchors;
pub use compile::{Article, CompiledDocument, compile_article};
pub use component::{
    AnchorPosition, Component, ComponentCaps, ComponentHandler, MatchResult,
};
pub use context::{
    CollectedDiagnostics, CompileContext, DiagnosticsSink, MediaResolver, RecipeSchemaProvider,
};
pub use error::{ExporterError, Result};
pub use factory::{ComponentFactory, MAX_DEPTH};
pub use registry::StyleRegistry;
pub use settings::Settings;
pub use spec::{ComponentSpec, MemorySpecStore, SpecPostProcessor, SpecStore};
pub use template::{TemplateNode, TokenValues, is_token, prune_unresolved};
pub use theme::Theme;
