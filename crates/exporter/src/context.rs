//! Compile-scoped state and injected collaborators.

use crate::registry::StyleRegistry;
use crate::settings::Settings;
use crate::spec::{ComponentSpec, NoopPostProcessor, SpecPostProcessor, SpecStore};
use crate::template::TokenValues;
use crate::theme::Theme;
use serde_json::Value;

/// Receives structural diagnostics as `(category, identifier)` pairs.
pub trait DiagnosticsSink {
    /// Records one diagnostic, e.g. `("component_errors", "marquee")`.
    fn log_error(&mut self, category: &str, identifier: &str);
}

/// The default sink: collects diagnostics for inspection after the compile.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    /// Recorded `(category, identifier)` pairs in occurrence order.
    pub errors: Vec<(String, String)>,
}

impl CollectedDiagnostics {
    /// Identifiers recorded under the given category.
    pub fn in_category(&self, category: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(c, _)| c == category)
            .map(|(_, id)| id.as_str())
            .collect()
    }
}

impl DiagnosticsSink for CollectedDiagnostics {
    fn log_error(&mut self, category: &str, identifier: &str) {
        self.errors
            .push((category.to_string(), identifier.to_string()));
    }
}

/// Receives bundle requests for media that should ship with the document.
///
/// The exporter decides *that* a source needs bundling (per the remote-media
/// setting) and hands `(filename, source)` to this collaborator; the actual
/// fetch/bundle mechanics live in the host.
pub trait MediaResolver {
    /// Requests that `source` be bundled under `filename`.
    fn bundle_source(&mut self, filename: &str, source: &str);
}

/// The default resolver: records bundle requests and does nothing else.
#[derive(Debug, Default)]
pub struct BundleRecorder;

impl MediaResolver for BundleRecorder {
    fn bundle_source(&mut self, _filename: &str, _source: &str) {}
}

/// Supplies structured recipe data for a recipe markup fragment.
///
/// Discovery (scanning the post content or fetching the live page for
/// JSON-LD) is host territory; the exporter only consumes the result.
pub trait RecipeSchemaProvider {
    /// Returns the schema item matching the fragment, if any.
    fn schema_for(&self, html: &str, content_id: &str) -> Option<Value>;
}

/// The default provider: never finds a schema.
#[derive(Debug, Default)]
pub struct NoSchemaProvider;

impl RecipeSchemaProvider for NoSchemaProvider {
    fn schema_for(&self, _html: &str, _content_id: &str) -> Option<Value> {
        None
    }
}

/// Shared state for one compile.
///
/// Registries and diagnostics are written by many components during a single
/// compile but never shared across compiles; construct a fresh context per
/// document.
pub struct CompileContext {
    /// The active theme.
    pub theme: Theme,
    /// Site-wide settings.
    pub settings: Settings,
    /// Opaque per-article identifier.
    pub content_id: String,
    /// Canonical URL of the article, when known.
    pub permalink: Option<String>,
    /// Layout registry.
    pub layouts: StyleRegistry,
    /// Text style registry.
    pub text_styles: StyleRegistry,
    /// Component style registry.
    pub component_styles: StyleRegistry,
    /// Recorded diagnostics for this compile.
    pub diagnostics: CollectedDiagnostics,
    /// Recorded `(filename, source)` bundle requests for this compile.
    pub bundle_requests: Vec<(String, String)>,
    media: Box<dyn MediaResolver>,
    recipe_schemas: Box<dyn RecipeSchemaProvider>,
    spec_store: Box<dyn SpecStore>,
    post_processor: Box<dyn SpecPostProcessor>,
    external_sink: Option<Box<dyn DiagnosticsSink>>,
}

impl CompileContext {
    /// Creates a context with default collaborators.
    pub fn new(theme: Theme, settings: Settings, content_id: &str) -> Self {
        Self {
            theme,
            settings,
            content_id: content_id.to_string(),
            permalink: None,
            layouts: StyleRegistry::new(),
            text_styles: StyleRegistry::new(),
            component_styles: StyleRegistry::new(),
            diagnostics: CollectedDiagnostics::default(),
            bundle_requests: Vec::new(),
            media: Box::new(BundleRecorder),
            recipe_schemas: Box::new(NoSchemaProvider),
            spec_store: Box::new(crate::spec::MemorySpecStore::new()),
            post_processor: Box::new(NoopPostProcessor),
            external_sink: None,
        }
    }

    /// Replaces the media resolver.
    pub fn with_media(mut self, media: Box<dyn MediaResolver>) -> Self {
        self.media = media;
        self
    }

    /// Replaces the recipe schema provider.
    pub fn with_recipe_schemas(mut self, provider: Box<dyn RecipeSchemaProvider>) -> Self {
        self.recipe_schemas = provider;
        self
    }

    /// Replaces the spec customization store.
    pub fn with_spec_store(mut self, store: Box<dyn SpecStore>) -> Self {
        self.spec_store = store;
        self
    }

    /// Replaces the spec post-processor.
    pub fn with_post_processor(mut self, post: Box<dyn SpecPostProcessor>) -> Self {
        self.post_processor = post;
        self
    }

    /// Forwards diagnostics to an external sink in addition to recording them.
    pub fn with_diagnostics_sink(mut self, sink: Box<dyn DiagnosticsSink>) -> Self {
        self.external_sink = Some(sink);
        self
    }

    /// Records a structural diagnostic.
    pub fn log_error(&mut self, category: &str, identifier: &str) {
        self.diagnostics.log_error(category, identifier);
        if let Some(sink) = &mut self.external_sink {
            sink.log_error(category, identifier);
        }
    }

    /// Resolves the schema for a recipe fragment.
    pub fn recipe_schema(&self, html: &str) -> Option<Value> {
        self.recipe_schemas.schema_for(html, &self.content_id)
    }

    /// Resolves a media source to the URL the document should carry.
    ///
    /// With remote media enabled the source passes through untouched;
    /// otherwise a bundle request is recorded and a `bundle://` reference
    /// is returned.
    pub fn resolve_media(&mut self, source: &str, filename: Option<&str>) -> String {
        if self.settings.use_remote_media {
            return source.to_string();
        }
        let filename = match filename {
            Some(name) => name.to_string(),
            None => filename_from_source(source),
        };
        self.bundle_requests
            .push((filename.clone(), source.to_string()));
        self.media.bundle_source(&filename, source);
        format!("bundle://{filename}")
    }

    /// Substitutes a spec against the active theme's customization, then
    /// applies the post-processor.
    pub fn substitute_spec(&self, spec: &ComponentSpec, values: &TokenValues) -> Value {
        let customization =
            self.spec_store
                .get(&spec.component_kind, &spec.store_name(), &self.theme.name);
        let json = spec.substitute(values, customization.as_ref());
        self.post_processor
            .process(&spec.component_kind, json, &self.content_id)
    }
}

/// Derives a bundle filename from a source URL: the last path segment with
/// any query string stripped.
pub fn filename_from_source(source: &str) -> String {
    let without_query = source.split(['?', '#']).next().unwrap_or(source);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(without_query)
        .to_string()
}
