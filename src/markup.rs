use std::sync::LazyLock;

use regex::Regex;

use crate::flatmap::Properties;

/// Markup vocabulary read from shape annotations. The vocabulary is defined
/// by the drawing sources; this core only consumes it.
pub mod keys {
    /// External (viewer-facing) identifier of a feature.
    pub const ID: &str = "id";
    /// Class label shared by related features.
    pub const CLASS: &str = "class";
    /// Anatomical model identifier (ontology term).
    pub const MODELS: &str = "models";
    pub const LABEL: &str = "label";
    pub const NAME: &str = "name";
    /// Tile layer the feature is written to, passed through to the viewer.
    pub const TILE_LAYER: &str = "tile-layer";
    pub const INVISIBLE: &str = "invisible";
    pub const EXCLUDE: &str = "exclude";
    /// Marks a shape as a non-rendered path definition.
    pub const PATH: &str = "path";
    /// Set by upstream markup parsing when annotation was unparseable.
    pub const ERROR: &str = "error";
    /// Mirror of the numeric feature id, used by the map viewer.
    pub const FEATURE_ID: &str = "featureId";
    /// Geometry kind string, set at feature construction.
    pub const GEOMETRY: &str = "geometry";
    pub const SHAPE_TYPE: &str = "shape-type";
    pub const SHAPE_ID: &str = "shape-id";
    pub const FC_CLASS: &str = "fc-class";
    pub const KIND: &str = "kind";
    /// Large path-geometry description; excluded from debug renderings.
    pub const BEZIER_PATH: &str = "bezier-path";
}

/// Default tile layer for features that don't specify one.
pub const FEATURES_TILE_LAYER: &str = "features";

/// Shape-level markup validation seam. Source adapters substitute their own
/// vocabulary rules; a validation failure drops the shape without aborting
/// the build.
pub trait MarkupValidator {
    /// Returns an error message when the shape's markup is invalid.
    fn validate(&self, properties: &Properties) -> Option<String>;
}

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_./-]*$").unwrap());

static ONTOLOGY_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+:[A-Za-z0-9_.-]+$").unwrap());

/// Syntax-level validator for the common markup keys: identifiers and class
/// labels must be word-like, anatomical terms must be `PREFIX:term` ontology
/// references (e.g. `UBERON:0000948`).
#[derive(Debug, Default)]
pub struct SyntaxValidator;

impl MarkupValidator for SyntaxValidator {
    fn validate(&self, properties: &Properties) -> Option<String> {
        for key in [keys::ID, keys::CLASS] {
            if let Some(value) = properties.get_str(key) {
                if !value.is_empty() && !IDENTIFIER.is_match(value) {
                    return Some(format!("invalid {} markup: {}", key, value));
                }
            }
        }
        if let Some(models) = properties.get_str(keys::MODELS) {
            for term in models.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if !ONTOLOGY_TERM.is_match(term) {
                    return Some(format!("invalid anatomical term: {}", term));
                }
            }
        }
        None
    }
}
