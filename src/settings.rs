use serde::Deserialize;

use crate::markup::FEATURES_TILE_LAYER;

/// Build configuration, threaded explicitly through the build call chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSettings {
    /// Extract neural/vascular connection shapes into a `ConnectionSet`
    /// instead of labelling them.
    pub functional_connectivity: bool,
    /// Tile layer assigned to features that don't specify one.
    pub default_tile_layer: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            functional_connectivity: false,
            default_tile_layer: FEATURES_TILE_LAYER.to_string(),
        }
    }
}
