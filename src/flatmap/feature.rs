use std::fmt;

use geo::Geometry;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::geom;
use crate::markup::keys;

use super::properties::Properties;

/// Numeric feature identifier, assigned once at creation and unique within
/// a build. Doubles as the feature's index in the build's feature arena.
/// The tiling stage requires feature ids to be numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl FeatureId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single addressable map element: geometry plus an open property mapping.
///
/// Two reserved properties are populated at construction: `featureId`
/// mirrors the numeric id for the map viewer, and `geometry` holds the
/// geometry's kind string.
#[derive(Debug, Clone)]
pub struct Feature {
    feature_id: FeatureId,
    geometry: Geometry<f64>,
    properties: Properties,
    has_children: bool,
}

impl Feature {
    pub(crate) fn new(
        feature_id: FeatureId,
        geometry: Geometry<f64>,
        mut properties: Properties,
        has_children: bool,
    ) -> Self {
        properties.set(keys::FEATURE_ID, feature_id.0);
        properties.set(keys::GEOMETRY, geom::geometry_kind(&geometry));
        Self { feature_id, geometry, properties, has_children }
    }

    pub fn feature_id(&self) -> FeatureId {
        self.feature_id
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// Replace the geometry in place, e.g. after post-processing.
    pub fn set_geometry(&mut self, geometry: Geometry<f64>) {
        self.properties.set(keys::GEOMETRY, geom::geometry_kind(&geometry));
        self.geometry = geometry;
    }

    pub fn geom_type(&self) -> &'static str {
        geom::geometry_kind(&self.geometry)
    }

    /// External identifier (the `id` property), distinct from the numeric id.
    pub fn id(&self) -> Option<&str> {
        self.properties.get_str(keys::ID)
    }

    /// Anatomical model identifier (the `models` property).
    pub fn models(&self) -> Option<&str> {
        self.properties.get_str(keys::MODELS)
    }

    /// True for synthetic features summarizing a shape group.
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    pub fn is_visible(&self) -> bool {
        !self.properties.truthy(keys::INVISIBLE)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn get_property_str(&self, key: &str) -> Option<&str> {
        self.properties.get_str(key)
    }

    /// Set a property; a null value deletes the key.
    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.set(key, value);
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.has(key)
    }

    pub fn del_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Path descriptions are large and drown out the rest of the mapping.
        let readable: Map<String, Value> = self
            .properties
            .iter()
            .filter(|(key, _)| *key != keys::BEZIER_PATH)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        write!(
            f,
            "Feature {}: {} {}",
            self.feature_id,
            self.geom_type(),
            Value::Object(readable)
        )
    }
}
