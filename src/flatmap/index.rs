use ahash::AHashMap;
use geo::Geometry;
use smallvec::{smallvec, SmallVec};

use crate::markup::keys;

use super::feature::{Feature, FeatureId};
use super::properties::Properties;

/// Lookup result; the common case is a single feature.
pub type FeatureIds = SmallVec<[FeatureId; 1]>;

/// Owns every feature created during a build and indexes them by external
/// id, class label and anatomical model identifier.
///
/// Features are registered exactly once, at creation, and never removed;
/// one index exists per map-build run. `FeatureId`s are arena indices, so
/// numeric ids are assigned in creation order.
#[derive(Debug, Default)]
pub struct FeatureIndex {
    features: Vec<Feature>,
    id_to_feature: AHashMap<String, FeatureId>,
    class_to_features: AHashMap<String, Vec<FeatureId>>,
    model_to_features: AHashMap<String, Vec<FeatureId>>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feature, assign it the next numeric id and register it.
    pub fn new_feature(
        &mut self,
        geometry: Geometry<f64>,
        properties: Properties,
        has_children: bool,
    ) -> FeatureId {
        let feature_id = FeatureId(self.features.len() as u64);
        let feature = Feature::new(feature_id, geometry, properties, has_children);
        self.register(&feature);
        self.features.push(feature);
        feature_id
    }

    fn register(&mut self, feature: &Feature) {
        let feature_id = feature.feature_id();
        if let Some(id) = feature.id() {
            if !id.is_empty() {
                // Last write wins; duplicate detection is advisory only.
                self.id_to_feature.insert(id.to_string(), feature_id);
            }
        }
        if feature.has_property(keys::CLASS) {
            if let Some(class) = feature.get_property_str(keys::CLASS) {
                self.class_to_features
                    .entry(class.to_string())
                    .or_default()
                    .push(feature_id);
            }
        }
        if let Some(models) = feature.models() {
            if !models.is_empty() {
                self.model_to_features
                    .entry(models.to_string())
                    .or_default()
                    .push(feature_id);
            }
        }
    }

    /// True when an earlier registration already claimed this external id.
    pub fn is_duplicate_id(&self, id: &str) -> bool {
        self.id_to_feature.contains_key(id)
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.index())
    }

    pub fn get_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.get_mut(id.index())
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Resolve an identifier that may be an external id or a class label.
    /// An id match returns that single feature; otherwise all features of
    /// the class, in registration order.
    pub fn lookup(&self, identifier: &str) -> FeatureIds {
        match self.id_to_feature.get(identifier) {
            Some(&feature_id) => smallvec![feature_id],
            None => self
                .class_to_features
                .get(identifier)
                .map(|ids| SmallVec::from_slice(ids))
                .unwrap_or_default(),
        }
    }

    /// Flatten `lookup` over a list of identifiers, preserving input order
    /// then registration order.
    pub fn resolve_ids<'a>(
        &self,
        identifiers: impl IntoIterator<Item = &'a str>,
    ) -> Vec<FeatureId> {
        identifiers
            .into_iter()
            .flat_map(|identifier| self.lookup(identifier))
            .collect()
    }

    /// Features claiming an anatomical model identifier, in registration
    /// order.
    pub fn features_with_model(&self, model: &str) -> &[FeatureId] {
        self.model_to_features
            .get(model)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
