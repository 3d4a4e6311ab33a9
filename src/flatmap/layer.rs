use anyhow::{bail, Result};
use geo::{BoundingRect, Coord, Geometry, Rect};
use serde_json::{json, Value};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::markup::{keys, MarkupValidator};
use crate::settings::BuildSettings;
use crate::shape::{Shape, ShapeTree};

use super::feature::FeatureId;
use super::index::FeatureIndex;
use super::properties::Properties;

/// The ordered collection of features produced by reducing one slide's
/// shape tree.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    id: String,
    slide_id: String,
    exported: bool,
    features: Vec<FeatureId>,
}

impl FeatureLayer {
    pub(crate) fn new(
        id: String,
        slide_id: String,
        exported: bool,
        features: Vec<FeatureId>,
    ) -> Self {
        Self { id, slide_id, exported, features }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn slide_id(&self) -> &str {
        &self.slide_id
    }

    /// Whether this layer is exported to the map viewer.
    pub fn exported(&self) -> bool {
        self.exported
    }

    /// Feature ids in tile write order.
    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }

    /// Layer record for the downstream index/style writer.
    pub fn metadata(&self) -> Value {
        json!({
            "id": self.id,
            "slide-id": self.slide_id,
            "exported": self.exported,
            "features": self.features,
        })
    }
}

/// Decides whether a group's surviving child features are summarized by one
/// synthetic group feature. The right rule is source-specific, so it is a
/// policy hook rather than a fixed heuristic.
pub trait GroupPolicy {
    /// Offered a group's non-empty child feature list; returning a feature
    /// id replaces the subtree with that single synthetic feature. The
    /// children stay registered in the index either way.
    fn aggregate(
        &self,
        children: &[FeatureId],
        index: &mut FeatureIndex,
    ) -> Result<Option<FeatureId>>;
}

/// Never aggregates; groups flatten into their children.
#[derive(Debug, Default)]
pub struct NoGroups;

impl GroupPolicy for NoGroups {
    fn aggregate(&self, _: &[FeatureId], _: &mut FeatureIndex) -> Result<Option<FeatureId>> {
        Ok(None)
    }
}

/// Summarizes groups of two or more features with a rectangular hull.
#[derive(Debug, Default)]
pub struct BoundingBoxGroups;

impl GroupPolicy for BoundingBoxGroups {
    fn aggregate(
        &self,
        children: &[FeatureId],
        index: &mut FeatureIndex,
    ) -> Result<Option<FeatureId>> {
        if children.len() < 2 {
            return Ok(None);
        }
        let mut hull: Option<Rect<f64>> = None;
        for &child in children {
            let Some(feature) = index.get(child) else { continue };
            let Some(rect) = feature.geometry().bounding_rect() else { continue };
            hull = Some(match hull {
                None => rect,
                Some(prev) => Rect::new(
                    Coord {
                        x: prev.min().x.min(rect.min().x),
                        y: prev.min().y.min(rect.min().y),
                    },
                    Coord {
                        x: prev.max().x.max(rect.max().x),
                        y: prev.max().y.max(rect.max().y),
                    },
                ),
            });
        }
        let Some(hull) = hull else { return Ok(None) };
        Ok(Some(index.new_feature(
            Geometry::Polygon(hull.to_polygon()),
            Properties::new(),
            true,
        )))
    }
}

/// Reduces a shape tree into an ordered feature list, registering each
/// created feature into the build's `FeatureIndex` as a side effect.
///
/// Traversal is depth-first and order-preserving: numeric feature ids and
/// downstream tile write order both depend on input traversal order.
pub struct LayerBuilder<'a> {
    index: &'a mut FeatureIndex,
    settings: &'a BuildSettings,
    validator: &'a dyn MarkupValidator,
    policy: &'a dyn GroupPolicy,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> LayerBuilder<'a> {
    pub fn new(
        index: &'a mut FeatureIndex,
        settings: &'a BuildSettings,
        validator: &'a dyn MarkupValidator,
        policy: &'a dyn GroupPolicy,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self { index, settings, validator, policy, sink }
    }

    /// Reduce a shape tree to its ordered feature list.
    pub fn build(&mut self, tree: ShapeTree) -> Result<Vec<FeatureId>> {
        self.reduce(tree)
    }

    fn reduce(&mut self, tree: ShapeTree) -> Result<Vec<FeatureId>> {
        match tree {
            ShapeTree::Leaf(shape) => Ok(self.reduce_leaf(shape)?.into_iter().collect()),
            ShapeTree::Group(children) => {
                let mut features = Vec::new();
                for child in children {
                    features.extend(self.reduce(child)?);
                }
                if features.is_empty() {
                    // A fully dropped subtree contributes nothing, not even
                    // a synthetic group feature.
                    return Ok(features);
                }
                match self.policy.aggregate(&features, self.index)? {
                    Some(group) => Ok(vec![group]),
                    None => Ok(features),
                }
            }
        }
    }

    /// Validate and convert one shape; `None` means the shape was dropped.
    fn reduce_leaf(&mut self, shape: Shape) -> Result<Option<FeatureId>> {
        let Shape { geometry, mut properties } = shape;
        if matches!(&geometry, Geometry::GeometryCollection(gc) if gc.is_empty()) {
            bail!(
                "shape {} has no geometry",
                properties.get_str(keys::ID).unwrap_or("(unidentified)")
            );
        }
        if let Some(message) = self.validator.validate(&properties) {
            self.sink.emit(Diagnostic::MarkupError {
                shape_id: properties.get_str(keys::ID).map(str::to_string),
                message,
            });
            return Ok(None);
        }
        if properties.contains_key(keys::ERROR)
            || properties.contains_key(keys::INVISIBLE)
            || properties.contains_key(keys::PATH)
            || properties.truthy(keys::EXCLUDE)
        {
            return Ok(None);
        }
        if !properties.contains_key(keys::TILE_LAYER) {
            properties.set(keys::TILE_LAYER, self.settings.default_tile_layer.as_str());
        }
        if let Some(id) = properties.get_str(keys::ID) {
            if self.index.is_duplicate_id(id) {
                self.sink.emit(Diagnostic::DuplicateId { id: id.to_string() });
            }
        }
        Ok(Some(self.index.new_feature(geometry, properties, false)))
    }
}

#[cfg(test)]
mod tests {
    use geo::point;
    use serde_json::json;

    use crate::diagnostics::CollectedDiagnostics;
    use crate::markup::SyntaxValidator;

    use super::*;

    fn leaf(x: f64, properties: serde_json::Value) -> ShapeTree {
        ShapeTree::leaf(point! { x: x, y: 0.0 }, Properties::from_object(properties))
    }

    fn build(
        tree: ShapeTree,
        index: &mut FeatureIndex,
        policy: &dyn GroupPolicy,
        sink: &mut CollectedDiagnostics,
    ) -> Result<Vec<FeatureId>> {
        let settings = BuildSettings::default();
        let validator = SyntaxValidator;
        LayerBuilder::new(index, &settings, &validator, policy, sink).build(tree)
    }

    #[test]
    fn preserves_traversal_order_and_id_assignment() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![
            leaf(0.0, json!({"id": "s1"})),
            leaf(1.0, json!({"id": "s2"})),
            leaf(2.0, json!({"id": "s3"})),
        ]);

        let features = build(tree, &mut index, &NoGroups, &mut sink).unwrap();
        assert_eq!(features, vec![FeatureId(0), FeatureId(1), FeatureId(2)]);
        assert_eq!(index.get(features[0]).unwrap().id(), Some("s1"));
        assert_eq!(index.get(features[2]).unwrap().id(), Some("s3"));
    }

    #[test]
    fn drops_invisible_path_excluded_and_errored_shapes() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![
            leaf(0.0, json!({"id": "kept"})),
            leaf(1.0, json!({"invisible": true})),
            leaf(2.0, json!({"path": "p1"})),
            leaf(3.0, json!({"exclude": true})),
            leaf(4.0, json!({"error": "bad markup"})),
        ]);

        let features = build(tree, &mut index, &NoGroups, &mut sink).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(index.get(features[0]).unwrap().id(), Some("kept"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn markup_failure_drops_shape_with_diagnostic() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![leaf(0.0, json!({"id": "has spaces"}))]);

        let features = build(tree, &mut index, &NoGroups, &mut sink).unwrap();
        assert!(features.is_empty());
        assert_eq!(sink.len(), 1);
        assert!(matches!(sink.events()[0], Diagnostic::MarkupError { .. }));
    }

    #[test]
    fn defaults_tile_layer() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![
            leaf(0.0, json!({})),
            leaf(1.0, json!({"tile-layer": "background"})),
        ]);

        let features = build(tree, &mut index, &NoGroups, &mut sink).unwrap();
        let f0 = index.get(features[0]).unwrap();
        let f1 = index.get(features[1]).unwrap();
        assert_eq!(f0.get_property_str("tile-layer"), Some("features"));
        assert_eq!(f1.get_property_str("tile-layer"), Some("background"));
    }

    #[test]
    fn fully_dropped_group_produces_nothing() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![ShapeTree::group(vec![
            leaf(0.0, json!({"exclude": true})),
            leaf(1.0, json!({"invisible": true})),
        ])]);

        // An aggregating policy must not see the empty subtree.
        let features = build(tree, &mut index, &BoundingBoxGroups, &mut sink).unwrap();
        assert!(features.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn group_feature_replaces_subtree_but_children_stay_registered() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![ShapeTree::group(vec![
            leaf(0.0, json!({"id": "a"})),
            leaf(2.0, json!({"id": "b"})),
        ])]);

        let features = build(tree, &mut index, &BoundingBoxGroups, &mut sink).unwrap();
        // Inner group of two aggregates; the outer group then holds a single
        // child, which BoundingBoxGroups leaves alone.
        assert_eq!(features.len(), 1);
        let group = index.get(features[0]).unwrap();
        assert!(group.has_children());
        assert_eq!(group.geom_type(), "Polygon");

        // Children still resolvable through the index.
        assert_eq!(index.lookup("a").len(), 1);
        assert_eq!(index.lookup("b").len(), 1);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn duplicate_external_id_is_advisory() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![
            leaf(0.0, json!({"id": "twice"})),
            leaf(1.0, json!({"id": "twice"})),
        ]);

        let features = build(tree, &mut index, &NoGroups, &mut sink).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0], Diagnostic::DuplicateId { id: "twice".into() });
        // Last registration wins.
        assert_eq!(index.lookup("twice").as_slice(), &[features[1]]);
    }

    #[test]
    fn empty_geometry_aborts_the_build() {
        let mut index = FeatureIndex::new();
        let mut sink = CollectedDiagnostics::new();
        let tree = ShapeTree::group(vec![ShapeTree::Leaf(Shape {
            geometry: Geometry::GeometryCollection(geo::GeometryCollection::default()),
            properties: Properties::from_object(json!({"id": "broken"})),
        })]);

        assert!(build(tree, &mut index, &NoGroups, &mut sink).is_err());
    }
}
