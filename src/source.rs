use anyhow::Result;
use tracing::info;

use crate::diagnostics::DiagnosticSink;
use crate::flatmap::{
    is_connection, ConnectionSet, Feature, FeatureIndex, FeatureLayer, GroupPolicy, LayerBuilder,
};
use crate::markup::{keys, MarkupValidator};
use crate::settings::BuildSettings;
use crate::shape::ShapeTree;

/// Upstream source adapter: one shape tree per slide. Parsing the drawing
/// format into shape trees is the adapter's concern, not this crate's.
pub trait ShapeSource {
    /// Source identifier, used to derive layer ids.
    fn id(&self) -> &str;

    fn slide_count(&self) -> usize;

    /// Identifier of a slide (1-origin slide numbers).
    fn slide_id(&self, slide_number: usize) -> String;

    fn shape_tree(&mut self, slide_number: usize) -> Result<ShapeTree>;
}

/// Everything produced from one source: its layers in slide order, plus any
/// extracted connections.
#[derive(Debug, Default)]
pub struct ProcessedSource {
    pub layers: Vec<FeatureLayer>,
    pub connections: ConnectionSet,
}

/// Drives one map-build run over a source: reduces each requested slide to
/// a feature layer and applies layer post-processing (labelling or
/// connectivity extraction).
pub struct SourceProcessor<'a> {
    index: &'a mut FeatureIndex,
    settings: &'a BuildSettings,
    validator: &'a dyn MarkupValidator,
    policy: &'a dyn GroupPolicy,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> SourceProcessor<'a> {
    pub fn new(
        index: &'a mut FeatureIndex,
        settings: &'a BuildSettings,
        validator: &'a dyn MarkupValidator,
        policy: &'a dyn GroupPolicy,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self { index, settings, validator, policy, sink }
    }

    /// Process a source's slides, or just those in `slide_range` (1-origin;
    /// numbers outside the presentation are skipped). The first requested
    /// slide becomes the exported layer. A malformed shape tree aborts the
    /// whole run.
    pub fn process(
        &mut self,
        source: &mut dyn ShapeSource,
        slide_range: Option<&[usize]>,
    ) -> Result<ProcessedSource> {
        let slide_numbers: Vec<usize> = match slide_range {
            Some(range) => range.to_vec(),
            None => (1..=source.slide_count()).collect(),
        };
        let single_slide = slide_numbers.len() == 1;
        let exported_slide = slide_numbers.first().copied();

        let mut processed = ProcessedSource::default();
        for slide_number in slide_numbers {
            if slide_number < 1 || slide_number > source.slide_count() {
                continue;
            }
            let slide_id = source.slide_id(slide_number);
            let layer_id = if slide_number == 1 && single_slide {
                source.id().to_string()
            } else {
                format!("{}/{}", source.id(), slide_id)
            };
            info!("Slide {}, {}", slide_number, layer_id);

            let tree = source.shape_tree(slide_number)?;
            let features = LayerBuilder::new(
                &mut *self.index,
                self.settings,
                self.validator,
                self.policy,
                &mut *self.sink,
            )
            .build(tree)?;

            let layer = FeatureLayer::new(
                layer_id,
                slide_id,
                exported_slide == Some(slide_number),
                features,
            );
            self.post_process(&layer, &mut processed.connections);
            processed.layers.push(layer);
        }
        Ok(processed)
    }

    /// Connection shapes join the connection set when connectivity
    /// extraction is on; every other feature gets its label normalized.
    fn post_process(&mut self, layer: &FeatureLayer, connections: &mut ConnectionSet) {
        for &feature_id in layer.features() {
            let extract = self.settings.functional_connectivity
                && self.index.get(feature_id).is_some_and(is_connection);
            if extract {
                if let Some(feature) = self.index.get(feature_id) {
                    connections.add(
                        feature.get_property_str(keys::SHAPE_ID).unwrap_or_default().to_string(),
                        feature.get_property_str(keys::KIND).unwrap_or_default().to_string(),
                        feature_id,
                    );
                }
            } else if let Some(feature) = self.index.get_mut(feature_id) {
                update_label(feature);
            }
        }
    }
}

/// Normalize a feature's display label: drop a name that repeats the label,
/// append the model identifier to a non-empty label, then the name on its
/// own line.
pub(crate) fn update_label(feature: &mut Feature) {
    let mut label = feature
        .get_property_str(keys::LABEL)
        .unwrap_or_default()
        .to_string();
    let mut name = feature
        .get_property_str(keys::NAME)
        .unwrap_or_default()
        .to_string();
    if !name.is_empty() && name.to_lowercase() == label.to_lowercase() {
        name.clear();
    }
    if let Some(models) = feature.models().map(str::to_string) {
        if !models.is_empty() && !label.is_empty() {
            label.push_str(&format!(" ({})", models));
        }
    }
    if !name.is_empty() {
        label.push_str(&format!("\n{}", name));
    }
    feature.set_property(keys::LABEL, label);
}
