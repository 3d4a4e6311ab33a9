use ahash::AHashSet;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::geom;

use super::feature::FeatureId;
use super::index::FeatureIndex;

/// Resolves an anatomical model identifier to the feature(s) it most
/// specifically denotes, disambiguating with spatial containment across an
/// ordered list of candidate container layers.
///
/// Structures are often modelled at several granularities; the first
/// candidate layer yielding exactly one containment match wins, balancing
/// specificity against the risk of an overly narrow layer matching nothing.
#[derive(Debug, Default)]
pub struct AnatomicalResolver {
    unknown_anatomy: AHashSet<(String, Vec<String>)>,
}

impl AnatomicalResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `anatomical_id` against `layers`, in the order supplied.
    ///
    /// With no candidate layers the whole-map `models` matches are returned
    /// unfiltered. Otherwise each layer's container features are tested for
    /// containment of each candidate's centroid; iteration stops at the
    /// first layer with exactly one match, and an exhausted loop yields the
    /// last layer's matches (possibly empty or ambiguous). An empty result
    /// emits one diagnostic per distinct (identifier, layers) pair.
    pub fn resolve(
        &mut self,
        index: &FeatureIndex,
        anatomical_id: &str,
        layers: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<FeatureId> {
        let candidates = index.features_with_model(anatomical_id);
        let mut resolved = candidates.to_vec();
        if !layers.is_empty() {
            for layer in layers {
                let mut included = Vec::new();
                for &container_id in index.features_with_model(layer) {
                    let Some(container) = index.get(container_id) else { continue };
                    for &candidate_id in candidates {
                        let Some(candidate) = index.get(candidate_id) else { continue };
                        if geom::contains_centroid(container.geometry(), candidate.geometry()) {
                            included.push(candidate_id);
                        }
                    }
                }
                resolved = included;
                if resolved.len() == 1 {
                    break;
                }
            }
        }
        if resolved.is_empty() {
            let key = (anatomical_id.to_string(), layers.to_vec());
            if self.unknown_anatomy.insert(key) {
                sink.emit(Diagnostic::UnresolvedAnatomy {
                    anatomical_id: anatomical_id.to_string(),
                    layers: layers.to_vec(),
                });
            }
        }
        resolved
    }
}
