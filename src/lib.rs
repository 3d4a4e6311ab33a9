#![doc = "Flatmapper public API"]
mod diagnostics;
mod flatmap;
mod geom;
mod markup;
mod settings;
mod shape;
mod source;
mod tile;

#[doc(inline)]
pub use flatmap::{
    AnatomicalResolver, BoundingBoxGroups, Connection, ConnectionSet, Feature, FeatureId,
    FeatureIds, FeatureIndex, FeatureLayer, GroupPolicy, LayerBuilder, NoGroups, Properties,
};

#[doc(inline)]
pub use diagnostics::{CollectedDiagnostics, Diagnostic, DiagnosticSink, LogSink};

#[doc(inline)]
pub use markup::{keys, MarkupValidator, SyntaxValidator, FEATURES_TILE_LAYER};

#[doc(inline)]
pub use settings::BuildSettings;

#[doc(inline)]
pub use shape::{Shape, ShapeTree};

#[doc(inline)]
pub use source::{ProcessedSource, ShapeSource, SourceProcessor};

#[doc(inline)]
pub use tile::{geometry_value, layer_geojson};
