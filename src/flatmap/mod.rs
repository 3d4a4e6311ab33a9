mod connections;
mod feature;
mod index;
mod layer;
mod properties;
mod resolver;

pub use connections::{Connection, ConnectionSet};
pub use feature::{Feature, FeatureId};
pub use index::{FeatureIds, FeatureIndex};
pub use layer::{BoundingBoxGroups, FeatureLayer, GroupPolicy, LayerBuilder, NoGroups};
pub use properties::Properties;
pub use resolver::AnatomicalResolver;

pub(crate) use connections::is_connection;
