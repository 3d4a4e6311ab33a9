use serde::Serialize;

use crate::markup::keys;

use super::feature::{Feature, FeatureId};

/// Functional-connectivity classes extracted as connections.
pub(crate) const NEURAL_CLASS: &str = "FC_CLASS.NEURAL";
pub(crate) const VASCULAR_CLASS: &str = "FC_CLASS.VASCULAR";

/// One neural or vascular connection extracted from a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub shape_id: String,
    pub kind: String,
    pub feature: FeatureId,
}

/// Connections collected across a source's layers when functional
/// connectivity extraction is enabled.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape_id: String, kind: String, feature: FeatureId) {
        self.connections.push(Connection { shape_id, kind, feature });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// True for connection shapes carrying a neural or vascular class.
pub(crate) fn is_connection(feature: &Feature) -> bool {
    feature.get_property_str(keys::SHAPE_TYPE) == Some("connection")
        && matches!(
            feature.get_property_str(keys::FC_CLASS),
            Some(NEURAL_CLASS) | Some(VASCULAR_CLASS)
        )
}
