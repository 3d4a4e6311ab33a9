use geo::Geometry;

use crate::flatmap::Properties;

/// A single annotated shape from the drawing source.
#[derive(Debug, Clone)]
pub struct Shape {
    pub geometry: Geometry<f64>,
    pub properties: Properties,
}

impl Shape {
    pub fn new(geometry: impl Into<Geometry<f64>>, properties: Properties) -> Self {
        Self { geometry: geometry.into(), properties }
    }
}

/// Recursive shape structure produced by a source adapter. Group ordering is
/// drawing z-order and must survive reduction unchanged.
#[derive(Debug, Clone)]
pub enum ShapeTree {
    Leaf(Shape),
    Group(Vec<ShapeTree>),
}

impl ShapeTree {
    pub fn leaf(geometry: impl Into<Geometry<f64>>, properties: Properties) -> Self {
        Self::Leaf(Shape::new(geometry, properties))
    }

    pub fn group(children: Vec<ShapeTree>) -> Self {
        Self::Group(children)
    }

    /// Number of leaf shapes in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(children) => children.iter().map(ShapeTree::leaf_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::point;
    use serde_json::json;

    use super::*;

    #[test]
    fn leaf_count_descends_groups() {
        let leaf = || {
            ShapeTree::leaf(
                point! { x: 0.0, y: 0.0 },
                Properties::from_object(json!({})),
            )
        };
        let tree = ShapeTree::group(vec![
            leaf(),
            ShapeTree::group(vec![leaf(), leaf()]),
        ]);
        assert_eq!(tree.leaf_count(), 3);
    }
}
