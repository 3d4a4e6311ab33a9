use geo::{Centroid, Contains, Geometry, Point};

/// GeoJSON-style kind string for a geometry value.
/// Rects and triangles are addressed as polygons by the tiling stage.
pub(crate) fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "LineString",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Polygon",
        Geometry::Triangle(_) => "Polygon",
    }
}

/// Representative point of a geometry; `None` for empty geometries.
pub(crate) fn centroid(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    geometry.centroid()
}

/// True when `container` spatially contains the centroid of `geometry`.
pub(crate) fn contains_centroid(container: &Geometry<f64>, geometry: &Geometry<f64>) -> bool {
    centroid(geometry).is_some_and(|point| container.contains(&point))
}

#[cfg(test)]
mod tests {
    use geo::{point, polygon, Geometry};

    use super::*;

    #[test]
    fn kind_strings() {
        let point: Geometry<f64> = point! { x: 1.0, y: 2.0 }.into();
        assert_eq!(geometry_kind(&point), "Point");

        let square: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0),
        ].into();
        assert_eq!(geometry_kind(&square), "Polygon");
    }

    #[test]
    fn centroid_containment() {
        let square: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0),
        ].into();
        let inner: Geometry<f64> = point! { x: 1.0, y: 1.0 }.into();
        let outer: Geometry<f64> = point! { x: 9.0, y: 9.0 }.into();

        assert!(contains_centroid(&square, &inner));
        assert!(!contains_centroid(&square, &outer));
    }

    #[test]
    fn empty_collection_has_no_centroid() {
        let empty = Geometry::GeometryCollection(geo::GeometryCollection::default());
        assert!(centroid(&empty).is_none());
    }
}
