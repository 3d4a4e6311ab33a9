use geo::{Coord, Geometry, LineString, Polygon};
use serde_json::{json, Map, Value};

use crate::flatmap::{FeatureIndex, FeatureLayer};

/// GeoJSON FeatureCollection for one layer, in tile write order. This is
/// the record stream handed to the external vector-tile generator, which
/// expects numeric, stable, unique feature ids within one run.
///
/// Call only after every layer of the build has been reduced; the feature
/// arena must be complete before tiling starts.
pub fn layer_geojson(index: &FeatureIndex, layer: &FeatureLayer) -> Value {
    let features: Vec<Value> = layer
        .features()
        .iter()
        .filter_map(|&feature_id| index.get(feature_id))
        .map(|feature| {
            json!({
                "type": "Feature",
                "id": feature.feature_id(),
                "geometry": geometry_value(feature.geometry()),
                "properties": Value::Object(feature.properties().as_map().clone()),
            })
        })
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn position(coord: Coord<f64>) -> Value {
    json!([coord.x, coord.y])
}

fn line_coords(line: &LineString<f64>) -> Value {
    Value::Array(line.coords().map(|c| position(*c)).collect())
}

fn polygon_coords(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![line_coords(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(line_coords));
    Value::Array(rings)
}

fn geojson(kind: &str, coordinates: Value) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), json!(kind));
    object.insert("coordinates".to_string(), coordinates);
    Value::Object(object)
}

/// Render a geometry as a GeoJSON geometry object. Rects and triangles
/// become polygons; nested collections recurse.
pub fn geometry_value(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(p) => geojson("Point", position(p.0)),
        Geometry::MultiPoint(mp) => geojson(
            "MultiPoint",
            Value::Array(mp.iter().map(|p| position(p.0)).collect()),
        ),
        Geometry::Line(l) => geojson(
            "LineString",
            Value::Array(vec![position(l.start), position(l.end)]),
        ),
        Geometry::LineString(ls) => geojson("LineString", line_coords(ls)),
        Geometry::MultiLineString(mls) => geojson(
            "MultiLineString",
            Value::Array(mls.iter().map(line_coords).collect()),
        ),
        Geometry::Polygon(p) => geojson("Polygon", polygon_coords(p)),
        Geometry::MultiPolygon(mp) => geojson(
            "MultiPolygon",
            Value::Array(mp.iter().map(polygon_coords).collect()),
        ),
        Geometry::Rect(r) => geojson("Polygon", polygon_coords(&r.to_polygon())),
        Geometry::Triangle(t) => geojson("Polygon", polygon_coords(&t.to_polygon())),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.iter().map(geometry_value).collect::<Vec<_>>(),
        }),
    }
}
