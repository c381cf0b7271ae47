//! GeoJSON FeatureCollection ingestion.
//!
//! Only the geometry kinds the styling engine models (`Point`,
//! `LineString`, `Polygon`) are accepted; anything else is a typed error
//! rather than a silent skip, so bad data is caught at load time.

use glam::DVec2;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CartovisError;
use crate::feature::{Feature, Properties};
use crate::geometry::Geometry;

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: Option<Properties>,
    geometry: RawGeometry,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Value,
}

/// Parse a GeoJSON FeatureCollection document into features.
///
/// # Errors
///
/// Returns [`CartovisError::GeoJson`] when the document is not valid JSON,
/// is not a FeatureCollection, or carries malformed coordinates, and
/// [`CartovisError::UnsupportedGeometry`] for geometry kinds the engine
/// does not model.
pub fn read_features(doc: &str) -> Result<Vec<Feature>, CartovisError> {
    let value: Value = serde_json::from_str(doc)
        .map_err(|e| CartovisError::GeoJson(e.to_string()))?;
    read_features_value(&value)
}

/// Parse an already-deserialized GeoJSON FeatureCollection value.
///
/// # Errors
///
/// Same error conditions as [`read_features`].
pub fn read_features_value(value: &Value) -> Result<Vec<Feature>, CartovisError> {
    let collection: RawCollection = RawCollection::deserialize(value)
        .map_err(|e| CartovisError::GeoJson(e.to_string()))?;
    if collection.kind != "FeatureCollection" {
        return Err(CartovisError::GeoJson(format!(
            "expected FeatureCollection, got {}",
            collection.kind
        )));
    }

    let mut features = Vec::with_capacity(collection.features.len());
    for raw in collection.features {
        if raw.kind != "Feature" {
            return Err(CartovisError::GeoJson(format!(
                "expected Feature, got {}",
                raw.kind
            )));
        }
        let geometry = parse_geometry(&raw.geometry)?;
        features.push(Feature::new(
            geometry,
            raw.properties.unwrap_or_default(),
        ));
    }
    Ok(features)
}

fn parse_geometry(raw: &RawGeometry) -> Result<Geometry, CartovisError> {
    match raw.kind.as_str() {
        "Point" => Ok(Geometry::Point(parse_position(&raw.coordinates)?)),
        "LineString" => {
            Ok(Geometry::LineString(parse_line(&raw.coordinates)?))
        }
        "Polygon" => {
            let rings = raw
                .coordinates
                .as_array()
                .ok_or_else(|| coord_error(&raw.coordinates))?
                .iter()
                .map(parse_line)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::Polygon(rings))
        }
        other => Err(CartovisError::UnsupportedGeometry(other.to_owned())),
    }
}

fn parse_line(value: &Value) -> Result<Vec<DVec2>, CartovisError> {
    value
        .as_array()
        .ok_or_else(|| coord_error(value))?
        .iter()
        .map(parse_position)
        .collect()
}

fn parse_position(value: &Value) -> Result<DVec2, CartovisError> {
    let coords = value.as_array().ok_or_else(|| coord_error(value))?;
    // GeoJSON positions are [longitude, latitude, optional altitude]
    if coords.len() < 2 {
        return Err(coord_error(value));
    }
    match (coords[0].as_f64(), coords[1].as_f64()) {
        (Some(lon), Some(lat)) => Ok(DVec2::new(lon, lat)),
        _ => Err(coord_error(value)),
    }
}

fn coord_error(value: &Value) -> CartovisError {
    CartovisError::GeoJson(format!("malformed coordinates: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryType;

    const POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "first"},
                "geometry": {
                    "coordinates": [37.548539237195996, 55.657388142844695],
                    "type": "Point"
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "coordinates": [37.437004379023364, 55.73669459987866],
                    "type": "Point"
                }
            }
        ]
    }"#;

    #[test]
    fn reads_point_collection() {
        let features = read_features(POINTS).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(
            features[0].geometry.geometry_type(),
            GeometryType::Point
        );
        assert_eq!(
            features[0].properties.get("name").and_then(|v| v.as_str()),
            Some("first")
        );
        assert!(features[1].properties.is_empty());
    }

    #[test]
    fn reads_line_and_polygon() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[0.0, 0.0], [1.0, 1.0]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]]
                    }
                }
            ]
        }"#;
        let features = read_features(doc).unwrap();
        assert_eq!(
            features[0].geometry.geometry_type(),
            GeometryType::LineString
        );
        assert_eq!(
            features[1].geometry.geometry_type(),
            GeometryType::Polygon
        );
    }

    #[test]
    fn rejects_unsupported_geometry() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "MultiPoint",
                        "coordinates": [[0.0, 0.0]]
                    }
                }
            ]
        }"#;
        let err = read_features(doc).unwrap_err();
        assert!(matches!(err, CartovisError::UnsupportedGeometry(kind) if kind == "MultiPoint"));
    }

    #[test]
    fn rejects_non_collection_root() {
        let err = read_features(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, CartovisError::GeoJson(_)));
    }

    #[test]
    fn rejects_short_position() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [1.0]}
                }
            ]
        }"#;
        assert!(matches!(
            read_features(doc).unwrap_err(),
            CartovisError::GeoJson(_)
        ));
    }
}
