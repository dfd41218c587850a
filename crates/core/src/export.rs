//! GeoJSON serialization of a finished feature collection.
//!
//! Read-only view of the data model for inspection and debugging. Underground
//! features get a third coordinate so they can be drawn below the surface.

use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::json;

use crate::geometry::projection::LocalProjection;
use crate::models::features::{self, ComposedLine, StationMarker, STATION_COLOR, STATION_OUTLINE_COLOR, STATION_WIDTH};
use crate::models::types::{AltitudeTier, FeatureClass, ZoomLevel};

/// Decimal digits kept by default.
pub const DEFAULT_PRECISION: u32 = 7;

/// Serialize `collection`, mapping coordinates back through `projection` when
/// given and rounding them to `precision` decimal digits.
pub fn to_geojson(
    collection: &features::FeatureCollection,
    precision: u32,
    projection: Option<&LocalProjection>,
) -> FeatureCollection {
    let writer = CoordinateWriter {
        scale: 10f64.powi(precision as i32),
        projection,
    };

    let features = collection
        .features
        .iter()
        .map(|feature| match feature {
            features::Feature::Railway(line) => railway_feature(line, &writer),
            features::Feature::Station(marker) => station_feature(marker, &writer),
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

struct CoordinateWriter<'a> {
    scale: f64,
    projection: Option<&'a LocalProjection>,
}

impl CoordinateWriter<'_> {
    fn round(&self, value: f64) -> f64 {
        (value * self.scale).round() / self.scale
    }

    fn position(&self, c: Coord, elevation: Option<f64>) -> Vec<f64> {
        let c = self.projection.map_or(c, |p| p.inverse(c));
        let mut position = vec![self.round(c.x), self.round(c.y)];
        if let Some(z) = elevation {
            position.push(self.round(z));
        }
        position
    }

    fn ring(&self, line: &LineString, elevation: Option<f64>) -> Vec<Vec<f64>> {
        line.0.iter().map(|c| self.position(*c, elevation)).collect()
    }

    fn polygon(&self, polygon: &Polygon, elevation: Option<f64>) -> Value {
        let mut rings = vec![self.ring(polygon.exterior(), elevation)];

        for interior in polygon.interiors() {
            rings.push(self.ring(interior, elevation));
        }

        Value::Polygon(rings)
    }
}

fn elevation(altitude: AltitudeTier, zoom: ZoomLevel) -> Option<f64> {
    altitude
        .is_underground()
        .then(|| altitude.elevation(zoom.unit()))
}

fn railway_feature(line: &ComposedLine, writer: &CoordinateWriter) -> Feature {
    let z = elevation(line.altitude, line.zoom);

    let mut properties = serde_json::Map::new();
    properties.insert("id".to_string(), json!(format!("{}.{}", line.railway, line.zoom)));
    properties.insert("zoom".to_string(), json!(line.zoom.value()));
    properties.insert("type".to_string(), json!(FeatureClass::Railway.discriminator()));
    properties.insert("altitude".to_string(), json!(line.altitude.0));
    properties.insert("color".to_string(), json!(line.color.as_ref()));
    properties.insert("width".to_string(), json!(line.width));
    // Only coordinates are rounded; offsets keep full precision.
    properties.insert("station-offsets".to_string(), json!(line.station_offsets));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(writer.ring(&line.geometry, z)))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn station_feature(marker: &StationMarker, writer: &CoordinateWriter) -> Feature {
    let z = elevation(marker.altitude, marker.zoom);

    let mut properties = serde_json::Map::new();
    properties.insert("id".to_string(), json!(format!("{}.{}", marker.station, marker.zoom)));
    properties.insert("zoom".to_string(), json!(marker.zoom.value()));
    properties.insert("type".to_string(), json!(FeatureClass::Station.discriminator()));
    properties.insert("altitude".to_string(), json!(marker.altitude.0));
    properties.insert("color".to_string(), json!(STATION_COLOR));
    properties.insert("outlineColor".to_string(), json!(STATION_OUTLINE_COLOR));
    properties.insert("width".to_string(), json!(STATION_WIDTH));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(writer.polygon(&marker.geometry, z))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::buffer::buffer_point;
    use crate::identifiers::{RailwayIdentifier, StationGroupIdentifier};
    use crate::models::features::RAILWAY_WIDTH;
    use approx::assert_relative_eq;
    use geo::{coord, line_string};
    use std::sync::Arc;

    fn collection(altitude: AltitudeTier) -> features::FeatureCollection {
        let zoom = ZoomLevel::ALL[2];
        let line = ComposedLine {
            railway: RailwayIdentifier::new("odpt.Railway:TokyoMetro.Ginza"),
            zoom,
            geometry: line_string![(x: 0.123456789, y: 1.0), (x: 2.0, y: 1.000000049)],
            color: "#F39700".into(),
            width: RAILWAY_WIDTH,
            altitude,
            station_offsets: vec![0.0, 1.876543219],
        };
        let center = coord! { x: 2.0, y: 1.0 };
        let marker = StationMarker {
            station: StationGroupIdentifier::new("odpt.Station:TokyoMetro.Ginza.Shibuya"),
            zoom,
            coordinates: vec![center],
            geometry: buffer_point(center, zoom.unit(), 8).unwrap(),
            altitude,
        };

        features::FeatureCollection {
            features: vec![
                features::Feature::Railway(Arc::new(line)),
                features::Feature::Station(marker),
            ],
        }
    }

    fn positions(feature: &Feature) -> Vec<Vec<f64>> {
        match &feature.geometry.as_ref().unwrap().value {
            Value::LineString(coords) => coords.clone(),
            Value::Polygon(rings) => rings[0].clone(),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_railway_properties() {
        let geojson = to_geojson(&collection(AltitudeTier::SURFACE), DEFAULT_PRECISION, None);
        let railway = &geojson.features[0];
        let properties = railway.properties.as_ref().unwrap();

        assert_eq!(properties["id"], json!("odpt.Railway:TokyoMetro.Ginza.15"));
        assert_eq!(properties["zoom"], json!(15));
        assert_eq!(properties["type"], json!(0));
        assert_eq!(properties["altitude"], json!(0));
        assert_eq!(properties["color"], json!("#F39700"));
        assert_eq!(properties["width"], json!(8));
        assert_eq!(properties["station-offsets"], json!([0.0, 1.876543219]));

        let coords = positions(railway);
        assert_eq!(coords[0], vec![0.1234568, 1.0]);
        assert_eq!(coords[1], vec![2.0, 1.0]);
    }

    #[test]
    fn test_station_properties() {
        let geojson = to_geojson(&collection(AltitudeTier::SURFACE), DEFAULT_PRECISION, None);
        let station = &geojson.features[1];
        let properties = station.properties.as_ref().unwrap();

        assert_eq!(properties["type"], json!(1));
        assert_eq!(properties["color"], json!("#FFFFFF"));
        assert_eq!(properties["outlineColor"], json!("#000000"));
        assert_eq!(properties["width"], json!(4));
        assert!(positions(station).iter().all(|p| p.len() == 2));
    }

    #[test]
    fn test_underground_features_get_elevation() {
        let geojson = to_geojson(&collection(AltitudeTier(-1)), DEFAULT_PRECISION, None);

        // Zoom 15: unit 0.05, so 50 m below the surface.
        for feature in &geojson.features {
            for position in positions(feature) {
                assert_eq!(position.len(), 3);
                assert_relative_eq!(position[2], -50.0);
            }
        }
    }

    #[test]
    fn test_projection_applied_before_rounding() {
        let projection = LocalProjection::new(coord! { x: 139.7670, y: 35.6814 });
        let geojson = to_geojson(&collection(AltitudeTier::SURFACE), 4, Some(&projection));

        let first = &positions(&geojson.features[0])[0];
        let expected = projection.inverse(coord! { x: 0.123456789, y: 1.0 });
        assert_relative_eq!(first[0], expected.x, epsilon = 1e-4);
        assert_relative_eq!(first[1], expected.y, epsilon = 1e-4);
        assert_eq!(first[0], (expected.x * 1e4).round() / 1e4);
    }
}
