//! Synthesized features and the per-zoom lookup of composed lines.

use std::collections::HashMap;
use std::sync::Arc;

use geo::{LineString, Polygon};

use crate::identifiers::*;
use crate::models::types::*;

pub const RAILWAY_WIDTH: u32 = 8;
pub const STATION_WIDTH: u32 = 4;
pub const STATION_COLOR: &str = "#FFFFFF";
pub const STATION_OUTLINE_COLOR: &str = "#000000";

/// A railway's full line at one zoom level.
#[derive(Clone, Debug)]
pub struct ComposedLine {
    pub railway: RailwayIdentifier,
    pub zoom: ZoomLevel,
    pub geometry: LineString,
    pub color: Arc<str>,
    pub width: u32,
    pub altitude: AltitudeTier,
    /// Arc-length location of each ordered station along `geometry`.
    pub station_offsets: Vec<f64>,
}

impl ComposedLine {
    pub fn key(&self) -> FeatureKey {
        FeatureKey::new(self.railway.clone(), self.zoom)
    }
}

/// Buffered marker for a station group at one zoom level.
#[derive(Clone, Debug)]
pub struct StationMarker {
    pub station: StationGroupIdentifier,
    pub zoom: ZoomLevel,
    /// Alias locations projected onto their railways' lines.
    pub coordinates: Vec<geo::Coord>,
    pub geometry: Polygon,
    pub altitude: AltitudeTier,
}

#[derive(Clone, Debug)]
pub enum Feature {
    Railway(Arc<ComposedLine>),
    Station(StationMarker),
}

impl Feature {
    pub fn zoom(&self) -> ZoomLevel {
        match self {
            Feature::Railway(line) => line.zoom,
            Feature::Station(marker) => marker.zoom,
        }
    }

    pub fn class(&self) -> FeatureClass {
        match self {
            Feature::Railway(_) => FeatureClass::Railway,
            Feature::Station(_) => FeatureClass::Station,
        }
    }

    pub fn altitude(&self) -> AltitudeTier {
        match self {
            Feature::Railway(line) => line.altitude,
            Feature::Station(marker) => marker.altitude,
        }
    }
}

/// Output of the pipeline: railway lines and station markers for every zoom.
#[derive(Clone, Debug, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features forming one display layer.
    pub fn filter(
        &self,
        zoom: ZoomLevel,
        class: FeatureClass,
        altitude: AltitudeTier,
    ) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |f| f.zoom() == zoom && f.class() == class && f.altitude() == altitude)
    }

    pub fn railways(&self) -> impl Iterator<Item = &ComposedLine> {
        self.features.iter().filter_map(|f| match f {
            Feature::Railway(line) => Some(line.as_ref()),
            Feature::Station(_) => None,
        })
    }

    pub fn stations(&self) -> impl Iterator<Item = &StationMarker> {
        self.features.iter().filter_map(|f| match f {
            Feature::Station(marker) => Some(marker),
            Feature::Railway(_) => None,
        })
    }
}

// ============================================================================
// Line Lookup
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FeatureKey {
    pub railway: RailwayIdentifier,
    pub zoom: ZoomLevel,
}

impl FeatureKey {
    pub fn new(railway: RailwayIdentifier, zoom: ZoomLevel) -> Self {
        Self { railway, zoom }
    }
}

/// Composed lines keyed by railway and zoom. Each key is written exactly once.
#[derive(Clone, Debug, Default)]
pub struct LineLookup {
    lines: HashMap<FeatureKey, Arc<ComposedLine>>,
}

impl LineLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, line: ComposedLine) -> Result<Arc<ComposedLine>> {
        let key = line.key();
        if self.lines.contains_key(&key) {
            return Err(RailmeshError::DuplicateLine {
                railway: key.railway,
                zoom: key.zoom,
            });
        }

        let line = Arc::new(line);
        self.lines.insert(key, line.clone());
        Ok(line)
    }

    pub fn get(&self, railway: &RailwayIdentifier, zoom: ZoomLevel) -> Option<&Arc<ComposedLine>> {
        self.lines.get(&FeatureKey::new(railway.clone(), zoom))
    }

    /// Like [`LineLookup::get`], but a missing entry is a broken dependency order.
    pub fn require(&self, railway: &RailwayIdentifier, zoom: ZoomLevel) -> Result<&Arc<ComposedLine>> {
        self.get(railway, zoom)
            .ok_or_else(|| RailmeshError::MissingDependency {
                railway: railway.clone(),
                zoom,
            })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn line(id: &str, zoom: ZoomLevel) -> ComposedLine {
        ComposedLine {
            railway: RailwayIdentifier::new(id),
            zoom,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            color: "#F15A22".into(),
            width: RAILWAY_WIDTH,
            altitude: AltitudeTier(-1),
            station_offsets: vec![0.0, 1.0],
        }
    }

    #[test]
    fn test_lookup_write_once() {
        let zoom = ZoomLevel::ALL[0];
        let mut lookup = LineLookup::new();
        lookup.insert(line("r1", zoom)).unwrap();

        assert!(matches!(
            lookup.insert(line("r1", zoom)),
            Err(RailmeshError::DuplicateLine { .. })
        ));
        assert!(lookup.insert(line("r1", ZoomLevel::ALL[1])).is_ok());
        assert_eq!(lookup.len(), 2);
    }

    #[test]
    fn test_lookup_require() {
        let lookup = LineLookup::new();
        let result = lookup.require(&RailwayIdentifier::new("r1"), ZoomLevel::ALL[2]);
        assert!(matches!(result, Err(RailmeshError::MissingDependency { .. })));
    }

    #[test]
    fn test_collection_filter() {
        let zoom = ZoomLevel::ALL[0];
        let collection = FeatureCollection {
            features: vec![
                Feature::Railway(Arc::new(line("r1", zoom))),
                Feature::Railway(Arc::new(line("r2", ZoomLevel::ALL[1]))),
            ],
        };

        assert_eq!(collection.filter(zoom, FeatureClass::Railway, AltitudeTier(-1)).count(), 1);
        assert_eq!(collection.filter(zoom, FeatureClass::Railway, AltitudeTier(0)).count(), 0);
        assert_eq!(collection.filter(zoom, FeatureClass::Station, AltitudeTier(-1)).count(), 0);
        assert_eq!(collection.railways().count(), 2);
        assert_eq!(collection.stations().count(), 0);
    }
}
