//! Station markers built from the composed lines of one zoom level.

use std::collections::HashMap;

use geo::{Coord, LineString};

use crate::geometry::buffer::{buffer_line, buffer_point};
use crate::identifiers::{RailwayIdentifier, StationIdentifier};
use crate::models::features::StationMarker;
use crate::models::topology::{Network, StationGroup};
use crate::models::types::*;
use crate::spatial::LineIndex;

pub struct StationProjector<'a> {
    network: &'a Network,
    /// Index of every railway composed at `zoom`.
    indices: &'a HashMap<RailwayIdentifier, LineIndex>,
    zoom: ZoomLevel,
    quadrant_segments: usize,
}

impl<'a> StationProjector<'a> {
    pub fn new(
        network: &'a Network,
        indices: &'a HashMap<RailwayIdentifier, LineIndex>,
        zoom: ZoomLevel,
        quadrant_segments: usize,
    ) -> Self {
        Self {
            network,
            indices,
            zoom,
            quadrant_segments,
        }
    }

    /// Snap every alias of `group` onto its railway and buffer the result by
    /// one zoom unit.
    pub fn project(&self, group: &StationGroup) -> Result<StationMarker> {
        let coordinates = group
            .aliases
            .iter()
            .map(|id| self.snap(id))
            .collect::<Result<Vec<Coord>>>()?;

        let radius = self.zoom.unit();
        let geometry = match coordinates.as_slice() {
            [] => {
                return Err(RailmeshError::DegenerateGeometry(format!(
                    "station {} has no aliases",
                    group.id
                )))
            }
            [single] => buffer_point(*single, radius, self.quadrant_segments)?,
            _ => buffer_line(
                &LineString::new(coordinates.clone()),
                radius,
                self.quadrant_segments,
            )?,
        };

        Ok(StationMarker {
            station: group.id.clone(),
            zoom: self.zoom,
            coordinates,
            geometry,
            altitude: group.altitude,
        })
    }

    fn snap(&self, id: &StationIdentifier) -> Result<Coord> {
        let alias = self
            .network
            .alias(id)
            .ok_or_else(|| RailmeshError::StationNotFound(id.clone()))?;

        let index = self
            .indices
            .get(&alias.railway)
            .ok_or_else(|| RailmeshError::MissingDependency {
                railway: alias.railway.clone(),
                zoom: self.zoom,
            })?;

        index
            .project(alias.location)
            .map(|nearest| nearest.point)
            .ok_or_else(|| {
                RailmeshError::DegenerateGeometry(format!("railway {} has no segments", alias.railway))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::buffer::DEFAULT_QUADRANT_SEGMENTS;
    use crate::geometry::primitives::nearest_point_on_line;
    use crate::identifiers::StationGroupIdentifier;
    use crate::models::topology::{RailwayTopology, StationAlias, SublineSpec};
    use approx::assert_relative_eq;
    use geo::{coord, line_string, Contains, Point};

    fn fixture() -> (Network, HashMap<RailwayIdentifier, LineIndex>, LineString) {
        let line = line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 3.0)];
        let cross = line_string![(x: 1.0, y: -2.0), (x: 1.0, y: 2.0)];

        let railway = |id: &str, stations: &[&str], line: &LineString| RailwayTopology {
            id: RailwayIdentifier::new(id),
            stations: stations.iter().map(|s| StationIdentifier::new(*s)).collect(),
            sublines: vec![SublineSpec::Own { coordinates: line.0.clone() }],
            color: "#00B5AD".into(),
            altitude: AltitudeTier(-1),
            is_loop: false,
        };
        let alias = |id: &str, railway: &str, location: Coord| StationAlias {
            id: StationIdentifier::new(id),
            railway: RailwayIdentifier::new(railway),
            location,
        };

        let network = Network::new(
            vec![railway("main", &["main.a", "main.b"], &line), railway("cross", &["cross.b"], &cross)],
            vec![
                alias("main.a", "main", coord! { x: 2.0, y: 0.4 }),
                alias("main.b", "main", coord! { x: 1.0, y: -0.3 }),
                alias("cross.b", "cross", coord! { x: 1.2, y: 0.0 }),
            ],
            vec![
                StationGroup {
                    id: StationGroupIdentifier::new("a"),
                    aliases: vec![StationIdentifier::new("main.a")],
                    altitude: AltitudeTier(-1),
                },
                StationGroup {
                    id: StationGroupIdentifier::new("b"),
                    aliases: vec![StationIdentifier::new("main.b"), StationIdentifier::new("cross.b")],
                    altitude: AltitudeTier(-1),
                },
            ],
        )
        .unwrap();

        let indices = HashMap::from([
            (RailwayIdentifier::new("main"), LineIndex::new(&line).unwrap()),
            (RailwayIdentifier::new("cross"), LineIndex::new(&cross).unwrap()),
        ]);

        (network, indices, line)
    }

    #[test]
    fn test_single_alias_lies_on_line() {
        let (network, indices, line) = fixture();
        let zoom = ZoomLevel::ALL[1];
        let projector = StationProjector::new(&network, &indices, zoom, DEFAULT_QUADRANT_SEGMENTS);

        let marker = projector.project(&network.groups()[0]).unwrap();

        assert_eq!(marker.coordinates.len(), 1);
        let snapped = marker.coordinates[0];
        assert!(nearest_point_on_line(&line, snapped).unwrap().distance < 1e-12);
        assert_relative_eq!(snapped.x, 2.0);
        assert!(marker.geometry.contains(&Point::from(snapped)));
        assert_eq!(marker.altitude, AltitudeTier(-1));
        assert_eq!(marker.zoom, zoom);
    }

    #[test]
    fn test_multiple_aliases_buffered_as_line() {
        let (network, indices, _) = fixture();
        let projector =
            StationProjector::new(&network, &indices, ZoomLevel::ALL[1], DEFAULT_QUADRANT_SEGMENTS);

        let marker = projector.project(&network.groups()[1]).unwrap();

        // Both aliases snap to (1, 0), one per line.
        assert_eq!(marker.coordinates.len(), 2);
        for c in &marker.coordinates {
            assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
            assert_relative_eq!(c.y, 0.0, epsilon = 1e-12);
        }
        assert!(marker.geometry.contains(&Point::new(1.05, 0.0)));
        assert!(!marker.geometry.contains(&Point::new(1.2, 0.0)));
    }

    #[test]
    fn test_uncomposed_railway_is_missing_dependency() {
        let (network, mut indices, _) = fixture();
        indices.remove(&RailwayIdentifier::new("cross"));
        let projector =
            StationProjector::new(&network, &indices, ZoomLevel::ALL[0], DEFAULT_QUADRANT_SEGMENTS);

        assert!(matches!(
            projector.project(&network.groups()[1]),
            Err(RailmeshError::MissingDependency { railway, .. }) if railway.as_str() == "cross"
        ));
    }
}
