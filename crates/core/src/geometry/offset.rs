//! Parallel offsetting of polylines.
//!
//! The line is buffered by the offset distance and the requested half of the
//! buffer outline is cut out. Following the outline rather than displacing
//! each vertex keeps the result free of self-intersections at sharp turns.
//!
//! ## Sign Convention
//!
//! - Positive distance: right-hand side relative to the direction of travel
//! - Negative distance: left-hand side

use geo::{Coord, LineString};
use itertools::Itertools;

use crate::geometry::buffer::{buffer_line, outline};
use crate::geometry::primitives::{
    bearing, destination, distinct_coords, nearest_point_on_line, slice_between, NearestPoint,
};
use crate::models::types::{RailmeshError, Result};

/// Controls the resolution of the buffer the offset is cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetOptions {
    /// Extra disc segments per quadrant for every input coordinate.
    pub steps_per_coordinate: usize,
    /// Disc segments per quadrant regardless of input size.
    pub base_steps: usize,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            steps_per_coordinate: 2,
            base_steps: 64,
        }
    }
}

impl OffsetOptions {
    pub fn quadrant_segments(&self, coordinate_count: usize) -> usize {
        coordinate_count * self.steps_per_coordinate + self.base_steps
    }
}

/// Shift `line` sideways by `distance`, measured in the line's own units.
pub fn offset(line: &LineString, distance: f64, options: &OffsetOptions) -> Result<LineString> {
    let coords = distinct_coords(line);
    if coords.len() < 2 {
        return Err(RailmeshError::DegenerateGeometry(format!(
            "cannot offset a line with {} distinct points",
            coords.len()
        )));
    }

    if distance == 0.0 {
        return Ok(line.clone());
    }

    let n = coords.len();
    let start = coords[0];
    let end = coords[n - 1];
    // Look two points ahead/behind where possible; a sliced line often starts
    // with a very short first segment.
    let start_bearing = bearing(start, *coords.get(2).unwrap_or(&coords[1]));
    let end_bearing = bearing(if n >= 3 { coords[n - 3] } else { coords[n - 2] }, end);
    let side = if distance > 0.0 { 90.0 } else { -90.0 };
    let dist = distance.abs();

    let polygon = buffer_line(
        &LineString::new(coords.clone()),
        dist,
        options.quadrant_segments(n),
    )?;

    // Counter-clockwise traversal keeps the buffered line on the left, which
    // walks the right-hand side forward. Reverse it for the left-hand side.
    let mut ring = outline(&polygon);
    if distance < 0.0 {
        ring.0.reverse();
    }

    let behind = destination(start, dist, start_bearing + 180.0);
    let anchor = project(&ring, behind)?;
    let path = rotate_ring(&ring, &anchor);

    let from = project(&path, destination(start, dist, start_bearing + side))?;
    let to = project(&path, destination(end, dist, end_bearing + side))?;

    if from.location > to.location {
        return Err(RailmeshError::OffsetFailed(format!(
            "offset side is ambiguous at distance {distance}; increase buffer steps or reduce the offset"
        )));
    }

    let result = slice_between(&path, &from, &to);
    if result.0.len() < 2 {
        return Err(RailmeshError::OffsetFailed(format!(
            "offset at distance {distance} collapsed to a single point"
        )));
    }

    Ok(result)
}

fn project(line: &LineString, point: Coord) -> Result<NearestPoint> {
    nearest_point_on_line(line, point)
        .ok_or_else(|| RailmeshError::OffsetFailed("buffer outline is empty".into()))
}

/// Open path running once around a closed `ring`, starting and ending at `anchor`.
fn rotate_ring(ring: &LineString, anchor: &NearestPoint) -> LineString {
    let vertices = &ring.0[..ring.0.len().saturating_sub(1)];
    let m = vertices.len();

    let around = (1..=m).map(|i| vertices[(anchor.index + i) % m]);

    let coords = std::iter::once(anchor.point)
        .chain(around)
        .chain(std::iter::once(anchor.point))
        .dedup()
        .collect();

    LineString::new(coords)
}
