//! Round-capped buffers around points and polylines.
//!
//! Both caps and joins are round, approximated with arcs whose resolution is
//! given in segments per quarter turn.

use std::f64::consts::FRAC_PI_2;

use geo::algorithm::area::Area;
use geo::algorithm::buffer::{Buffer, BufferStyle, LineCap, LineJoin};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon, Winding};

use crate::geometry::primitives::distinct_coords;
use crate::models::types::{RailmeshError, Result};

/// Disc resolution used for station markers.
pub const DEFAULT_QUADRANT_SEGMENTS: usize = 8;

/// Arc step, in radians, for `quadrant_segments` segments per quarter turn.
pub fn arc_angle(quadrant_segments: usize) -> f64 {
    FRAC_PI_2 / quadrant_segments.max(1) as f64
}

fn round_style(radius: f64, quadrant_segments: usize) -> Result<BufferStyle<f64>> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(RailmeshError::DegenerateGeometry(format!(
            "buffer radius must be positive, got {radius}"
        )));
    }

    let angle = arc_angle(quadrant_segments);
    Ok(BufferStyle::new(radius)
        .line_cap(LineCap::Round(angle))
        .line_join(LineJoin::Round(angle)))
}

/// The polygon with the largest area; stray slivers are dropped.
fn largest(buffered: MultiPolygon) -> Result<Polygon> {
    buffered
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or_else(|| RailmeshError::DegenerateGeometry("buffer produced no polygon".into()))
}

pub fn buffer_point(center: Coord, radius: f64, quadrant_segments: usize) -> Result<Polygon> {
    let style = round_style(radius, quadrant_segments)?;
    largest(Point::from(center).buffer_with_style(style))
}

/// Buffer `line` by `radius`, returning the single polygon covering it.
///
/// A line whose vertices all coincide is buffered as a point.
pub fn buffer_line(line: &LineString, radius: f64, quadrant_segments: usize) -> Result<Polygon> {
    let coords = distinct_coords(line);

    match coords.as_slice() {
        [] => Err(RailmeshError::DegenerateGeometry(
            "cannot buffer an empty line".into(),
        )),
        [single] => buffer_point(*single, radius, quadrant_segments),
        _ => {
            let style = round_style(radius, quadrant_segments)?;
            largest(LineString::new(coords).buffer_with_style(style))
        }
    }
}

/// Exterior ring of `polygon`, closed and counter-clockwise.
pub fn outline(polygon: &Polygon) -> LineString {
    let mut ring = polygon.exterior().clone();
    ring.make_ccw_winding();
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{coord, line_string, Contains, Distance, Euclidean};

    #[test]
    fn test_point_buffer_vertices_on_circle() {
        let center = coord! { x: 1.0, y: 2.0 };
        let polygon = buffer_point(center, 0.5, 8).unwrap();

        assert!(polygon.exterior().0.len() >= 33);
        for c in &polygon.exterior().0 {
            assert_relative_eq!(Euclidean.distance(center, *c), 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_buffer_line_area() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let polygon = buffer_line(&line, 1.0, 16).unwrap();

        // Rectangle plus (slightly less than) one full disc.
        let area = polygon.unsigned_area();
        assert!(area < 20.0 + std::f64::consts::PI + 1e-6);
        assert!(area > 20.0 + 3.0);
        assert!(polygon.interiors().is_empty());
        assert!(polygon.contains(&Point::new(-0.9, 0.0)));
        assert!(!polygon.contains(&Point::new(-1.1, 0.0)));
    }

    #[test]
    fn test_buffer_dense_line_stays_simple() {
        // A fine half circle, as produced by offsetting an already offset line.
        let coords: Vec<Coord> = (0..=2000)
            .map(|i| {
                let (sin, cos) = (std::f64::consts::PI * i as f64 / 2000.0).sin_cos();
                coord! { x: 5.0 * cos, y: 5.0 * sin }
            })
            .collect();
        let polygon = buffer_line(&LineString::new(coords), 0.1, 4064).unwrap();

        assert!(polygon.interiors().is_empty());
        assert!(polygon.contains(&Point::new(0.0, 5.05)));
        assert!(!polygon.contains(&Point::new(0.0, 4.85)));
    }

    #[test]
    fn test_buffer_collapsed_line_is_disc() {
        let line = line_string![(x: 3.0, y: 3.0), (x: 3.0, y: 3.0)];
        let polygon = buffer_line(&line, 1.0, 8).unwrap();
        assert_eq!(polygon, buffer_point(coord! { x: 3.0, y: 3.0 }, 1.0, 8).unwrap());
    }

    #[test]
    fn test_buffer_rejects_empty_line_and_bad_radius() {
        let line = LineString::new(vec![]);
        assert!(matches!(
            buffer_line(&line, 1.0, 8),
            Err(RailmeshError::DegenerateGeometry(_))
        ));

        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        assert!(buffer_line(&line, 0.0, 8).is_err());
        assert!(buffer_point(coord! { x: 0.0, y: 0.0 }, f64::NAN, 8).is_err());
    }

    #[test]
    fn test_outline_is_ccw() {
        let cw = Polygon::new(
            line_string![
                (x: 0.0, y: 0.0),
                (x: 0.0, y: 1.0),
                (x: 1.0, y: 1.0),
                (x: 1.0, y: 0.0),
                (x: 0.0, y: 0.0),
            ],
            vec![],
        );
        assert!(cw.exterior().is_cw());
        assert!(outline(&cw).is_ccw());
    }
}
