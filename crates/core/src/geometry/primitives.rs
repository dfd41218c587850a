//! Planar line primitives.
//!
//! Bearings are in degrees clockwise from +y, normalized to (-180, 180], so
//! `+90` points to the right-hand side of travel.

use geo::{Closest, ClosestPoint, Coord, Distance, Euclidean, Length, Line, LineString, Point};
use itertools::Itertools;

use crate::models::types::{RailmeshError, Result};

/// Nearest position on a line to some query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestPoint {
    pub point: Coord,
    /// Index of the segment containing `point`.
    pub index: usize,
    /// Arc length from the start of the line to `point`.
    pub location: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

pub fn bearing(from: Coord, to: Coord) -> f64 {
    let d = to - from;
    d.x.atan2(d.y).to_degrees()
}

pub fn destination(origin: Coord, distance: f64, bearing: f64) -> Coord {
    let (sin, cos) = bearing.to_radians().sin_cos();
    Coord {
        x: origin.x + distance * sin,
        y: origin.y + distance * cos,
    }
}

/// Signed difference `to - from` between two bearings, in (-180, 180].
pub fn angle_between(from: f64, to: f64) -> f64 {
    let mut angle = to - from;
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Closest point to `p` on `segment` and its distance to `p`.
pub(crate) fn closest_on_segment(segment: &Line, p: Coord) -> (Coord, f64) {
    let closest = match segment.closest_point(&Point::from(p)) {
        Closest::Intersection(c) | Closest::SinglePoint(c) => c.0,
        // Zero-length segment
        Closest::Indeterminate => segment.start,
    };
    (closest, Euclidean.distance(closest, p))
}

/// Project `point` onto `line`. The earliest segment wins ties.
pub fn nearest_point_on_line(line: &LineString, point: Coord) -> Option<NearestPoint> {
    let coords = &line.0;
    match coords.as_slice() {
        [] => return None,
        [only] => {
            return Some(NearestPoint {
                point: *only,
                index: 0,
                location: 0.0,
                distance: Euclidean.distance(*only, point),
            })
        }
        _ => {}
    }

    let mut best: Option<NearestPoint> = None;
    let mut travelled = 0.0;

    for (index, segment) in line.lines().enumerate() {
        let (closest, dist) = closest_on_segment(&segment, point);

        if best.as_ref().map_or(true, |b| dist < b.distance) {
            best = Some(NearestPoint {
                point: closest,
                index,
                location: travelled + Euclidean.distance(segment.start, closest),
                distance: dist,
            });
        }

        travelled += Euclidean.length(&segment);
    }

    best
}

/// Portion of `line` between two projected positions, in the line's direction.
pub fn slice_between(line: &LineString, a: &NearestPoint, b: &NearestPoint) -> LineString {
    let (first, second) = if a.location <= b.location { (a, b) } else { (b, a) };

    let interior = line
        .0
        .iter()
        .take(second.index + 1)
        .skip(first.index + 1)
        .copied();

    let coords = std::iter::once(first.point)
        .chain(interior)
        .chain(std::iter::once(second.point))
        .dedup()
        .collect::<Vec<_>>();

    LineString::new(coords)
}

/// Portion of `line` between the projections of `start` and `end`.
///
/// The result always follows the direction of `line`, whatever the order of
/// the two points.
pub fn line_slice(start: Coord, end: Coord, line: &LineString) -> Result<LineString> {
    let degenerate = || RailmeshError::DegenerateGeometry("cannot slice an empty line".into());
    let a = nearest_point_on_line(line, start).ok_or_else(degenerate)?;
    let b = nearest_point_on_line(line, end).ok_or_else(degenerate)?;

    Ok(slice_between(line, &a, &b))
}

/// Coordinates of `line` with consecutive duplicates removed.
pub fn distinct_coords(line: &LineString) -> Vec<Coord> {
    line.0.iter().copied().dedup().collect()
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}
