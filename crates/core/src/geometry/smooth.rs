//! Blending an own-coordinate subline into an adjacent offset donor.
//!
//! Where a drawn subline meets a borrowed one that was shifted sideways, the
//! points near the joint are pulled towards the borrowed line's offset, with
//! an ease-in-out falloff over a short transition distance.

use geo::{Coord, LineString};

use crate::geometry::primitives::{
    angle_between, bearing, destination, ease_in_out_quad, nearest_point_on_line,
};
use crate::models::types::{RailmeshError, Result};

/// Below this distance a point is considered to lie on the donor line.
const ON_LINE_EPSILON: f64 = 1e-12;

/// Which end of the coordinate sequence touches the donor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionEnd {
    Start,
    End,
}

/// The borrowed neighbour an own subline is smoothed towards.
#[derive(Clone, Copy, Debug)]
pub struct Junction<'a> {
    /// The neighbour's un-offset source line.
    pub donor: &'a LineString,
    /// The neighbour's offset in zoom units.
    pub offset: f64,
    /// Planar length of one zoom unit.
    pub unit: f64,
}

impl Junction<'_> {
    /// Arc length over which the correction fades out.
    pub fn transition(&self) -> f64 {
        self.offset.abs() * 0.5 + 0.5
    }
}

/// Signed lateral position of a point relative to a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignedNearest {
    pub point: Coord,
    /// Bearing pointing to the right-hand side of the line.
    pub bearing: f64,
    /// Positive on the right-hand side.
    pub distance: f64,
}

/// Project `point` onto `line` and report which side of it the point is on.
///
/// Points on the line, and points exactly antiparallel to the local tangent,
/// resolve to the right-hand side.
pub fn signed_nearest(line: &LineString, point: Coord) -> Result<SignedNearest> {
    let coords = &line.0;
    if coords.len() < 2 {
        return Err(RailmeshError::DegenerateGeometry(
            "donor line needs at least two points".into(),
        ));
    }

    let nearest = nearest_point_on_line(line, point).ok_or_else(|| {
        RailmeshError::DegenerateGeometry("donor line is empty".into())
    })?;

    let index = nearest.index.min(coords.len() - 2);
    let line_bearing = bearing(coords[index], coords[index + 1]);

    if nearest.distance < ON_LINE_EPSILON {
        return Ok(SignedNearest {
            point: nearest.point,
            bearing: line_bearing + 90.0,
            distance: 0.0,
        });
    }

    let to_point = bearing(nearest.point, point);
    let sign = if angle_between(line_bearing, to_point) >= 0.0 { 1.0 } else { -1.0 };

    Ok(SignedNearest {
        point: nearest.point,
        bearing: to_point + (1.0 - sign) * 90.0,
        distance: nearest.distance * sign,
    })
}

/// Pull the `end` of `coords` towards the junction's offset line.
///
/// Points further than [`Junction::transition`] along the subline from the
/// boundary point are returned unchanged. The opposite boundary point is
/// never moved.
pub fn smooth(coords: &[Coord], junction: &Junction, end: JunctionEnd) -> Result<Vec<Coord>> {
    let mut smoothed = coords.to_vec();
    let n = coords.len();
    if n < 2 {
        return Ok(smoothed);
    }

    let indices: Box<dyn Iterator<Item = usize>> = match end {
        JunctionEnd::Start => Box::new(0..n - 1),
        JunctionEnd::End => Box::new((1..n).rev()),
    };
    let boundary = match end {
        JunctionEnd::Start => coords[0],
        JunctionEnd::End => coords[n - 1],
    };

    let nearest = signed_nearest(junction.donor, boundary)?;
    let correction = junction.offset * junction.unit - nearest.distance;
    let transition = junction.transition();

    let base = LineString::new(coords.to_vec());
    let locate = |c: Coord| nearest_point_on_line(&base, c).map_or(0.0, |p| p.location);
    let base_location = locate(boundary);

    for j in indices {
        let distance = (locate(coords[j]) - base_location).abs();
        if distance > transition {
            break;
        }

        let weight = ease_in_out_quad(1.0 - distance / transition);
        if weight <= 0.0 {
            break;
        }

        smoothed[j] = destination(coords[j], correction * weight, nearest.bearing);
    }

    Ok(smoothed)
}
