//! Synthetic sublines bridging a gap between two borrowed sublines.

use geo::{Coord, Euclidean, InterpolatableLine, Length, LineString};

use crate::geometry::offset::{offset, OffsetOptions};
use crate::geometry::primitives::{ease_in_out_quad, line_slice};
use crate::models::types::{RailmeshError, Result};

/// One side of a gap: the line a neighbouring borrowed subline was cut from.
#[derive(Clone, Copy, Debug)]
pub struct GapDonor<'a> {
    pub line: &'a LineString,
    /// Planar offset applied to the donor slice.
    pub offset: f64,
    /// The neighbouring subline runs against the donor's direction.
    pub reverse: bool,
}

/// Generate `count - 1` points blending from donor `a` into donor `b`.
///
/// Both donors are sliced between `from` and `to` and offset first; point `j`
/// sits at fraction `j / count` of each slice and is blended with an
/// ease-in-out weight on the same fraction.
pub fn interpolate(
    a: &GapDonor,
    b: &GapDonor,
    from: Coord,
    to: Coord,
    count: usize,
    options: &OffsetOptions,
) -> Result<Vec<Coord>> {
    if count < 2 {
        return Ok(Vec::new());
    }

    let slice_a = offset(&line_slice(from, to, a.line)?, a.offset, options)?;
    let slice_b = offset(&line_slice(from, to, b.line)?, b.offset, options)?;
    let length_a = Euclidean.length(&slice_a);
    let length_b = Euclidean.length(&slice_b);

    let fraction = |j: usize, reverse: bool| {
        let step = if reverse { count - j } else { j };
        step as f64 / count as f64
    };

    (1..count)
        .map(|j| {
            let ca = slice_a
                .point_at_distance_from_start(&Euclidean, length_a * fraction(j, a.reverse));
            let cb = slice_b
                .point_at_distance_from_start(&Euclidean, length_b * fraction(j, b.reverse));
            let (Some(ca), Some(cb)) = (ca, cb) else {
                return Err(RailmeshError::DegenerateGeometry(
                    "gap donor slice is empty".into(),
                ));
            };

            let f = ease_in_out_quad(j as f64 / count as f64);
            Ok(ca.0 * (1.0 - f) + cb.0 * f)
        })
        .collect()
}
