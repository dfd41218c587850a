//! R-tree over the segments of a composed line.
//!
//! Every station alias at a zoom level is projected onto its railway's line,
//! so each line gets one index that answers those projections without a
//! linear scan. Results match [`nearest_point_on_line`] exactly, including
//! the earliest-segment tie break.
//!
//! [`nearest_point_on_line`]: crate::geometry::primitives::nearest_point_on_line

use geo::{Coord, Distance, Euclidean, Length, Line, LineString};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::primitives::{closest_on_segment, NearestPoint};
use crate::models::types::{RailmeshError, Result};

// ============================================================================
// Segment Spatial Node
// ============================================================================

#[derive(Clone, Debug)]
struct SegmentNode {
    index: usize,
    segment: Line,
    aabb: AABB<[f64; 2]>,
}

impl SegmentNode {
    fn new(index: usize, segment: Line) -> Self {
        let aabb = AABB::from_corners(
            [segment.start.x, segment.start.y],
            [segment.end.x, segment.end.y],
        );

        Self {
            index,
            segment,
            aabb,
        }
    }
}

impl RTreeObject for SegmentNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

impl PointDistance for SegmentNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Coord {
            x: point[0],
            y: point[1],
        };
        let (_, distance) = closest_on_segment(&self.segment, p);
        distance * distance
    }
}

// ============================================================================
// Line Index
// ============================================================================

pub struct LineIndex {
    /// Arc length at the start of each segment.
    cumulative: Vec<f64>,
    length: f64,
    tree: RTree<SegmentNode>,
}

impl LineIndex {
    pub fn new(line: &LineString) -> Result<Self> {
        if line.0.len() < 2 {
            return Err(RailmeshError::DegenerateGeometry(format!(
                "cannot index a line with {} points",
                line.0.len()
            )));
        }

        let mut cumulative = Vec::with_capacity(line.0.len() - 1);
        let mut length = 0.0;
        let mut segments = Vec::with_capacity(line.0.len() - 1);

        for (index, segment) in line.lines().enumerate() {
            cumulative.push(length);
            length += Euclidean.length(&segment);
            segments.push(SegmentNode::new(index, segment));
        }

        Ok(Self {
            cumulative,
            length,
            tree: RTree::bulk_load(segments),
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Nearest position on the line to `point`.
    pub fn project(&self, point: Coord) -> Option<NearestPoint> {
        let query = [point.x, point.y];
        let mut best: Option<(&SegmentNode, NearestPoint)> = None;

        // Candidates arrive by squared distance; ties go to the earliest segment.
        for node in self.tree.nearest_neighbor_iter(&query) {
            let (closest, dist) = closest_on_segment(&node.segment, point);
            if let Some((best_node, nearest)) = &best {
                if dist > nearest.distance {
                    break;
                }
                if dist == nearest.distance && node.index >= best_node.index {
                    continue;
                }
            }

            let nearest = NearestPoint {
                point: closest,
                index: node.index,
                location: self.cumulative[node.index]
                    + Euclidean.distance(node.segment.start, closest),
                distance: dist,
            };
            best = Some((node, nearest));
        }

        best.map(|(_, nearest)| nearest)
    }
}
