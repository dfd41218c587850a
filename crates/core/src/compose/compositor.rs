//! Resolves a railway's sublines into one composed line per zoom level.
//!
//! Resolution runs in two phases. Borrowed sublines are sliced (and offset)
//! from their donors first, because own sublines are smoothed against them and
//! interpolated gaps bridge between them. Every subline's coordinates are then
//! concatenated in declared order.

use geo::{Coord, LineString};
use tracing::debug;

use crate::geometry::interpolate::{interpolate, GapDonor};
use crate::geometry::offset::{offset, OffsetOptions};
use crate::geometry::primitives::line_slice;
use crate::geometry::smooth::{smooth, Junction, JunctionEnd};
use crate::identifiers::RailwayIdentifier;
use crate::models::features::{ComposedLine, LineLookup, RAILWAY_WIDTH};
use crate::models::topology::{Network, RailwayTopology, SublineSpec};
use crate::models::types::*;
use crate::spatial::LineIndex;

/// Borrowed subline fields needed by its neighbours.
#[derive(Clone, Copy)]
struct BorrowedRef<'a> {
    source: &'a RailwayIdentifier,
    start: Coord,
    end: Coord,
    offset: Option<f64>,
    reverse: bool,
}

fn as_borrowed(subline: Option<&SublineSpec>) -> Option<BorrowedRef<'_>> {
    match subline? {
        SublineSpec::Borrowed {
            source,
            start,
            end,
            offset,
            reverse,
        } => Some(BorrowedRef {
            source,
            start: *start,
            end: *end,
            offset: *offset,
            reverse: *reverse,
        }),
        _ => None,
    }
}

pub struct Compositor<'a> {
    network: &'a Network,
    options: OffsetOptions,
}

impl<'a> Compositor<'a> {
    pub fn new(network: &'a Network, options: OffsetOptions) -> Self {
        Self { network, options }
    }

    /// Compose `railway` at `zoom`. Every donor must already be in `lookup`.
    ///
    /// Also returns the spatial index built over the finished line.
    pub fn compose(
        &self,
        railway: &RailwayTopology,
        zoom: ZoomLevel,
        lookup: &LineLookup,
    ) -> Result<(ComposedLine, LineIndex)> {
        let borrowed = self.resolve_borrowed(railway, zoom, lookup)?;
        let resolved = self.resolve_remaining(railway, zoom, lookup, borrowed)?;

        let coords: Vec<Coord> = resolved.into_iter().flatten().collect();
        if coords.len() < 2 {
            return Err(RailmeshError::DegenerateGeometry(format!(
                "railway {} composes to {} points at zoom {zoom}",
                railway.id,
                coords.len()
            )));
        }

        let geometry = LineString::new(coords);
        let index = LineIndex::new(&geometry)?;
        let station_offsets = self.station_offsets(railway, &index)?;

        debug!(
            railway = %railway.id,
            %zoom,
            points = geometry.0.len(),
            length = index.length(),
            "composed railway"
        );

        let line = ComposedLine {
            railway: railway.id.clone(),
            zoom,
            geometry,
            color: railway.color.clone(),
            width: RAILWAY_WIDTH,
            altitude: railway.altitude,
            station_offsets,
        };

        Ok((line, index))
    }

    /// Phase one: slice, offset and orient every borrowed subline.
    fn resolve_borrowed(
        &self,
        railway: &RailwayTopology,
        zoom: ZoomLevel,
        lookup: &LineLookup,
    ) -> Result<Vec<Option<Vec<Coord>>>> {
        let unit = zoom.unit();

        railway
            .sublines
            .iter()
            .map(|subline| -> Result<Option<Vec<Coord>>> {
                let Some(borrowed) = as_borrowed(Some(subline)) else {
                    return Ok(None);
                };

                let donor = lookup.require(borrowed.source, zoom)?;
                let mut slice = line_slice(borrowed.start, borrowed.end, &donor.geometry)?;

                if let Some(distance) = borrowed.offset.filter(|o| *o != 0.0) {
                    slice = offset(&slice, distance * unit, &self.options)?;
                }
                if borrowed.reverse {
                    slice.0.reverse();
                }

                Ok(Some(slice.0))
            })
            .collect()
    }

    /// Phase two: own sublines (smoothed against borrowed neighbours) and gaps.
    fn resolve_remaining(
        &self,
        railway: &RailwayTopology,
        zoom: ZoomLevel,
        lookup: &LineLookup,
        mut resolved: Vec<Option<Vec<Coord>>>,
    ) -> Result<Vec<Vec<Coord>>> {
        let unit = zoom.unit();
        let sublines = &railway.sublines;

        for (i, subline) in sublines.iter().enumerate() {
            let previous = as_borrowed(i.checked_sub(1).and_then(|p| sublines.get(p)));
            let next = as_borrowed(sublines.get(i + 1));

            let coords = match subline {
                SublineSpec::Borrowed { .. } => continue,

                SublineSpec::Own { coordinates } => {
                    let mut coords = coordinates.clone();

                    if let Some((neighbour, offset)) = previous.and_then(|p| p.offset.map(|o| (p, o))) {
                        let donor = lookup.require(neighbour.source, zoom)?;
                        let junction = Junction { donor: &donor.geometry, offset, unit };
                        coords = smooth(&coords, &junction, JunctionEnd::Start)?;
                    }
                    if let Some((neighbour, offset)) = next.and_then(|n| n.offset.map(|o| (n, o))) {
                        let donor = lookup.require(neighbour.source, zoom)?;
                        let junction = Junction { donor: &donor.geometry, offset, unit };
                        coords = smooth(&coords, &junction, JunctionEnd::End)?;
                    }

                    coords
                }

                SublineSpec::Interpolated { count } => {
                    let (Some(previous), Some(next)) = (previous, next) else {
                        return Err(RailmeshError::InvalidSubline {
                            railway: railway.id.clone(),
                            index: i,
                            reason: "interpolated subline needs borrowed sublines on both sides".into(),
                        });
                    };

                    let from = lookup.require(previous.source, zoom)?;
                    let to = lookup.require(next.source, zoom)?;

                    interpolate(
                        &GapDonor {
                            line: &from.geometry,
                            offset: previous.offset.unwrap_or(0.0) * unit,
                            reverse: previous.reverse,
                        },
                        &GapDonor {
                            line: &to.geometry,
                            offset: next.offset.unwrap_or(0.0) * unit,
                            reverse: next.reverse,
                        },
                        previous.end,
                        next.start,
                        *count,
                        &self.options,
                    )?
                }
            };

            resolved[i] = Some(coords);
        }

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Arc-length location of each station along the composed line.
    ///
    /// A loop's last station is pinned to the full length; projecting it would
    /// land on the coincident first station instead.
    fn station_offsets(&self, railway: &RailwayTopology, index: &LineIndex) -> Result<Vec<f64>> {
        let last = railway.stations.len().saturating_sub(1);

        railway
            .stations
            .iter()
            .enumerate()
            .map(|(i, station)| -> Result<f64> {
                if railway.is_loop && i == last {
                    return Ok(index.length());
                }

                let alias = self
                    .network
                    .alias(station)
                    .ok_or_else(|| RailmeshError::StationNotFound(station.clone()))?;

                index
                    .project(alias.location)
                    .map(|nearest| nearest.location)
                    .ok_or_else(|| {
                        RailmeshError::DegenerateGeometry(format!("railway {} has no segments", railway.id))
                    })
            })
            .collect()
    }
}
