//! Railway topology as supplied by the loading layer.
//!
//! All coordinates are planar; callers that load geographic documents project
//! them first (see [`crate::geometry::projection::LocalProjection`]).

use std::collections::HashMap;
use std::sync::Arc;

use geo::Coord;

use crate::identifiers::*;
use crate::models::types::*;

/// One declared segment of a railway's line.
#[derive(Clone, Debug, PartialEq)]
pub enum SublineSpec {
    /// Slice of another railway's composed line between two points.
    Borrowed {
        source: RailwayIdentifier,
        start: Coord,
        end: Coord,
        /// Lateral offset in zoom units; positive is right of the source's direction.
        offset: Option<f64>,
        reverse: bool,
    },

    /// Explicit coordinates, smoothed towards adjacent borrowed sublines.
    Own { coordinates: Vec<Coord> },

    /// Synthetic connection between the neighbouring borrowed sublines.
    Interpolated { count: usize },
}

impl SublineSpec {
    pub fn borrowed_from(&self) -> Option<&RailwayIdentifier> {
        match self {
            SublineSpec::Borrowed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RailwayTopology {
    pub id: RailwayIdentifier,
    pub stations: Vec<StationIdentifier>,
    pub sublines: Vec<SublineSpec>,
    pub color: Arc<str>,
    pub altitude: AltitudeTier,
    /// First and last station coincide.
    pub is_loop: bool,
}

/// A station as served by one railway.
#[derive(Clone, Debug, PartialEq)]
pub struct StationAlias {
    pub id: StationIdentifier,
    pub railway: RailwayIdentifier,
    pub location: Coord,
}

/// Physical station made of one alias per railway it serves.
#[derive(Clone, Debug)]
pub struct StationGroup {
    pub id: StationGroupIdentifier,
    pub aliases: Vec<StationIdentifier>,
    pub altitude: AltitudeTier,
}

/// Validated in-memory network: railways in declared order plus station data.
#[derive(Clone, Debug, Default)]
pub struct Network {
    railways: Vec<RailwayTopology>,
    aliases: HashMap<StationIdentifier, StationAlias>,
    groups: Vec<StationGroup>,
}

impl Network {
    /// Build a network, checking that every referenced station and railway exists.
    pub fn new(
        railways: Vec<RailwayTopology>,
        aliases: Vec<StationAlias>,
        groups: Vec<StationGroup>,
    ) -> Result<Self> {
        let aliases: HashMap<_, _> = aliases.into_iter().map(|a| (a.id.clone(), a)).collect();

        let network = Self {
            railways,
            aliases,
            groups,
        };
        network.validate()?;

        Ok(network)
    }

    fn validate(&self) -> Result<()> {
        for railway in &self.railways {
            if let Some(missing) = railway
                .stations
                .iter()
                .find(|s| !self.aliases.contains_key(*s))
            {
                return Err(RailmeshError::StationNotFound(missing.clone()));
            }

            for source in railway.sublines.iter().filter_map(SublineSpec::borrowed_from) {
                if self.railway(source).is_none() {
                    return Err(RailmeshError::RailwayNotFound(source.clone()));
                }
            }
        }

        for group in &self.groups {
            for alias in &group.aliases {
                let alias = self
                    .aliases
                    .get(alias)
                    .ok_or_else(|| RailmeshError::StationNotFound(alias.clone()))?;

                if self.railway(&alias.railway).is_none() {
                    return Err(RailmeshError::RailwayNotFound(alias.railway.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn railways(&self) -> &[RailwayTopology] {
        &self.railways
    }

    pub fn railway(&self, id: &RailwayIdentifier) -> Option<&RailwayTopology> {
        self.railways.iter().find(|r| &r.id == id)
    }

    pub fn alias(&self, id: &StationIdentifier) -> Option<&StationAlias> {
        self.aliases.get(id)
    }

    pub fn groups(&self) -> &[StationGroup] {
        &self.groups
    }
}
