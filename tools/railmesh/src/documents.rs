//! Input documents and their conversion into a planar [`Network`].
//!
//! Four JSON documents describe a network: the railway composition rules, the
//! station groups, and the reference records for railways (station order) and
//! stations (location and served railway). Coordinates are longitude/latitude
//! and are projected into the pipeline's planar frame here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::Coord;
use railmesh_core::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct RailwaysDocument {
    pub railways: Vec<RailwayRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RailwayRecord {
    #[serde(rename = "odpt:railway")]
    pub id: String,
    #[serde(rename = "_color")]
    pub color: String,
    #[serde(rename = "_altitude", default)]
    pub altitude: i32,
    #[serde(rename = "_sublines")]
    pub sublines: Vec<SublineRecord>,
    #[serde(rename = "_loop", default)]
    pub is_loop: bool,
    /// Keep only the first stations of an over-long reference station order.
    #[serde(rename = "_stationLimit", default)]
    pub station_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SublineRecord {
    Borrowed {
        #[serde(rename = "odpt:railway")]
        railway: String,
        start: [f64; 2],
        end: [f64; 2],
        #[serde(default)]
        offset: Option<f64>,
        #[serde(default)]
        reverse: bool,
    },
    Interpolated {
        interpolate: usize,
    },
    Own {
        coordinates: Vec<[f64; 2]>,
    },
}

#[derive(Debug, Deserialize)]
pub struct StationsDocument {
    pub stations: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct StationRecord {
    pub aliases: Vec<String>,
    #[serde(default)]
    pub altitude: i32,
}

#[derive(Debug, Deserialize)]
pub struct RailwayRef {
    #[serde(rename = "owl:sameAs")]
    pub id: String,
    #[serde(rename = "odpt:stationOrder", default)]
    pub station_order: Vec<StationOrderEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StationOrderEntry {
    #[serde(rename = "odpt:station")]
    pub station: String,
}

#[derive(Debug, Deserialize)]
pub struct StationRef {
    #[serde(rename = "owl:sameAs")]
    pub id: String,
    #[serde(rename = "odpt:railway")]
    pub railway: String,
    #[serde(rename = "geo:long")]
    pub longitude: Option<f64>,
    #[serde(rename = "geo:lat")]
    pub latitude: Option<f64>,
}

/// All four documents of one network.
#[derive(Debug)]
pub struct Documents {
    pub railways: RailwaysDocument,
    pub stations: StationsDocument,
    pub railway_refs: Vec<RailwayRef>,
    pub station_refs: Vec<StationRef>,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

impl Documents {
    pub fn into_network(self, projection: &LocalProjection) -> Result<Network> {
        let project = |[lon, lat]: [f64; 2]| projection.forward(Coord { x: lon, y: lat });

        let refs: HashMap<&str, &RailwayRef> =
            self.railway_refs.iter().map(|r| (r.id.as_str(), r)).collect();

        let railways = self
            .railways
            .railways
            .iter()
            .map(|record| -> Result<RailwayTopology> {
                let reference = refs
                    .get(record.id.as_str())
                    .with_context(|| format!("No reference record for railway {}", record.id))?;

                let limit = record.station_limit.unwrap_or(usize::MAX);
                let stations = reference
                    .station_order
                    .iter()
                    .take(limit)
                    .map(|entry| StationIdentifier::new(&entry.station))
                    .collect();

                let sublines = record
                    .sublines
                    .iter()
                    .map(|subline| match subline {
                        SublineRecord::Borrowed {
                            railway,
                            start,
                            end,
                            offset,
                            reverse,
                        } => SublineSpec::Borrowed {
                            source: RailwayIdentifier::new(railway),
                            start: project(*start),
                            end: project(*end),
                            offset: *offset,
                            reverse: *reverse,
                        },
                        SublineRecord::Interpolated { interpolate } => {
                            SublineSpec::Interpolated { count: *interpolate }
                        }
                        SublineRecord::Own { coordinates } => SublineSpec::Own {
                            coordinates: coordinates.iter().copied().map(project).collect(),
                        },
                    })
                    .collect();

                Ok(RailwayTopology {
                    id: RailwayIdentifier::new(&record.id),
                    stations,
                    sublines,
                    color: record.color.as_str().into(),
                    altitude: AltitudeTier(record.altitude),
                    is_loop: record.is_loop,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let aliases: Vec<StationAlias> = self
            .station_refs
            .iter()
            .filter_map(|station| match (station.longitude, station.latitude) {
                (Some(lon), Some(lat)) => Some(StationAlias {
                    id: StationIdentifier::new(&station.id),
                    railway: RailwayIdentifier::new(&station.railway),
                    location: project([lon, lat]),
                }),
                _ => {
                    warn!(station = %station.id, "Station reference has no location");
                    None
                }
            })
            .collect();

        let mut groups = Vec::with_capacity(self.stations.stations.len());
        for (i, record) in self.stations.stations.iter().enumerate() {
            let Some(first) = record.aliases.first() else {
                bail!("Station record {i} has no aliases");
            };

            groups.push(StationGroup {
                id: StationGroupIdentifier::new(first),
                aliases: record.aliases.iter().map(StationIdentifier::new).collect(),
                altitude: AltitudeTier(record.altitude),
            });
        }

        debug!(
            railways = railways.len(),
            aliases = aliases.len(),
            groups = groups.len(),
            "documents converted"
        );

        Network::new(railways, aliases, groups).context("Invalid network")
    }
}
