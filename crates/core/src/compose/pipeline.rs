//! Whole-network synthesis: every railway and station at every zoom level.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::compose::compositor::Compositor;
use crate::compose::order::dependency_order;
use crate::compose::stations::StationProjector;
use crate::geometry::buffer::DEFAULT_QUADRANT_SEGMENTS;
use crate::geometry::offset::OffsetOptions;
use crate::identifiers::RailwayIdentifier;
use crate::models::features::{ComposedLine, Feature, FeatureCollection, LineLookup};
use crate::models::topology::Network;
use crate::models::types::*;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Zoom levels to synthesize, in processing order.
    pub zoom_levels: Vec<ZoomLevel>,
    pub offset: OffsetOptions,
    /// Disc segments per quadrant for station markers.
    pub marker_segments: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            zoom_levels: ZoomLevel::ALL.to_vec(),
            offset: OffsetOptions::default(),
            marker_segments: DEFAULT_QUADRANT_SEGMENTS,
        }
    }
}

/// Finished features plus the lookup they were composed through.
#[derive(Debug)]
pub struct PipelineOutput {
    pub features: FeatureCollection,
    pub lines: LineLookup,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compose all railways, zoom levels outer and railways inner, then
    /// project the stations of each zoom level onto the finished lines.
    ///
    /// Any error aborts the run; there is no partial output.
    pub fn run(&self, network: &Network) -> Result<PipelineOutput> {
        let order = dependency_order(network)
            .inspect_err(|e| warn!("Rejected railway dependency order: {}", e))?;
        debug!(railways = order.len(), "dependency order resolved");

        let compositor = Compositor::new(network, self.config.offset);
        let mut lookup = LineLookup::new();
        let mut features = Vec::new();

        for &zoom in &self.config.zoom_levels {
            let mut indices = HashMap::with_capacity(order.len());

            for railway in &order {
                let (line, index) = compositor
                    .compose(railway, zoom, &lookup)
                    .inspect_err(|e| warn!(railway = %railway.id, %zoom, "Composition failed: {}", e))?;

                indices.insert(railway.id.clone(), index);
                features.push(Feature::Railway(lookup.insert(line)?));
            }

            let projector =
                StationProjector::new(network, &indices, zoom, self.config.marker_segments);
            let mut markers = 0;

            for group in network.groups() {
                if group.aliases.is_empty() {
                    warn!(station = %group.id, %zoom, "Skipping station without aliases");
                    continue;
                }

                let marker = projector
                    .project(group)
                    .inspect_err(|e| warn!(station = %group.id, %zoom, "Projection failed: {}", e))?;
                features.push(Feature::Station(marker));
                markers += 1;
            }

            info!(
                "Zoom {}: composed {} railways and {} station markers",
                zoom,
                indices.len(),
                markers
            );
        }

        Ok(PipelineOutput {
            features: FeatureCollection { features },
            lines: lookup,
        })
    }
}

impl PipelineOutput {
    /// Composed line of `railway` at `zoom`, if it was synthesized.
    pub fn line(&self, railway: &RailwayIdentifier, zoom: ZoomLevel) -> Option<&Arc<ComposedLine>> {
        self.lines.get(railway, zoom)
    }
}
