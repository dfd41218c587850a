//! Topology inputs, synthesized features and shared types.

pub mod features;
pub mod topology;
pub mod types;

// Re-exports for convenience
pub use features::{ComposedLine, Feature, FeatureCollection, FeatureKey, LineLookup, StationMarker};
pub use topology::{Network, RailwayTopology, StationAlias, StationGroup, SublineSpec};
pub use types::{AltitudeTier, FeatureClass, RailmeshError, Result, ZoomLevel};
