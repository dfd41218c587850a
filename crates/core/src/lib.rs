//! # railmesh-core
//!
//! Per-zoom railway line and station marker geometry from transit topology.
//!
//! ## Features
//!
//! - **Parallel offsets**: railways sharing track are drawn side by side,
//!   cut from round-joined buffers so sharp curves stay clean
//! - **Smooth joins**: drawn sublines ease into their offset neighbours
//! - **Gap interpolation**: synthetic connections between two borrowed lines
//! - **Station markers**: aliases snapped onto their lines and buffered
//! - **GeoJSON export**: precision-limited output for inspection
//!
//! ## Example
//!
//! ```
//! use railmesh_core::prelude::*;
//! use geo::coord;
//!
//! let railway = RailwayTopology {
//!     id: RailwayIdentifier::new("ginza"),
//!     stations: vec![StationIdentifier::new("ginza.shibuya")],
//!     sublines: vec![SublineSpec::Own {
//!         coordinates: vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 0.0 }],
//!     }],
//!     color: "#F39700".into(),
//!     altitude: AltitudeTier(-1),
//!     is_loop: false,
//! };
//! let alias = StationAlias {
//!     id: StationIdentifier::new("ginza.shibuya"),
//!     railway: RailwayIdentifier::new("ginza"),
//!     location: coord! { x: 0.2, y: 0.1 },
//! };
//! let group = StationGroup {
//!     id: StationGroupIdentifier::new("shibuya"),
//!     aliases: vec![StationIdentifier::new("ginza.shibuya")],
//!     altitude: AltitudeTier(-1),
//! };
//!
//! let network = Network::new(vec![railway], vec![alias], vec![group]).unwrap();
//! let output = Pipeline::new(PipelineConfig::default()).run(&network).unwrap();
//!
//! // One line and one marker for each of the six zoom levels
//! assert_eq!(output.features.railways().count(), 6);
//! assert_eq!(output.features.stations().count(), 6);
//! ```

pub mod compose;
pub mod export;
pub mod geometry;
pub mod identifiers;
pub mod models;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::compose::{Pipeline, PipelineConfig, PipelineOutput};
    pub use crate::export::{to_geojson, DEFAULT_PRECISION};
    pub use crate::geometry::{LocalProjection, OffsetOptions};
    pub use crate::identifiers::*;
    pub use crate::models::*;
}

pub use prelude::*;
