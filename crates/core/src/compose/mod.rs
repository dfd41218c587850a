//! Turning a network into per-zoom railway lines and station markers.

pub mod compositor;
pub mod order;
pub mod pipeline;
pub mod stations;

pub use compositor::Compositor;
pub use order::dependency_order;
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use stations::StationProjector;
