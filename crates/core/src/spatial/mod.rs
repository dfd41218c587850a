//! Spatial indexing of composed lines.

pub mod index;

pub use index::LineIndex;
