//! Planar geometry: primitives, buffering, offsetting, smoothing and gap
//! interpolation.

pub mod buffer;
pub mod interpolate;
pub mod offset;
pub mod primitives;
pub mod projection;
pub mod smooth;

pub use buffer::{buffer_line, buffer_point, outline, DEFAULT_QUADRANT_SEGMENTS};
pub use interpolate::{interpolate, GapDonor};
pub use offset::{offset, OffsetOptions};
pub use primitives::{line_slice, nearest_point_on_line, NearestPoint};
pub use projection::LocalProjection;
pub use smooth::{smooth, signed_nearest, Junction, JunctionEnd, SignedNearest};
