//! Core data types and enums shared by the geometry pipeline.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Zoom Levels
// ============================================================================

/// One of the discrete levels of detail geometry is synthesized for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    /// Zoom at which one unit equals 0.1 planar units.
    pub const BASE: u8 = 14;

    pub const MIN: u8 = 13;
    pub const MAX: u8 = 18;

    pub const ALL: [ZoomLevel; 6] = [
        ZoomLevel(13),
        ZoomLevel(14),
        ZoomLevel(15),
        ZoomLevel(16),
        ZoomLevel(17),
        ZoomLevel(18),
    ];

    pub fn new(zoom: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&zoom).then_some(Self(zoom))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Planar length of one offset unit at this zoom.
    ///
    /// Halves with every zoom step: `2^(14 - zoom) * 0.1`.
    pub fn unit(self) -> f64 {
        2f64.powi(i32::from(Self::BASE) - i32::from(self.0)) * 0.1
    }

    /// Map zoom range `[min, max)` over which this level is displayed.
    pub fn display_range(self) -> (u8, u8) {
        let min = if self.0 <= Self::MIN { 0 } else { self.0 };
        let max = if self.0 >= Self::MAX { 24 } else { self.0 + 1 };
        (min, max)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Feature Metadata
// ============================================================================

/// Integer altitude tier; negative values are underground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AltitudeTier(pub i32);

impl AltitudeTier {
    pub const SURFACE: AltitudeTier = AltitudeTier(0);

    pub fn is_underground(self) -> bool {
        self.0 < 0
    }

    /// Elevation in metres given to every vertex of a feature at this tier.
    pub fn elevation(self, unit: f64) -> f64 {
        if self.is_underground() {
            -unit * 1000.0
        } else {
            0.0
        }
    }
}

/// Discriminates railway lines from station markers in a feature collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FeatureClass {
    Railway = 0,
    Station = 1,
}

impl FeatureClass {
    pub fn discriminator(self) -> u8 {
        self as u8
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RailmeshError {
    #[error("Railway {railway} has no composed line at zoom {zoom}")]
    MissingDependency {
        railway: RailwayIdentifier,
        zoom: ZoomLevel,
    },

    #[error("Railway not found: {0}")]
    RailwayNotFound(RailwayIdentifier),

    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Railway dependency cycle involving {0}")]
    DependencyCycle(RailwayIdentifier),

    #[error("Composed line for {railway} at zoom {zoom} was already written")]
    DuplicateLine {
        railway: RailwayIdentifier,
        zoom: ZoomLevel,
    },

    #[error("Invalid subline {index} of {railway}: {reason}")]
    InvalidSubline {
        railway: RailwayIdentifier,
        index: usize,
        reason: String,
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Offset failed: {0}")]
    OffsetFailed(String),
}

pub type Result<T> = std::result::Result<T, RailmeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_unit() {
        assert_eq!(ZoomLevel(14).unit(), 0.1);
        assert_eq!(ZoomLevel(13).unit(), 0.2);
        assert_eq!(ZoomLevel(18).unit(), 0.00625);
    }

    #[test]
    fn test_zoom_bounds() {
        assert_eq!(ZoomLevel::new(12), None);
        assert_eq!(ZoomLevel::new(19), None);
        assert_eq!(ZoomLevel::new(15).map(ZoomLevel::value), Some(15));
        assert_eq!(ZoomLevel::ALL.len(), 6);
    }

    #[test]
    fn test_display_range() {
        assert_eq!(ZoomLevel(13).display_range(), (0, 14));
        assert_eq!(ZoomLevel(15).display_range(), (15, 16));
        assert_eq!(ZoomLevel(18).display_range(), (18, 24));
    }

    #[test]
    fn test_altitude_elevation() {
        assert!(AltitudeTier(-1).is_underground());
        assert!(!AltitudeTier::SURFACE.is_underground());
        assert_eq!(AltitudeTier(-1).elevation(0.1), -100.0);
        assert_eq!(AltitudeTier(1).elevation(0.1), 0.0);
    }
}
