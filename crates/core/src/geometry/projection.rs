//! Local planar frame for geographic input.
//!
//! The pipeline works in kilometres on a plane. Geographic documents are
//! projected with an equirectangular approximation around an origin, which is
//! accurate enough at the scale of a single metropolitan network.

use geo::Coord;

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalProjection {
    origin: Coord,
    km_per_degree_lon: f64,
}

impl LocalProjection {
    /// Projection centred on `origin`, given as longitude/latitude.
    pub fn new(origin: Coord) -> Self {
        Self {
            origin,
            km_per_degree_lon: KM_PER_DEGREE * origin.y.to_radians().cos(),
        }
    }

    /// Longitude/latitude to planar kilometres.
    pub fn forward(&self, lon_lat: Coord) -> Coord {
        Coord {
            x: (lon_lat.x - self.origin.x) * self.km_per_degree_lon,
            y: (lon_lat.y - self.origin.y) * KM_PER_DEGREE,
        }
    }

    /// Planar kilometres back to longitude/latitude.
    pub fn inverse(&self, planar: Coord) -> Coord {
        Coord {
            x: self.origin.x + planar.x / self.km_per_degree_lon,
            y: self.origin.y + planar.y / KM_PER_DEGREE,
        }
    }
}
