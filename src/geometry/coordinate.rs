use std::fmt::Display;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Squared-distance tolerance in degrees, roughly 0.1 m at the equator.
pub const CLOSE_ENOUGH_TOLERANCE: f64 = 0.000001;

/// A WGS84 position. `id` is the OSM node the position came from, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { id: None, lat, lon }
    }

    pub fn with_id(id: i64, lat: f64, lon: f64) -> Self {
        Self {
            id: Some(id),
            lat,
            lon,
        }
    }

    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        let lat_diff = self.lat - other.lat;
        let lon_diff = self.lon - other.lon;
        lat_diff * lat_diff + lon_diff * lon_diff
    }

    /// Tolerance test used for ring and hull closure. Not the same test as endpoint
    /// key equality, see [`super::endpoint::EndpointKey`].
    pub fn is_close_enough(&self, other: &Coordinate) -> bool {
        self.distance_squared(other) < CLOSE_ENOUGH_TOLERANCE * CLOSE_ENOUGH_TOLERANCE
    }

    /// Linear interpolation, `t == 1` gives `self`, `t == 0` gives `other`.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate::new(
            t * self.lat + (1.0 - t) * other.lat,
            t * self.lon + (1.0 - t) * other.lon,
        )
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Coordinate::new(value.y, value.x)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Coordinate({id}: {}, {})", self.lat, self.lon),
            None => write!(f, "Coordinate({}, {})", self.lat, self.lon),
        }
    }
}

/// Cross product of `o->a` and `o->b` with latitude as x and longitude as y.
/// Positive for a counter-clockwise (left) turn.
pub fn cross(o: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    (a.lat - o.lat) * (b.lon - o.lon) - (a.lon - o.lon) * (b.lat - o.lat)
}

/// Polar angle of `to` seen from `from`, `atan2(Δlon, Δlat)`.
pub fn polar_angle(from: &Coordinate, to: &Coordinate) -> f64 {
    (to.lon - from.lon).atan2(to.lat - from.lat)
}
