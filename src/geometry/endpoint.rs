use std::fmt::Display;

use super::coordinate::Coordinate;

const KEY_SCALE: f64 = 1_000_000.0;

/// Per-axis distance under which two endpoints connect, one quantization step.
pub const ENDPOINT_TOLERANCE: f64 = 1.0 / KEY_SCALE;

/// A coordinate quantized to 6 decimal places, rendered as `"lat,lon"`.
///
/// Used as the hash key for shared way endpoints. Two coordinates that quantize to the
/// same digits are the same endpoint even if they differ slightly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointKey(String);

fn quantize(value: f64) -> f64 {
    let rounded = (value * KEY_SCALE).round() / KEY_SCALE;
    // avoid "-0.000000" and "0.000000" becoming two keys
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl EndpointKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keys of the cells around `point`. A coordinate within [`ENDPOINT_TOLERANCE`] of
    /// `point` on both axes but rounded across a cell boundary lands in one of these.
    pub fn neighbours(point: &Coordinate) -> Vec<EndpointKey> {
        let own = EndpointKey::from(point);
        let mut keys: Vec<EndpointKey> = Vec::with_capacity(8);
        for lat_step in [-ENDPOINT_TOLERANCE, 0.0, ENDPOINT_TOLERANCE] {
            for lon_step in [-ENDPOINT_TOLERANCE, 0.0, ENDPOINT_TOLERANCE] {
                let key =
                    EndpointKey::from(&Coordinate::new(point.lat + lat_step, point.lon + lon_step));
                if key != own && !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

/// Both axes differ by less than [`ENDPOINT_TOLERANCE`].
pub fn is_same_endpoint(a: &Coordinate, b: &Coordinate) -> bool {
    (a.lat - b.lat).abs() < ENDPOINT_TOLERANCE && (a.lon - b.lon).abs() < ENDPOINT_TOLERANCE
}

impl From<&Coordinate> for EndpointKey {
    fn from(value: &Coordinate) -> Self {
        Self(format!(
            "{:.6},{:.6}",
            quantize(value.lat),
            quantize(value.lon)
        ))
    }
}

impl Display for EndpointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_format() {
        let key = EndpointKey::from(&Coordinate::new(21.0285, 105.8542));
        assert_eq!(key.as_str(), "21.028500,105.854200");
    }

    #[test]
    fn near_identical_coordinates_share_a_key() {
        let a = EndpointKey::from(&Coordinate::new(21.0000001, 105.5000004));
        let b = EndpointKey::from(&Coordinate::new(20.9999998, 105.4999999));
        assert_eq!(a, b);
    }

    #[test]
    fn negative_zero_is_normalized() {
        let a = EndpointKey::from(&Coordinate::new(-0.0000001, 0.0));
        let b = EndpointKey::from(&Coordinate::new(0.0, 0.0000001));
        assert_eq!(a.as_str(), "0.000000,0.000000");
        assert_eq!(a, b);
    }

    #[test]
    fn coordinates_across_a_cell_boundary_are_neighbours() {
        let a = Coordinate::new(10.0000004, 20.0);
        let b = Coordinate::new(10.0000006, 20.0);
        assert_ne!(EndpointKey::from(&a), EndpointKey::from(&b));
        assert!(EndpointKey::neighbours(&a).contains(&EndpointKey::from(&b)));
        assert_eq!(EndpointKey::neighbours(&a).len(), 8);
        assert!(is_same_endpoint(&a, &b));
        assert!(!is_same_endpoint(&a, &Coordinate::new(10.0000016, 20.0)));
    }

    #[test]
    fn distinct_points_have_distinct_keys() {
        let a = EndpointKey::from(&Coordinate::new(1.0, 1.0));
        let b = EndpointKey::from(&Coordinate::new(1.00001, 1.0));
        assert_ne!(a, b);
    }
}
