use serde::Deserialize;

use crate::geometry::{Coordinate, Ring};

#[derive(Debug, thiserror::Error)]
pub enum RingCodecError {
    #[error("Failed to encode ring: {error}")]
    Encode { error: serde_json::Error },

    #[error("Failed to decode ring: {error}")]
    Decode { error: serde_json::Error },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPoint {
    Object(Coordinate),
    /// `[lat, lon]`
    Pair([f64; 2]),
}

impl From<StoredPoint> for Coordinate {
    fn from(value: StoredPoint) -> Self {
        match value {
            StoredPoint::Object(coordinate) => coordinate,
            StoredPoint::Pair([lat, lon]) => Coordinate::new(lat, lon),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRings {
    Many(Vec<Vec<StoredPoint>>),
    One(Vec<StoredPoint>),
}

fn into_ring(points: Vec<StoredPoint>) -> Ring {
    points.into_iter().map(Coordinate::from).collect()
}

/// `[[{"id":..,"lat":..,"lon":..}, ...], ...]`, `id` left out when unknown.
pub fn encode_rings(rings: &[Ring]) -> Result<String, RingCodecError> {
    serde_json::to_string(rings).map_err(|error| RingCodecError::Encode { error })
}

/// Reads either a single ring or a list of rings, each point a coordinate object or a
/// `[lat, lon]` pair.
pub fn decode_rings(json: &str) -> Result<Vec<Ring>, RingCodecError> {
    let stored: StoredRings =
        serde_json::from_str(json).map_err(|error| RingCodecError::Decode { error })?;
    Ok(match stored {
        StoredRings::Many(rings) => rings.into_iter().map(into_ring).collect(),
        StoredRings::One(points) => vec![into_ring(points)],
    })
}
