use serde::{Deserialize, Serialize};
use tracing::warn;

use super::coordinate::Coordinate;

const RAY_CAST_EPSILON: f64 = 1e-14;
const INTERPOLATION_STEPS: u32 = 20;

/// How the center point of a ring was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CenterResolution {
    /// Area-weighted centroid, already inside the ring.
    Centroid,
    /// Centroid moved toward the first vertex; `t` is the weight kept on the centroid.
    Interpolated { t: f64 },
    /// Zero signed area, first vertex returned.
    DegenerateRing,
    /// No interpolated point tested inside, first vertex returned.
    NoInteriorPointFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteriorCenter {
    pub lat: f64,
    pub lon: f64,
    pub resolution: CenterResolution,
}

impl InteriorCenter {
    fn new(point: &Coordinate, resolution: CenterResolution) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
            resolution,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(
            self.resolution,
            CenterResolution::DegenerateRing | CenterResolution::NoInteriorPointFound
        )
    }
}

/// Ray casting with the odd-crossing rule, longitude as x and latitude as y.
/// Points exactly on an edge may land on either side.
pub fn point_in_polygon(lat: f64, lon: f64, ring: &[Coordinate]) -> bool {
    if ring.is_empty() {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);
        if (xi > lon) != (xj > lon)
            && lat < (yj - yi) * (lon - xi) / (xj - xi + RAY_CAST_EPSILON) + yi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Signed shoelace area (positive for counter-clockwise in lon/lat) and the
/// area-weighted centroid. The centroid is `None` when the area is exactly zero.
pub fn signed_area_and_centroid(ring: &[Coordinate]) -> (f64, Option<Coordinate>) {
    let n = ring.len();
    if n < 3 {
        return (0.0, None);
    }

    let mut doubled_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let term = a.lon * b.lat - b.lon * a.lat;
        doubled_area += term;
        cx += (a.lon + b.lon) * term;
        cy += (a.lat + b.lat) * term;
    }

    let area = doubled_area / 2.0;
    if area == 0.0 {
        return (area, None);
    }

    (area, Some(Coordinate::new(cy / (6.0 * area), cx / (6.0 * area))))
}

/// Picks a point inside `ring`.
///
/// Starts from the area-weighted centroid. When that falls outside (concave shapes), the
/// point is walked toward the first vertex in twenty steps and the first one inside is
/// used. Degenerate rings and exhausted searches fall back to the first vertex.
/// Returns `None` only for an empty ring.
pub fn interior_centroid(ring: &[Coordinate]) -> Option<InteriorCenter> {
    let first = ring.first()?;

    let centroid = match signed_area_and_centroid(ring) {
        (_, Some(centroid)) => centroid,
        (_, None) => {
            warn!(points = ring.len(), "Degenerate ring, using first vertex as center");
            return Some(InteriorCenter::new(first, CenterResolution::DegenerateRing));
        }
    };

    if point_in_polygon(centroid.lat, centroid.lon, ring) {
        return Some(InteriorCenter::new(&centroid, CenterResolution::Centroid));
    }

    for step in (0..INTERPOLATION_STEPS).rev() {
        let t = step as f64 / INTERPOLATION_STEPS as f64;
        let candidate = centroid.lerp(first, t);
        if point_in_polygon(candidate.lat, candidate.lon, ring) {
            return Some(InteriorCenter::new(
                &candidate,
                CenterResolution::Interpolated { t },
            ));
        }
    }

    warn!(
        points = ring.len(),
        "No interior point found, using first vertex as center"
    );
    Some(InteriorCenter::new(
        first,
        CenterResolution::NoInteriorPointFound,
    ))
}
