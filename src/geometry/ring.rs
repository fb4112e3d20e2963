use super::coordinate::Coordinate;

/// Closed sequence of coordinates, first ≈ last.
pub type Ring = Vec<Coordinate>;

/// Appends a copy of the first point unless the sequence already ends within
/// tolerance of where it starts. Empty input is returned as is.
pub fn close_ring(mut coords: Vec<Coordinate>) -> Ring {
    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if !first.is_close_enough(last) {
            let first = *first;
            coords.push(first);
        }
    }
    coords
}

pub fn is_closed(coords: &[Coordinate]) -> bool {
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) => coords.len() > 1 && first.is_close_enough(last),
        _ => false,
    }
}
