use tracing::trace;

use crate::geometry::{is_same_endpoint, Coordinate};

use super::{index::EndpointIndex, StitchError, WayCoordinates};

/// Result of one walk over the endpoint index.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedPath {
    pub coords: Vec<Coordinate>,
    /// Indices of input ways the walk never reached, in input order.
    pub leftover: Vec<usize>,
}

impl StitchedPath {
    pub fn is_complete(&self) -> bool {
        self.leftover.is_empty()
    }
}

/// Chains ways end to start into one path, reversing ways where needed.
pub struct PathStitcher<'a> {
    ways: &'a [WayCoordinates],
    index: EndpointIndex<'a>,
}

impl<'a> PathStitcher<'a> {
    pub fn new(ways: &'a [WayCoordinates]) -> Self {
        Self {
            ways,
            index: EndpointIndex::build(ways),
        }
    }

    pub fn stitch(&self) -> Result<StitchedPath, StitchError> {
        let start_point = self
            .index
            .start_endpoint()
            .and_then(|key| self.index.connections(key).first())
            .and_then(|connection| connection.endpoint())
            .copied()
            .ok_or(StitchError::NoStartingPoint)?;

        let mut used = vec![false; self.ways.len()];
        let mut coords: Vec<Coordinate> = Vec::new();
        let mut current = start_point;

        loop {
            let next = self
                .index
                .connections_near(&current)
                .into_iter()
                .find(|connection| !used[connection.way_idx]);
            let connection = match next {
                Some(connection) => connection,
                None => break,
            };
            used[connection.way_idx] = true;

            let oriented: Vec<Coordinate> = if connection.is_start {
                connection.coords.to_vec()
            } else {
                connection.coords.iter().rev().copied().collect()
            };
            let (last, head) = match oriented.split_last() {
                Some(split) => split,
                None => continue,
            };

            trace!(
                way_id = connection.way_id,
                reversed = !connection.is_start,
                from = %current,
                "Appending way"
            );

            coords.extend_from_slice(head);
            current = *last;
        }

        if coords.is_empty() {
            return Err(StitchError::NoProgress {
                way_count: self.ways.len(),
            });
        }

        // An open walk keeps its terminal point; a closed one is finished by the ring closer.
        if !is_same_endpoint(&current, &start_point) {
            coords.push(current);
        }

        let leftover = used
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(idx, _)| idx)
            .collect();

        Ok(StitchedPath { coords, leftover })
    }
}
