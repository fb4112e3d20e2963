use std::collections::BTreeMap;

use crate::geometry::{is_same_endpoint, Coordinate, EndpointKey};

use super::WayCoordinates;

/// One end of a way as seen from the endpoint index.
#[derive(Debug, Clone, Copy)]
pub struct Connection<'a> {
    pub way_idx: usize,
    pub way_id: i64,
    /// `true` when this record is the way's first coordinate.
    pub is_start: bool,
    pub coords: &'a [Coordinate],
}

impl<'a> Connection<'a> {
    /// The coordinate this record was indexed under.
    pub fn endpoint(&self) -> Option<&'a Coordinate> {
        if self.is_start {
            self.coords.first()
        } else {
            self.coords.last()
        }
    }
}

/// Endpoint key -> ways touching that endpoint.
///
/// Keys are kept ordered so that the start endpoint, and therefore the stitched
/// output, is reproducible for a given input.
#[derive(Debug, Default)]
pub struct EndpointIndex<'a> {
    connections: BTreeMap<EndpointKey, Vec<Connection<'a>>>,
}

impl<'a> EndpointIndex<'a> {
    pub fn build(ways: &'a [WayCoordinates]) -> Self {
        let mut connections: BTreeMap<EndpointKey, Vec<Connection<'a>>> = BTreeMap::new();

        for (way_idx, way) in ways.iter().enumerate() {
            let (first, last) = match (way.coords.first(), way.coords.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => continue,
            };
            connections
                .entry(EndpointKey::from(first))
                .or_default()
                .push(Connection {
                    way_idx,
                    way_id: way.id,
                    is_start: true,
                    coords: &way.coords,
                });
            connections
                .entry(EndpointKey::from(last))
                .or_default()
                .push(Connection {
                    way_idx,
                    way_id: way.id,
                    is_start: false,
                    coords: &way.coords,
                });
        }

        Self { connections }
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn endpoint_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connections(&self, key: &EndpointKey) -> &[Connection<'a>] {
        self.connections
            .get(key)
            .map(|connections| connections.as_slice())
            .unwrap_or(&[])
    }

    /// Connections at `point`: those under its own key first, then those in neighbouring
    /// cells whose endpoint is within tolerance of `point` on both axes.
    pub fn connections_near(&self, point: &Coordinate) -> Vec<Connection<'a>> {
        let mut found = self.connections(&EndpointKey::from(point)).to_vec();
        for key in EndpointKey::neighbours(point) {
            found.extend(self.connections(&key).iter().filter(|connection| {
                connection
                    .endpoint()
                    .is_some_and(|endpoint| is_same_endpoint(endpoint, point))
            }));
        }
        found
    }

    /// Smallest key touched by exactly one way end.
    pub fn dangling_endpoint(&self) -> Option<&EndpointKey> {
        self.connections
            .iter()
            .find(|(_, connections)| connections.len() == 1)
            .map(|(key, _)| key)
    }

    /// A dangling endpoint if there is one, the smallest key otherwise.
    pub fn start_endpoint(&self) -> Option<&EndpointKey> {
        self.dangling_endpoint()
            .or_else(|| self.connections.keys().next())
    }
}
