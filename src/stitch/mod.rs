use std::collections::HashMap;

use tracing::trace;

use crate::geometry::Coordinate;

pub mod index;
pub mod path;
pub mod ring_builder;

pub use path::{PathStitcher, StitchedPath};
pub use ring_builder::{LeftoverPolicy, RingBuilder};

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum StitchError {
    #[error("No way resolved to at least two coordinates")]
    NoUsableWays,

    #[error("No starting endpoint found")]
    NoStartingPoint,

    #[error("Walk made no progress over {way_count} ways")]
    NoProgress { way_count: usize },
}

impl StitchError {
    /// Stitching could not produce a path, but the hull fallback can still be applied.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            StitchError::NoStartingPoint | StitchError::NoProgress { .. }
        )
    }
}

/// Resolves OSM node ids to positions.
pub trait NodeIndex {
    fn coordinate(&self, node_id: i64) -> Option<Coordinate>;
}

impl NodeIndex for HashMap<i64, Coordinate> {
    fn coordinate(&self, node_id: i64) -> Option<Coordinate> {
        self.get(&node_id).copied()
    }
}

/// A way after its node references have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct WayCoordinates {
    pub id: i64,
    pub coords: Vec<Coordinate>,
}

impl WayCoordinates {
    /// Resolves `node_refs`, skipping ids the index does not know. Ways with fewer than
    /// two resolvable nodes cannot be stitched and yield `None`.
    pub fn resolve<N>(id: i64, node_refs: &[i64], nodes: &N) -> Option<Self>
    where
        N: NodeIndex + ?Sized,
    {
        let coords = node_refs
            .iter()
            .filter_map(|node_id| nodes.coordinate(*node_id))
            .collect::<Vec<_>>();

        if coords.len() != node_refs.len() {
            trace!(
                way_id = id,
                missing = node_refs.len() - coords.len(),
                "Way has unresolved nodes"
            );
        }

        if coords.len() < 2 {
            return None;
        }

        Some(Self { id, coords })
    }

    /// At least 4 points and exactly equal ends: already a ring on its own.
    pub fn is_closed(&self) -> bool {
        self.coords.len() >= 4
            && match (self.coords.first(), self.coords.last()) {
                (Some(first), Some(last)) => first.lat == last.lat && first.lon == last.lon,
                _ => false,
            }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn nodes() -> HashMap<i64, Coordinate> {
        HashMap::from([
            (1, Coordinate::with_id(1, 0.0, 0.0)),
            (2, Coordinate::with_id(2, 0.0, 1.0)),
            (3, Coordinate::with_id(3, 1.0, 1.0)),
        ])
    }

    #[test]
    fn resolve_skips_missing_nodes() {
        let way = WayCoordinates::resolve(10, &[1, 99, 2, 3], &nodes()).unwrap();
        assert_eq!(way.id, 10);
        assert_eq!(
            way.coords.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn resolve_drops_short_ways() {
        assert!(WayCoordinates::resolve(10, &[1, 98, 99], &nodes()).is_none());
        assert!(WayCoordinates::resolve(10, &[], &nodes()).is_none());
    }

    #[test]
    fn closed_way_needs_four_points() {
        let closed = WayCoordinates::resolve(1, &[1, 2, 3, 1], &nodes()).unwrap();
        assert!(closed.is_closed());
        let there_and_back = WayCoordinates::resolve(2, &[1, 2, 1], &nodes()).unwrap();
        assert!(!there_and_back.is_closed());
        let open = WayCoordinates::resolve(3, &[1, 2, 3], &nodes()).unwrap();
        assert!(!open.is_closed());
    }

    #[test]
    fn incomplete_errors() {
        assert!(StitchError::NoStartingPoint.is_incomplete());
        assert!(StitchError::NoProgress { way_count: 3 }.is_incomplete());
        assert!(!StitchError::NoUsableWays.is_incomplete());
    }
}
