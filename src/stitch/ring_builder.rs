use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{close_ring, convex_hull, Coordinate, Ring};

use super::{PathStitcher, StitchError, StitchedPath, WayCoordinates};

/// What to do with ways the stitching walk never reached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftoverPolicy {
    /// Append their coordinates, unjoined, after the stitched path.
    #[default]
    #[value(name = "append")]
    AppendUncombined,
    /// Drop them.
    Discard,
    /// Stitch them again into further rings until none remain.
    #[value(name = "separate")]
    SeparateRings,
    /// Treat the walk as incomplete and use the convex hull of every way.
    #[value(name = "hull")]
    ConvexHull,
}

/// Turns the resolved ways of one boundary into closed rings.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingBuilder {
    leftover_policy: LeftoverPolicy,
}

impl RingBuilder {
    pub fn new(leftover_policy: LeftoverPolicy) -> Self {
        Self { leftover_policy }
    }

    pub fn leftover_policy(&self) -> LeftoverPolicy {
        self.leftover_policy
    }

    /// Ways that are rings on their own come out first, in input order, followed by the
    /// stitched ring(s) of everything else.
    pub fn build(&self, ways: Vec<WayCoordinates>) -> Result<Vec<Ring>, StitchError> {
        let (closed, open): (Vec<_>, Vec<_>) = ways.into_iter().partition(|way| way.is_closed());

        let mut rings: Vec<Ring> = closed
            .into_iter()
            .map(|way| {
                debug!(way_id = way.id, "Closed way kept as its own ring");
                way.coords
            })
            .collect();

        if open.is_empty() {
            if rings.is_empty() {
                return Err(StitchError::NoUsableWays);
            }
            return Ok(rings);
        }

        match self.leftover_policy {
            LeftoverPolicy::SeparateRings => self.stitch_separately(open, &mut rings)?,
            _ => rings.push(self.stitch_single(&open)?),
        }

        Ok(rings)
    }

    fn stitch_single(&self, ways: &[WayCoordinates]) -> Result<Ring, StitchError> {
        let path = match stitch_or_hull(ways)? {
            Stitched::Path(path) => path,
            Stitched::Hull(ring) => return Ok(ring),
        };

        if path.is_complete() {
            return Ok(close_ring(path.coords));
        }

        warn!(
            leftover = path.leftover.len(),
            ways = ways.len(),
            policy = ?self.leftover_policy,
            "Ways left over after stitching"
        );

        Ok(match self.leftover_policy {
            LeftoverPolicy::AppendUncombined => close_ring(append_leftovers(path, ways)),
            LeftoverPolicy::Discard | LeftoverPolicy::SeparateRings => close_ring(path.coords),
            LeftoverPolicy::ConvexHull => hull_of(ways),
        })
    }

    fn stitch_separately(
        &self,
        ways: Vec<WayCoordinates>,
        rings: &mut Vec<Ring>,
    ) -> Result<(), StitchError> {
        let mut remaining = ways;
        while !remaining.is_empty() {
            let path = match stitch_or_hull(&remaining)? {
                Stitched::Path(path) => path,
                Stitched::Hull(ring) => {
                    rings.push(ring);
                    return Ok(());
                }
            };

            rings.push(close_ring(path.coords));

            remaining = path
                .leftover
                .iter()
                .filter_map(|idx| remaining.get(*idx).cloned())
                .collect();
        }
        Ok(())
    }
}

enum Stitched {
    Path(StitchedPath),
    Hull(Ring),
}

/// Stitches `ways`, falling back to their convex hull when the walk cannot start or makes
/// no progress. Other stitch errors are returned.
fn stitch_or_hull(ways: &[WayCoordinates]) -> Result<Stitched, StitchError> {
    match PathStitcher::new(ways).stitch() {
        Ok(path) => Ok(Stitched::Path(path)),
        Err(error) if error.is_incomplete() => {
            warn!(error = ?error, ways = ways.len(), "Stitching incomplete, using convex hull");
            Ok(Stitched::Hull(hull_of(ways)))
        }
        Err(error) => Err(error),
    }
}

fn append_leftovers(path: StitchedPath, ways: &[WayCoordinates]) -> Vec<Coordinate> {
    let mut coords = path.coords;
    for way in path.leftover.iter().filter_map(|idx| ways.get(*idx)) {
        coords.extend_from_slice(&way.coords);
    }
    coords
}

fn hull_of(ways: &[WayCoordinates]) -> Ring {
    let points = ways
        .iter()
        .flat_map(|way| way.coords.iter().copied())
        .collect::<Vec<_>>();
    close_ring(convex_hull(&points))
}
