pub mod centroid;
pub mod coordinate;
pub mod endpoint;
pub mod hull;
pub mod ring;

pub use centroid::{interior_centroid, point_in_polygon, CenterResolution, InteriorCenter};
pub use coordinate::Coordinate;
pub use endpoint::{is_same_endpoint, EndpointKey};
pub use hull::convex_hull;
pub use ring::{close_ring, Ring};
