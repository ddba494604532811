//! AccessMap Geo - Geodesic distance and radius filtering
//!
//! Pure functions over validated [`Coordinate`](accessmap_core::models::Coordinate)s:
//! haversine distance, radius tests, path length, and a conservative
//! bounding-box pre-filter for candidate pruning.

pub mod bbox;
pub mod distance;

pub use bbox::BoundingBox;
pub use distance::{
    distance, path_length, to_point, validate_radius, within_radius, EARTH_RADIUS_METERS,
};
