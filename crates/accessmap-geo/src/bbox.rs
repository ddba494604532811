//! Conservative bounding-box pre-filter for radius queries.
//!
//! A box built by [`BoundingBox::around`] never excludes a point whose
//! haversine distance from the center is within the radius. It may include
//! points outside the radius; callers confirm with [`crate::distance`].

use accessmap_core::models::Coordinate;
use geo::{coord, Rect};

use crate::distance::EARTH_RADIUS_METERS;

/// Slack added to every edge to absorb floating-point error, in degrees (~1cm)
const EDGE_MARGIN_DEGREES: f64 = 1e-7;

/// One or two lat/lon rectangles covering a search circle
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    rects: Vec<Rect>,
}

impl BoundingBox {
    /// The whole globe
    pub fn world() -> Self {
        Self { rects: vec![rect(-90.0, 90.0, -180.0, 180.0)] }
    }

    /// Bounding box of the circle of `radius_meters` around `center`
    ///
    /// Widens to all longitudes when a pole lies inside the circle, and splits
    /// into two rectangles when the circle crosses the antimeridian.
    pub fn around(center: &Coordinate, radius_meters: f64) -> Self {
        let angular = radius_meters / EARTH_RADIUS_METERS;
        if !angular.is_finite() || angular >= std::f64::consts::PI {
            return Self::world();
        }

        let lat = center.latitude();
        let lon = center.longitude();
        let delta_lat = angular.to_degrees() + EDGE_MARGIN_DEGREES;
        let min_lat = lat - delta_lat;
        let max_lat = lat + delta_lat;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                rects: vec![rect(min_lat.max(-90.0), max_lat.min(90.0), -180.0, 180.0)],
            };
        }

        let ratio = angular.sin() / lat.to_radians().cos();
        if ratio >= 1.0 {
            return Self { rects: vec![rect(min_lat, max_lat, -180.0, 180.0)] };
        }

        let delta_lon = ratio.asin().to_degrees() + EDGE_MARGIN_DEGREES;
        let min_lon = lon - delta_lon;
        let max_lon = lon + delta_lon;

        let rects = if min_lon < -180.0 {
            vec![
                rect(min_lat, max_lat, min_lon + 360.0, 180.0),
                rect(min_lat, max_lat, -180.0, max_lon),
            ]
        } else if max_lon > 180.0 {
            vec![
                rect(min_lat, max_lat, min_lon, 180.0),
                rect(min_lat, max_lat, -180.0, max_lon - 360.0),
            ]
        } else {
            vec![rect(min_lat, max_lat, min_lon, max_lon)]
        };

        Self { rects }
    }

    /// Whether the coordinate falls inside any rectangle (edges inclusive)
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let (x, y) = (coordinate.longitude(), coordinate.latitude());
        self.rects.iter().any(|r| {
            r.min().x <= x && x <= r.max().x && r.min().y <= y && y <= r.max().y
        })
    }

    /// Whether the box was split across the antimeridian
    pub fn crosses_antimeridian(&self) -> bool {
        self.rects.len() > 1
    }
}

fn rect(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Rect {
    Rect::new(coord! { x: min_lon, y: min_lat }, coord! { x: max_lon, y: max_lat })
}
