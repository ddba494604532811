use accessmap_core::error::{AccessMapError, Result};
use accessmap_core::models::Coordinate;
use geo::{Distance, HaversineMeasure, LineString, Point};

/// Mean Earth radius used for all great-circle calculations
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_METERS);

/// Largest possible great-circle distance
const HALF_CIRCUMFERENCE_METERS: f64 = std::f64::consts::PI * EARTH_RADIUS_METERS;

/// Convert a coordinate to a `geo` point (x = longitude, y = latitude)
pub fn to_point(coordinate: &Coordinate) -> Point {
    Point::new(coordinate.longitude(), coordinate.latitude())
}

/// Great-circle distance between two coordinates in meters (haversine)
///
/// Near antipodal points rounding can push the haversine term past 1 and the
/// result to NaN; `f64::min` maps that to half the circumference.
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    point_distance(to_point(a), to_point(b))
}

fn point_distance(a: Point, b: Point) -> f64 {
    EARTH.distance(a, b).min(HALF_CIRCUMFERENCE_METERS)
}

/// Reject radii that are non-positive or not finite
pub fn validate_radius(radius_meters: f64) -> Result<f64> {
    if radius_meters.is_nan() || radius_meters <= 0.0 {
        return Err(AccessMapError::InvalidRadius {
            radius: radius_meters,
            reason: "radius must be greater than zero".to_string(),
        });
    }
    if radius_meters.is_infinite() {
        return Err(AccessMapError::InvalidRadius {
            radius: radius_meters,
            reason: "radius must be finite".to_string(),
        });
    }
    Ok(radius_meters)
}

/// Whether `point` lies within `radius_meters` of `center` (inclusive)
pub fn within_radius(center: &Coordinate, point: &Coordinate, radius_meters: f64) -> Result<bool> {
    let radius = validate_radius(radius_meters)?;
    Ok(distance(center, point) <= radius)
}

/// Sum of distances over consecutive coordinates; zero for fewer than two
pub fn path_length<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> f64 {
    let path: LineString = coordinates.into_iter().map(to_point).collect();
    path.lines()
        .map(|segment| point_distance(segment.start_point(), segment.end_point()))
        .sum()
}
