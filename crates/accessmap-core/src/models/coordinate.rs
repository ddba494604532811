//! WGS 84 coordinate type validated on construction.

use serde::{Deserialize, Serialize};

use crate::error::{AccessMapError, Result};

/// Latitude/longitude pair in decimal degrees (WGS 84)
///
/// Fields are private: every `Coordinate` in the system has passed range
/// validation, so downstream math never sees NaN or out-of-range input.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// Create a coordinate, rejecting NaN, infinite, or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let reason = if !latitude.is_finite() || !longitude.is_finite() {
            Some("coordinates must be finite numbers")
        } else if !(-Self::MAX_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude) {
            Some("latitude must be within [-90, 90]")
        } else if !(-Self::MAX_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AccessMapError::InvalidCoordinate {
                latitude,
                longitude,
                reason: reason.to_string(),
            }),
            None => Ok(Self { latitude, longitude }),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Unvalidated wire form of a coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = AccessMapError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }
}
