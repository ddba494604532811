use std::cmp::Ordering;

use accessmap_core::config::{LayeredConfig, DEFAULT_MAX_SEARCH_RADIUS_METERS};
use accessmap_core::error::{AccessMapError, Result};
use accessmap_core::models::{AccessibleLocation, Coordinate, SearchResult};
use accessmap_geo::{distance, validate_radius, BoundingBox};
use serde::{Deserialize, Serialize};

/// Parameters of a nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub center: Coordinate,
    pub radius_meters: f64,

    /// Only return locations in this category (case-insensitive)
    #[serde(default)]
    pub category: Option<String>,

    /// Maximum number of results, applied after ranking
    #[serde(default)]
    pub limit: Option<usize>,
}

impl NearbyQuery {
    /// Create a new query around a center point
    pub fn new(center: Coordinate, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
            category: None,
            limit: None,
        }
    }

    /// Restrict results to a category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Cap the number of results
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches_category(&self, location: &AccessibleLocation) -> bool {
        match &self.category {
            Some(category) => location.category.eq_ignore_ascii_case(category),
            None => true,
        }
    }
}

/// Ranks catalog locations by geodesic distance from a query point
///
/// Linear scan over the snapshot with a bounding-box pre-filter. Catalogs are
/// in the hundreds of entries; a spatial index is not used.
#[derive(Debug, Clone)]
pub struct NearbySearchEngine {
    max_radius_meters: f64,
}

impl Default for NearbySearchEngine {
    fn default() -> Self {
        Self { max_radius_meters: DEFAULT_MAX_SEARCH_RADIUS_METERS }
    }
}

impl NearbySearchEngine {
    pub fn new(max_radius_meters: f64) -> Self {
        Self { max_radius_meters }
    }

    pub fn from_config(config: &LayeredConfig) -> Self {
        Self::new(config.max_search_radius_meters.value)
    }

    /// Locations within `radius_meters` of `center`, nearest first
    ///
    /// Equal distances are ordered by ascending location id. An empty result
    /// is a normal outcome. Any positive finite radius is accepted; the
    /// configured maximum applies only to [`execute`](Self::execute).
    pub fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        catalog: &[AccessibleLocation],
    ) -> Result<Vec<SearchResult>> {
        let query = NearbyQuery::new(center, radius_meters);
        let radius = validate_radius(query.radius_meters)?;
        Ok(self.scan(&query, radius, catalog))
    }

    /// Run a caller-built query with optional category filter and limit
    ///
    /// Radii above the engine's maximum are rejected.
    pub fn execute(
        &self,
        query: &NearbyQuery,
        catalog: &[AccessibleLocation],
    ) -> Result<Vec<SearchResult>> {
        let radius = validate_radius(query.radius_meters)?;
        if radius > self.max_radius_meters {
            return Err(AccessMapError::InvalidRadius {
                radius,
                reason: format!("radius exceeds the maximum of {} meters", self.max_radius_meters),
            });
        }

        Ok(self.scan(query, radius, catalog))
    }

    fn scan(
        &self,
        query: &NearbyQuery,
        radius: f64,
        catalog: &[AccessibleLocation],
    ) -> Vec<SearchResult> {
        let bbox = BoundingBox::around(&query.center, radius);

        let mut results: Vec<SearchResult> = catalog
            .iter()
            .filter(|location| query.matches_category(location))
            .filter(|location| bbox.contains(&location.coordinate))
            .filter_map(|location| {
                let distance_meters = distance(&query.center, &location.coordinate);
                (distance_meters <= radius).then(|| SearchResult {
                    location: location.clone(),
                    distance_meters,
                })
            })
            .collect();

        results.sort_by(rank);

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        tracing::debug!(
            catalog_size = catalog.len(),
            matched = results.len(),
            radius_meters = radius,
            split_at_antimeridian = bbox.crosses_antimeridian(),
            "Nearby search complete"
        );

        results
    }
}

/// Nearest first, then ascending id
///
/// Distances tie only when bit-for-bit equal. Both come out of the same
/// haversine evaluation, so identical coordinates always tie.
fn rank(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.distance_meters
        .total_cmp(&b.distance_meters)
        .then_with(|| a.location.id.cmp(&b.location.id))
}
