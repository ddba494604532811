use accessmap_core::models::Coordinate;
use accessmap_discovery::{LocationReport, NearbyQuery};
use geojson::FeatureCollection;

use crate::dto::SearchRequest;
use crate::error::ApiError;
use crate::services::location_feature;
use crate::state::AppState;

/// Service for executing nearby searches
pub struct SearchService;

impl SearchService {
    /// Execute a search and return a GeoJSON FeatureCollection, nearest first
    ///
    /// The whole catalog's vote tallies are checked before ranking, so a bad
    /// entry is reported even when it lies outside the radius.
    pub fn execute(state: &AppState, request: &SearchRequest) -> Result<FeatureCollection, ApiError> {
        let center = Coordinate::new(request.latitude, request.longitude)?;

        let mut query = NearbyQuery::new(center, request.radius_meters);
        if let Some(category) = &request.category {
            query = query.with_category(category.clone());
        }
        if let Some(limit) = request.limit {
            query = query.with_limit(limit);
        }

        for location in &request.catalog {
            location.validate_votes()?;
        }

        let features = state
            .search_engine
            .execute(&query, &request.catalog)?
            .into_iter()
            .map(|result| LocationReport::from_result(result).map(|report| location_feature(&report)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }
}
