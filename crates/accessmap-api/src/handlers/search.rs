use std::sync::Arc;

use axum::{extract::State, Json};
use geojson::FeatureCollection;

use crate::dto::SearchRequest;
use crate::error::ApiError;
use crate::services::SearchService;
use crate::state::AppState;

pub async fn handle_search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    tracing::info!(
        latitude = request.latitude,
        longitude = request.longitude,
        radius_meters = request.radius_meters,
        catalog_size = request.catalog.len(),
        "Processing nearby search"
    );

    let result = SearchService::execute(&state, &request)?;

    Ok(Json(result))
}
