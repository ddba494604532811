use std::sync::Arc;

use accessmap_core::models::{Coordinate, OwnerId, SessionId, SessionSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::{
    ActiveSessionResponse, AppendSampleRequest, RouteResponse, StartSessionRequest,
    StartSessionResponse,
};
use crate::error::ApiError;
use crate::services::route_feature;
use crate::state::AppState;

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), ApiError> {
    if request.owner_id.trim().is_empty() {
        return Err(ApiError::bad_request("owner_id must not be empty"));
    }

    let owner_id = OwnerId::new(request.owner_id);
    let session_id = state.registry.start(owner_id.clone())?;

    Ok((StatusCode::CREATED, Json(StartSessionResponse { session_id, owner_id })))
}

pub async fn get_active_session(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> Json<ActiveSessionResponse> {
    let owner_id = OwnerId::new(owner_id);
    let session_id = state.registry.get_active_session(&owner_id);
    Json(ActiveSessionResponse { owner_id, session_id })
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.registry.snapshot(SessionId(session_id))?))
}

pub async fn append_sample(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AppendSampleRequest>,
) -> Result<StatusCode, ApiError> {
    let coordinate = Coordinate::new(request.latitude, request.longitude)?;
    state
        .registry
        .append_sample(SessionId(session_id), coordinate, request.captured_at)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pause_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session_id = SessionId(session_id);
    state.registry.pause(session_id)?;
    Ok(Json(state.registry.snapshot(session_id)?))
}

pub async fn resume_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session_id = SessionId(session_id);
    state.registry.resume(session_id)?;
    Ok(Json(state.registry.snapshot(session_id)?))
}

pub async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RouteResponse>, ApiError> {
    let summary = state.registry.stop(SessionId(session_id))?;
    let route = route_feature(&summary);
    Ok(Json(RouteResponse { summary, route }))
}

pub async fn discard_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.registry.discard(SessionId(session_id))?;
    Ok(StatusCode::NO_CONTENT)
}
