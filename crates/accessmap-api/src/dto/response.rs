use accessmap_core::models::{FeatureVotes, OwnerId, RouteSummary, SessionId};
use accessmap_discovery::FeatureReport;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub active_sessions: usize,
}

impl HealthResponse {
    pub fn ok(active_sessions: usize) -> Self {
        Self { status: "ok", service: "accessmap-api", active_sessions }
    }
}

/// Response to a successful start
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: SessionId,
    pub owner_id: OwnerId,
}

/// The owner's live session, if any
#[derive(Debug, Serialize)]
pub struct ActiveSessionResponse {
    pub owner_id: OwnerId,
    pub session_id: Option<SessionId>,
}

/// Stopped route: the summary plus its path as a GeoJSON LineString feature
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    pub summary: RouteSummary,
    pub route: geojson::Feature,
}

/// Counts derived from raw votes and their summaries
#[derive(Debug, Serialize)]
pub struct TallyVotesResponse {
    pub votes: FeatureVotes,
    pub recency_window_hours: u64,
    #[serde(flatten)]
    pub summary: FeatureReport,
}
