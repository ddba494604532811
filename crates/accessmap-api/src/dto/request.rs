use accessmap_core::models::{AccessibleLocation, FeatureVotes, VoteRecord};
use accessmap_discovery::VoteScope;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Start recording request body
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub owner_id: String,
}

/// GPS sample request body
///
/// Coordinates arrive unvalidated so that range errors surface as
/// `InvalidCoordinate` rather than a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct AppendSampleRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

/// Nearby search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Catalog snapshot to search, supplied by the caller
    pub catalog: Vec<AccessibleLocation>,
}

/// Vote aggregation request body
#[derive(Debug, Deserialize)]
pub struct AggregateVotesRequest {
    pub votes: FeatureVotes,
    #[serde(default)]
    pub scope: VoteScope,
}

/// Raw timestamped votes for one feature
#[derive(Debug, Deserialize)]
pub struct TallyVotesRequest {
    pub votes: Vec<VoteRecord>,
}
