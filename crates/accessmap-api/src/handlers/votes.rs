use std::sync::Arc;

use accessmap_core::models::FeatureVotes;
use axum::{extract::State, Json};

use accessmap_discovery::{FeatureReport, VoteAggregator, VoteSummary};

use crate::dto::{AggregateVotesRequest, TallyVotesRequest, TallyVotesResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn aggregate_votes(
    Json(request): Json<AggregateVotesRequest>,
) -> Result<Json<VoteSummary>, ApiError> {
    request.votes.validate()?;
    Ok(Json(VoteAggregator::aggregate(&request.votes, request.scope)))
}

/// Tag raw votes as recent using the configured window, then aggregate both scopes
pub async fn tally_votes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TallyVotesRequest>,
) -> Json<TallyVotesResponse> {
    let votes = FeatureVotes::tally(&request.votes, state.clock.now(), state.config.recency_window());

    tracing::debug!(
        votes = request.votes.len(),
        recent = u64::from(votes.recent_like)
            + u64::from(votes.recent_dislike)
            + u64::from(votes.recent_uncertain),
        "Tallied raw votes"
    );

    Json(TallyVotesResponse {
        votes,
        recency_window_hours: state.config.recency_window_hours.value,
        summary: FeatureReport::from_votes(&votes),
    })
}
