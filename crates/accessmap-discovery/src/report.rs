//! Per-location accessibility detail for search results.

use std::collections::BTreeMap;

use accessmap_core::error::Result;
use accessmap_core::models::{AccessibleLocation, FeatureVotes, SearchResult};
use serde::Serialize;

use crate::votes::{VoteAggregator, VoteScope, VoteSummary};

/// All-time and recent summaries for one feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureReport {
    pub all: VoteSummary,
    pub recent: VoteSummary,
}

impl FeatureReport {
    pub fn from_votes(votes: &FeatureVotes) -> Self {
        Self {
            all: VoteAggregator::aggregate(votes, VoteScope::All),
            recent: VoteAggregator::aggregate(votes, VoteScope::RecentOnly),
        }
    }
}

/// A ranked location together with its aggregated accessibility votes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReport {
    pub location: AccessibleLocation,
    pub distance_meters: Option<f64>,
    pub features: BTreeMap<String, FeatureReport>,
    /// Summary over the sum of every feature's votes
    pub overall: FeatureReport,
}

impl LocationReport {
    /// Build a report for a location outside of a search
    ///
    /// Fails with `InvalidVotes` if any tally has more recent votes than total.
    pub fn for_location(location: AccessibleLocation) -> Result<Self> {
        location.validate_votes()?;

        let features = location
            .features
            .iter()
            .map(|(key, votes)| (key.clone(), FeatureReport::from_votes(votes)))
            .collect();

        let combined = location
            .features
            .values()
            .fold(FeatureVotes::default(), |acc, votes| acc.combine(votes));

        Ok(Self {
            location,
            distance_meters: None,
            features,
            overall: FeatureReport::from_votes(&combined),
        })
    }

    /// Build a report for a search hit, keeping its distance
    pub fn from_result(result: SearchResult) -> Result<Self> {
        let mut report = Self::for_location(result.location)?;
        report.distance_meters = Some(result.distance_meters);
        Ok(report)
    }
}
