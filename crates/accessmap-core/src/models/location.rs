//! Location catalog and community vote types.
//!
//! The catalog is owned by an external collaborator; the engine only reads
//! coordinates and vote tallies from snapshots passed in per call.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use crate::error::{AccessMapError, Result};

/// Catalog identifier for a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point of interest with community accessibility votes per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibleLocation {
    pub id: LocationId,
    pub coordinate: Coordinate,
    pub name: String,
    pub category: String,
    /// Feature key (e.g. "ramp", "toilet", "elevator") to vote tally
    #[serde(default)]
    pub features: BTreeMap<String, FeatureVotes>,
}

impl AccessibleLocation {
    pub fn new(
        id: LocationId,
        coordinate: Coordinate,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            coordinate,
            name: name.into(),
            category: category.into(),
            features: BTreeMap::new(),
        }
    }

    /// Attach a vote tally for a feature
    pub fn with_feature(mut self, key: impl Into<String>, votes: FeatureVotes) -> Self {
        self.features.insert(key.into(), votes);
        self
    }

    /// Validate every feature tally, naming the first offending feature
    pub fn validate_votes(&self) -> Result<()> {
        for (key, votes) in &self.features {
            votes.validate().map_err(|e| match e {
                AccessMapError::InvalidVotes { reason } => AccessMapError::InvalidVotes {
                    reason: format!("location {} feature '{}': {}", self.id, key, reason),
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Kind of accessibility vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Like,
    Dislike,
    Uncertain,
}

/// A single timestamped vote as held by vote storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub kind: VoteKind,
    pub cast_at: DateTime<Utc>,
}

/// Vote counts for one feature of one location
///
/// `recent_*` counts are supplied pre-tagged by vote storage and must never
/// exceed the corresponding overall count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureVotes {
    #[serde(default)]
    pub like: u32,
    #[serde(default)]
    pub dislike: u32,
    #[serde(default)]
    pub uncertain: u32,
    #[serde(default)]
    pub recent_like: u32,
    #[serde(default)]
    pub recent_dislike: u32,
    #[serde(default)]
    pub recent_uncertain: u32,
}

impl FeatureVotes {
    /// Create a tally with no recent votes
    pub fn new(like: u32, dislike: u32, uncertain: u32) -> Self {
        Self { like, dislike, uncertain, ..Default::default() }
    }

    /// Set the recent subset of each count
    pub fn with_recent(mut self, like: u32, dislike: u32, uncertain: u32) -> Self {
        self.recent_like = like;
        self.recent_dislike = dislike;
        self.recent_uncertain = uncertain;
        self
    }

    /// Build a tally from raw votes, tagging those cast within `window` of `now` as recent
    pub fn tally<'a>(
        votes: impl IntoIterator<Item = &'a VoteRecord>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let mut tally = Self::default();

        for vote in votes {
            let recent = now.signed_duration_since(vote.cast_at) <= window;
            let (total, recent_total) = match vote.kind {
                VoteKind::Like => (&mut tally.like, &mut tally.recent_like),
                VoteKind::Dislike => (&mut tally.dislike, &mut tally.recent_dislike),
                VoteKind::Uncertain => (&mut tally.uncertain, &mut tally.recent_uncertain),
            };
            *total = total.saturating_add(1);
            if recent {
                *recent_total = recent_total.saturating_add(1);
            }
        }

        tally
    }

    /// Check that every recent count is a subset of its overall count
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("like", self.recent_like, self.like),
            ("dislike", self.recent_dislike, self.dislike),
            ("uncertain", self.recent_uncertain, self.uncertain),
        ];

        for (kind, recent, total) in checks {
            if recent > total {
                return Err(AccessMapError::InvalidVotes {
                    reason: format!("recent {} count {} exceeds total {}", kind, recent, total),
                });
            }
        }

        Ok(())
    }

    /// Element-wise sum, saturating at `u32::MAX`
    pub fn combine(&self, other: &FeatureVotes) -> FeatureVotes {
        FeatureVotes {
            like: self.like.saturating_add(other.like),
            dislike: self.dislike.saturating_add(other.dislike),
            uncertain: self.uncertain.saturating_add(other.uncertain),
            recent_like: self.recent_like.saturating_add(other.recent_like),
            recent_dislike: self.recent_dislike.saturating_add(other.recent_dislike),
            recent_uncertain: self.recent_uncertain.saturating_add(other.recent_uncertain),
        }
    }
}

/// A catalog entry ranked by distance from a query position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub location: AccessibleLocation,
    pub distance_meters: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_recent_subset() {
        assert!(FeatureVotes::new(3, 1, 0).with_recent(2, 1, 0).validate().is_ok());

        let err = FeatureVotes::new(3, 1, 0).with_recent(0, 2, 0).validate().unwrap_err();
        assert!(err.to_string().contains("dislike"));
    }

    #[test]
    fn test_tally_tags_recent_votes() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let votes = vec![
            VoteRecord { kind: VoteKind::Like, cast_at: now - Duration::hours(1) },
            VoteRecord { kind: VoteKind::Like, cast_at: now - Duration::hours(30) },
            VoteRecord { kind: VoteKind::Dislike, cast_at: now - Duration::hours(24) },
            VoteRecord { kind: VoteKind::Uncertain, cast_at: now - Duration::days(7) },
        ];

        let tally = FeatureVotes::tally(&votes, now, Duration::hours(24));

        assert_eq!(tally, FeatureVotes::new(2, 1, 1).with_recent(1, 1, 0));
        assert!(tally.validate().is_ok());
    }

    #[test]
    fn test_location_votes_name_offending_feature() {
        let location = AccessibleLocation::new(
            LocationId(12),
            Coordinate::new(13.75, 100.5).unwrap(),
            "Market",
            "shop",
        )
        .with_feature("ramp", FeatureVotes::new(2, 0, 0))
        .with_feature("toilet", FeatureVotes::new(1, 0, 0).with_recent(0, 9, 0));

        let err = location.validate_votes().unwrap_err();
        assert!(matches!(err, AccessMapError::InvalidVotes { .. }));
        assert!(err.to_string().contains("location 12 feature 'toilet'"));

        let clean = location.with_feature("toilet", FeatureVotes::new(1, 0, 0));
        assert!(clean.validate_votes().is_ok());
    }

    #[test]
    fn test_combine() {
        let a = FeatureVotes::new(1, 2, 3).with_recent(1, 0, 0);
        let b = FeatureVotes::new(4, 0, 1).with_recent(0, 0, 1);
        assert_eq!(a.combine(&b), FeatureVotes::new(5, 2, 4).with_recent(1, 0, 1));
    }

    #[test]
    fn test_location_deserialization_defaults_features() {
        let json = r#"{
            "id": 7,
            "coordinate": {"latitude": 13.7563, "longitude": 100.5018},
            "name": "Central Library",
            "category": "library"
        }"#;

        let location: AccessibleLocation = serde_json::from_str(json).unwrap();
        assert_eq!(location.id, LocationId(7));
        assert!(location.features.is_empty());
    }
}
