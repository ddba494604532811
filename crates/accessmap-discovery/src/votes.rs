//! Vote tallies to percentages and a dominant sentiment.
//!
//! Percentages round half-up independently, so the three values may sum to
//! 99 or 101 (e.g. 1/1/1 gives 33/33/33). That is expected.

use accessmap_core::models::FeatureVotes;
use serde::{Deserialize, Serialize};

/// Which subset of votes to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteScope {
    #[default]
    All,
    RecentOnly,
}

/// Prevailing opinion in a tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Like,
    Dislike,
    Uncertain,
    /// No votes in scope
    None,
}

/// Aggregated view of a vote tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub like_pct: u8,
    pub dislike_pct: u8,
    pub uncertain_pct: u8,
    pub dominant: Sentiment,
    pub total_votes: u64,
}

impl VoteSummary {
    pub fn empty() -> Self {
        Self {
            like_pct: 0,
            dislike_pct: 0,
            uncertain_pct: 0,
            dominant: Sentiment::None,
            total_votes: 0,
        }
    }
}

/// Stateless vote aggregation
pub struct VoteAggregator;

impl VoteAggregator {
    /// Aggregate a tally over the requested scope
    ///
    /// Recency is taken from the pre-tagged `recent_*` counts; nothing here
    /// looks at timestamps.
    pub fn aggregate(votes: &FeatureVotes, scope: VoteScope) -> VoteSummary {
        let (like, dislike, uncertain) = match scope {
            VoteScope::All => (votes.like, votes.dislike, votes.uncertain),
            VoteScope::RecentOnly => {
                (votes.recent_like, votes.recent_dislike, votes.recent_uncertain)
            }
        };

        let (like, dislike, uncertain) = (like as u64, dislike as u64, uncertain as u64);
        let total = like + dislike + uncertain;
        if total == 0 {
            return VoteSummary::empty();
        }

        VoteSummary {
            like_pct: percent(like, total),
            dislike_pct: percent(dislike, total),
            uncertain_pct: percent(uncertain, total),
            dominant: dominant(like, dislike, uncertain),
            total_votes: total,
        }
    }
}

/// `count / total` as a percentage rounded half-up, in integer arithmetic
fn percent(count: u64, total: u64) -> u8 {
    // floor(100 * count / total + 1/2) == floor((200 * count + total) / (2 * total))
    let pct = (200 * count + total) / (2 * total);
    pct.min(100) as u8
}

/// Largest count wins; ties resolve Like > Dislike > Uncertain
fn dominant(like: u64, dislike: u64, uncertain: u64) -> Sentiment {
    if like >= dislike && like >= uncertain {
        Sentiment::Like
    } else if dislike >= uncertain {
        Sentiment::Dislike
    } else {
        Sentiment::Uncertain
    }
}
