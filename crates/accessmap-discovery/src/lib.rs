//! AccessMap Discovery - Nearby search and accessibility vote aggregation
//!
//! Both operations are pure functions of the catalog snapshot passed in, so
//! they can run concurrently across requests without locking.

pub mod report;
pub mod search;
pub mod votes;

pub use report::{FeatureReport, LocationReport};
pub use search::{NearbyQuery, NearbySearchEngine};
pub use votes::{Sentiment, VoteAggregator, VoteScope, VoteSummary};
