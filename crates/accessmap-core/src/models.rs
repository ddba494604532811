pub mod coordinate;
pub mod location;
pub mod session;

pub use coordinate::Coordinate;
pub use location::{
    AccessibleLocation, FeatureVotes, LocationId, SearchResult, VoteKind, VoteRecord,
};
pub use session::{
    OwnerId, PathSample, PausedInterval, RouteSummary, SessionId, SessionSnapshot, SessionState,
};
