mod request;
mod response;

pub use request::{
    AggregateVotesRequest, AppendSampleRequest, SearchRequest, StartSessionRequest,
    TallyVotesRequest,
};
pub use response::{
    ActiveSessionResponse, HealthResponse, RouteResponse, StartSessionResponse,
    TallyVotesResponse,
};
