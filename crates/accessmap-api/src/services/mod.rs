mod export;
mod search;

pub use export::{location_feature, route_feature};
pub use search::SearchService;
