mod health;
mod search;
mod sessions;
mod votes;

pub use health::health_check;
pub use search::handle_search;
pub use sessions::{
    append_sample, discard_session, get_active_session, get_session, pause_session,
    resume_session, start_session, stop_session,
};
pub use votes::{aggregate_votes, tally_votes};
