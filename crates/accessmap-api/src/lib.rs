//! AccessMap API - HTTP wrapper over the recording and discovery engine
//!
//! Handlers translate JSON requests into engine calls; all state lives in the
//! [`SessionRegistry`](accessmap_recording::SessionRegistry) held by [`AppState`].

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use router::create_router;
pub use state::AppState;
