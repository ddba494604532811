//! Error types for AccessMap

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{OwnerId, SessionId};

#[derive(Debug, Error)]
pub enum AccessMapError {
    // Input validation errors
    #[error("Invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("Invalid radius {radius}: {reason}")]
    InvalidRadius { radius: f64, reason: String },

    #[error("Invalid vote tally: {reason}")]
    InvalidVotes { reason: String },

    // Recording session errors
    #[error("Cannot {operation} session {session_id} while it is {state}")]
    InvalidState {
        session_id: SessionId,
        state: String,
        operation: String,
    },

    #[error("Sample captured at {attempted} precedes the previous sample at {previous}")]
    OutOfOrderSample {
        previous: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    #[error("Owner {owner_id} already has an active session {session_id}")]
    SessionAlreadyActive {
        owner_id: OwnerId,
        session_id: SessionId,
    },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: SessionId },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccessMapError>;
