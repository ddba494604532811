use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coordinate::Coordinate;

/// Unique identifier of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user who owns a recording
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Paused,
    Stopped,
    Discarded,
}

impl SessionState {
    /// Stopped and Discarded admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped | SessionState::Discarded)
    }

    /// Recording or Paused; counts against the one-session-per-owner limit
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Recording | SessionState::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Paused => "paused",
            SessionState::Stopped => "stopped",
            SessionState::Discarded => "discarded",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One GPS fix captured during a recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    pub coordinate: Coordinate,
    pub captured_at: DateTime<Utc>,
}

impl PathSample {
    pub fn new(coordinate: Coordinate, captured_at: DateTime<Utc>) -> Self {
        Self { coordinate, captured_at }
    }
}

/// A pause in recording; `resume_end` is `None` while the session is still paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PausedInterval {
    pub pause_start: DateTime<Utc>,
    pub resume_end: Option<DateTime<Utc>>,
}

/// Immutable result of a stopped recording, handed to the caller for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub session_id: SessionId,
    pub owner_id: OwnerId,
    pub path: Vec<PathSample>,
    pub total_distance_meters: f64,
    pub active_duration_seconds: f64,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

/// Point-in-time view of a live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub owner_id: OwnerId,
    pub state: SessionState,
    pub sample_count: usize,
    pub distance_meters: f64,
    pub active_duration_seconds: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub last_activity: DateTime<Utc>,
}
