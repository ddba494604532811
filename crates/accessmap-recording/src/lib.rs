//! AccessMap Recording - Live route capture sessions
//!
//! [`RecordingSession`] is the per-recording state machine; [`SessionRegistry`]
//! owns all live sessions, enforces one active session per owner, serializes
//! mutations per session, and expires abandoned recordings.

pub mod registry;
pub mod session;
pub mod sweep;

pub use registry::{ExpiredSession, SessionRegistry};
pub use session::RecordingSession;
pub use sweep::{spawn_expiry_sweep, SweepHandle};
