//! Registry of live recording sessions.
//!
//! Lock order is always: session mutex, then `owners`, then `sessions`.
//! `start` takes only `owners` then `sessions`, so it never waits on a
//! session mutex. A session reaching a terminal state is removed from both
//! maps before its mutex is released; a later call with its id sees
//! `SessionNotFound`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use accessmap_core::clock::Clock;
use accessmap_core::config::LayeredConfig;
use accessmap_core::error::{AccessMapError, Result};
use accessmap_core::models::{
    Coordinate, OwnerId, PathSample, RouteSummary, SessionId, SessionSnapshot,
};
use chrono::{DateTime, Utc};

use crate::session::RecordingSession;

type SessionEntry = Arc<Mutex<RecordingSession>>;

/// A session force-discarded by the idle sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredSession {
    pub session_id: SessionId,
    pub owner_id: OwnerId,
    pub idle_for: chrono::Duration,
}

/// Owns every live recording session
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    owners: Mutex<HashMap<OwnerId, SessionId>>,
    clock: Arc<dyn Clock>,
    idle_timeout: chrono::Duration,
}

impl SessionRegistry {
    /// Create a registry reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            owners: Mutex::new(HashMap::new()),
            clock,
            idle_timeout: chrono::Duration::from_std(idle_timeout)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn from_config(config: &LayeredConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, config.session_idle_timeout())
    }

    pub fn idle_timeout(&self) -> chrono::Duration {
        self.idle_timeout
    }

    /// Start recording for `owner_id`
    ///
    /// The owner check and the insert happen under one lock, so concurrent
    /// starts for the same owner yield exactly one success.
    pub fn start(&self, owner_id: OwnerId) -> Result<SessionId> {
        let mut owners = self.lock_owners();

        if let Some(existing) = owners.get(&owner_id) {
            return Err(AccessMapError::SessionAlreadyActive {
                owner_id,
                session_id: *existing,
            });
        }

        let now = self.clock.now();
        let session_id = SessionId::new();
        let mut session = RecordingSession::new(session_id, owner_id.clone(), now);
        session.begin(now)?;

        self.write_sessions().insert(session_id, Arc::new(Mutex::new(session)));
        owners.insert(owner_id.clone(), session_id);

        tracing::info!(session_id = %session_id, owner_id = %owner_id, "Recording started");
        Ok(session_id)
    }

    /// The owner's live session, if any
    pub fn get_active_session(&self, owner_id: &OwnerId) -> Option<SessionId> {
        self.lock_owners().get(owner_id).copied()
    }

    /// Append a GPS fix to a recording session
    pub fn append_sample(
        &self,
        session_id: SessionId,
        coordinate: Coordinate,
        captured_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_session(session_id, |session, now| {
            session.append_sample(PathSample::new(coordinate, captured_at), now)?;
            tracing::debug!(
                session_id = %session_id,
                samples = session.samples().len(),
                "Sample appended"
            );
            Ok(())
        })
    }

    pub fn pause(&self, session_id: SessionId) -> Result<()> {
        self.with_session(session_id, |session, now| {
            session.pause(now)?;
            tracing::debug!(session_id = %session_id, "Recording paused");
            Ok(())
        })
    }

    pub fn resume(&self, session_id: SessionId) -> Result<()> {
        self.with_session(session_id, |session, now| {
            session.resume(now)?;
            tracing::debug!(session_id = %session_id, "Recording resumed");
            Ok(())
        })
    }

    /// Stop a recording and hand back its summary; the session is removed
    pub fn stop(&self, session_id: SessionId) -> Result<RouteSummary> {
        self.with_session(session_id, |session, now| {
            let summary = session.stop(now)?;
            tracing::info!(
                session_id = %session_id,
                owner_id = %summary.owner_id,
                samples = summary.path.len(),
                distance_meters = summary.total_distance_meters,
                active_seconds = summary.active_duration_seconds,
                "Recording stopped"
            );
            Ok(summary)
        })
    }

    /// Drop a recording without a summary
    pub fn discard(&self, session_id: SessionId) -> Result<()> {
        self.with_session(session_id, |session, now| {
            session.discard(now)?;
            tracing::info!(
                session_id = %session_id,
                owner_id = %session.owner_id(),
                "Recording discarded"
            );
            Ok(())
        })
    }

    /// Current view of a live session
    pub fn snapshot(&self, session_id: SessionId) -> Result<SessionSnapshot> {
        self.with_session(session_id, |session, now| Ok(session.snapshot(now)))
    }

    /// Number of live sessions
    pub fn active_count(&self) -> usize {
        self.read_sessions().len()
    }

    /// Force-discard every session idle for longer than the timeout
    pub fn sweep_expired(&self) -> Vec<ExpiredSession> {
        let entries: Vec<(SessionId, SessionEntry)> = self
            .read_sessions()
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(entry)))
            .collect();

        let mut expired = Vec::new();

        for (session_id, entry) in entries {
            let mut session = lock_session(&entry);
            if session.state().is_terminal() {
                continue;
            }

            let now = self.clock.now();
            let idle_for = session.idle_for(now);
            if idle_for <= self.idle_timeout {
                continue;
            }

            if session.discard(now).is_ok() {
                let owner_id = session.owner_id().clone();
                self.remove(session_id, &owner_id);

                tracing::info!(
                    session_id = %session_id,
                    owner_id = %owner_id,
                    idle_secs = idle_for.num_seconds(),
                    "Idle recording expired"
                );
                expired.push(ExpiredSession { session_id, owner_id, idle_for });
            }
        }

        expired
    }

    /// Run `op` under the session's mutex, removing the session if it ends terminal
    fn with_session<T>(
        &self,
        session_id: SessionId,
        op: impl FnOnce(&mut RecordingSession, DateTime<Utc>) -> Result<T>,
    ) -> Result<T> {
        let entry = self
            .read_sessions()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AccessMapError::SessionNotFound { session_id })?;

        let mut session = lock_session(&entry);

        // Lost a race with stop/discard/sweep between lookup and lock
        if session.state().is_terminal() {
            return Err(AccessMapError::SessionNotFound { session_id });
        }

        let result = op(&mut *session, self.clock.now());

        if session.state().is_terminal() {
            let owner_id = session.owner_id().clone();
            self.remove(session_id, &owner_id);
        }

        result
    }

    fn remove(&self, session_id: SessionId, owner_id: &OwnerId) {
        let mut owners = self.lock_owners();
        if owners.get(owner_id) == Some(&session_id) {
            owners.remove(owner_id);
        }
        self.write_sessions().remove(&session_id);
    }

    fn lock_owners(&self) -> MutexGuard<'_, HashMap<OwnerId, SessionId>> {
        self.owners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_sessions(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_session(entry: &SessionEntry) -> MutexGuard<'_, RecordingSession> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessmap_core::clock::ManualClock;
    use accessmap_core::models::SessionState;
    use chrono::TimeZone;

    const FOUR_HOURS: Duration = Duration::from_secs(4 * 60 * 60);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn registry() -> (Arc<ManualClock>, SessionRegistry) {
        let clock = Arc::new(ManualClock::new(t0()));
        let registry = SessionRegistry::new(clock.clone(), FOUR_HOURS);
        (clock, registry)
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_one_active_session_per_owner() {
        let (_, registry) = registry();
        let owner = OwnerId::new("u1");

        let first = registry.start(owner.clone()).unwrap();
        let err = registry.start(owner.clone()).unwrap_err();

        assert!(matches!(
            err,
            AccessMapError::SessionAlreadyActive { session_id, .. } if session_id == first
        ));
        assert_eq!(registry.get_active_session(&owner), Some(first));
    }

    #[test]
    fn test_owners_are_independent() {
        let (_, registry) = registry();
        let a = registry.start(OwnerId::new("a")).unwrap();
        let b = registry.start(OwnerId::new("b")).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn test_stop_frees_owner_slot() {
        let (_, registry) = registry();
        let owner = OwnerId::new("u1");

        let id = registry.start(owner.clone()).unwrap();
        registry.stop(id).unwrap();

        assert_eq!(registry.get_active_session(&owner), None);
        assert!(matches!(registry.snapshot(id), Err(AccessMapError::SessionNotFound { .. })));
        assert!(registry.start(owner).is_ok());
    }

    #[test]
    fn test_discard_removes_without_summary() {
        let (_, registry) = registry();
        let owner = OwnerId::new("u1");

        let id = registry.start(owner.clone()).unwrap();
        registry.append_sample(id, coord(1.0, 1.0), t0()).unwrap();
        registry.discard(id).unwrap();

        assert_eq!(registry.active_count(), 0);
        assert!(matches!(registry.stop(id), Err(AccessMapError::SessionNotFound { .. })));
        assert!(matches!(registry.discard(id), Err(AccessMapError::SessionNotFound { .. })));
    }

    #[test]
    fn test_unknown_session() {
        let (_, registry) = registry();
        let err = registry.pause(SessionId::new()).unwrap_err();
        assert!(matches!(err, AccessMapError::SessionNotFound { .. }));
    }

    #[test]
    fn test_pause_resume_duration() {
        let (clock, registry) = registry();
        let id = registry.start(OwnerId::new("u1")).unwrap();

        clock.advance(chrono::Duration::seconds(10));
        registry.pause(id).unwrap();
        clock.advance(chrono::Duration::seconds(5));
        registry.resume(id).unwrap();
        clock.advance(chrono::Duration::seconds(10));

        let summary = registry.stop(id).unwrap();
        assert!(
            (summary.active_duration_seconds - 20.0).abs() <= 0.1,
            "expected ~20s active, got {}",
            summary.active_duration_seconds
        );
    }

    #[test]
    fn test_pause_twice_is_invalid_state() {
        let (_, registry) = registry();
        let id = registry.start(OwnerId::new("u1")).unwrap();

        registry.pause(id).unwrap();
        let err = registry.pause(id).unwrap_err();
        assert!(matches!(err, AccessMapError::InvalidState { .. }));

        // Failed pause leaves the session paused and registered
        assert_eq!(registry.snapshot(id).unwrap().state, SessionState::Paused);
    }

    #[test]
    fn test_failed_operations_keep_session() {
        let (_, registry) = registry();
        let id = registry.start(OwnerId::new("u1")).unwrap();

        registry.append_sample(id, coord(1.0, 1.0), t0() + chrono::Duration::seconds(30)).unwrap();
        let err = registry.append_sample(id, coord(1.0, 1.1), t0()).unwrap_err();
        assert!(matches!(err, AccessMapError::OutOfOrderSample { .. }));

        let snapshot = registry.snapshot(id).unwrap();
        assert_eq!(snapshot.sample_count, 1);
        assert_eq!(snapshot.state, SessionState::Recording);
    }

    #[test]
    fn test_sweep_expires_idle_sessions() {
        let (clock, registry) = registry();
        let stale_owner = OwnerId::new("stale");
        let stale = registry.start(stale_owner.clone()).unwrap();

        clock.advance(chrono::Duration::hours(3));
        let fresh = registry.start(OwnerId::new("fresh")).unwrap();

        clock.advance(chrono::Duration::hours(1) + chrono::Duration::seconds(1));
        let expired = registry.sweep_expired();

        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].session_id, stale);
        assert_eq!(expired[0].owner_id, stale_owner);

        // Expiry is observable to the owner
        let err = registry.append_sample(stale, coord(1.0, 1.0), clock.now()).unwrap_err();
        assert!(matches!(err, AccessMapError::SessionNotFound { .. }));
        assert_eq!(registry.get_active_session(&stale_owner), None);
        assert!(registry.snapshot(fresh).is_ok());
    }

    #[test]
    fn test_activity_defers_expiry() {
        let (clock, registry) = registry();
        let id = registry.start(OwnerId::new("u1")).unwrap();

        clock.advance(chrono::Duration::hours(3));
        registry.pause(id).unwrap();
        clock.advance(chrono::Duration::hours(3));

        assert!(registry.sweep_expired().is_empty());

        clock.advance(chrono::Duration::hours(2));
        assert_eq!(registry.sweep_expired().len(), 1);
    }

    #[test]
    fn test_snapshot_does_not_count_as_activity() {
        let (clock, registry) = registry();
        let id = registry.start(OwnerId::new("u1")).unwrap();

        clock.advance(chrono::Duration::hours(4));
        registry.snapshot(id).unwrap();
        clock.advance(chrono::Duration::seconds(1));

        assert_eq!(registry.sweep_expired().len(), 1);
    }
}
