//! Recording session state machine.
//!
//! ```text
//! Idle -> Recording <-> Paused -> Stopped
//!   \________\____________\----> Discarded
//! ```
//!
//! All transitions take the current instant explicitly; the registry reads it
//! from its clock. Stopped and Discarded are terminal.

use accessmap_core::error::{AccessMapError, Result};
use accessmap_core::models::{
    OwnerId, PathSample, PausedInterval, RouteSummary, SessionId, SessionSnapshot, SessionState,
};
use accessmap_geo::path_length;
use chrono::{DateTime, Duration, Utc};

/// One user's in-progress path capture
#[derive(Debug, Clone)]
pub struct RecordingSession {
    id: SessionId,
    owner_id: OwnerId,
    state: SessionState,
    samples: Vec<PathSample>,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    paused_intervals: Vec<PausedInterval>,
    last_activity: DateTime<Utc>,
}

impl RecordingSession {
    /// Create an idle session
    pub fn new(id: SessionId, owner_id: OwnerId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            state: SessionState::Idle,
            samples: Vec::new(),
            started_at: None,
            stopped_at: None,
            paused_intervals: Vec::new(),
            last_activity: created_at,
        }
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    pub fn paused_intervals(&self) -> &[PausedInterval] {
        &self.paused_intervals
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Idle -> Recording
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.require(&[SessionState::Idle], "start")?;
        self.state = SessionState::Recording;
        self.started_at = Some(now);
        self.last_activity = now;
        Ok(())
    }

    /// Append a GPS fix; only while recording and never earlier than the last one
    pub fn append_sample(&mut self, sample: PathSample, now: DateTime<Utc>) -> Result<()> {
        self.require(&[SessionState::Recording], "append a sample to")?;

        if let Some(last) = self.samples.last() {
            if sample.captured_at < last.captured_at {
                return Err(AccessMapError::OutOfOrderSample {
                    previous: last.captured_at,
                    attempted: sample.captured_at,
                });
            }
        }

        self.samples.push(sample);
        self.last_activity = now;
        Ok(())
    }

    /// Recording -> Paused; pausing twice is an error
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.require(&[SessionState::Recording], "pause")?;
        self.paused_intervals.push(PausedInterval { pause_start: now, resume_end: None });
        self.state = SessionState::Paused;
        self.last_activity = now;
        Ok(())
    }

    /// Paused -> Recording, closing the open pause interval
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.require(&[SessionState::Paused], "resume")?;
        self.close_open_pause(now);
        self.state = SessionState::Recording;
        self.last_activity = now;
        Ok(())
    }

    /// Recording|Paused -> Stopped, producing the route summary
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<RouteSummary> {
        self.require(&[SessionState::Recording, SessionState::Paused], "stop")?;
        self.close_open_pause(now);
        self.state = SessionState::Stopped;
        self.stopped_at = Some(now);

        Ok(RouteSummary {
            session_id: self.id,
            owner_id: self.owner_id.clone(),
            path: self.samples.clone(),
            total_distance_meters: self.distance_meters(),
            active_duration_seconds: seconds(self.active_duration(now)),
            started_at: self.started_at.unwrap_or(now),
            stopped_at: now,
        })
    }

    /// Any non-terminal state -> Discarded
    pub fn discard(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state.is_terminal() {
            return Err(self.invalid_state("discard"));
        }
        self.close_open_pause(now);
        self.state = SessionState::Discarded;
        self.stopped_at = Some(now);
        Ok(())
    }

    /// Total path length over consecutive samples
    pub fn distance_meters(&self) -> f64 {
        path_length(self.samples.iter().map(|s| &s.coordinate))
    }

    /// Time spent recording: wall time since start minus all paused time
    ///
    /// An open pause counts up to `now`. Never negative.
    pub fn active_duration(&self, now: DateTime<Utc>) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::zero();
        };
        let end = self.stopped_at.unwrap_or(now);

        let paused: Duration = self
            .paused_intervals
            .iter()
            .map(|interval| {
                let resumed = interval.resume_end.unwrap_or(end);
                (resumed - interval.pause_start).max(Duration::zero())
            })
            .fold(Duration::zero(), |acc, d| acc + d);

        (end - started_at - paused).max(Duration::zero())
    }

    /// Time since the last start/append/pause/resume
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_activity).max(Duration::zero())
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            owner_id: self.owner_id.clone(),
            state: self.state,
            sample_count: self.samples.len(),
            distance_meters: self.distance_meters(),
            active_duration_seconds: seconds(self.active_duration(now)),
            started_at: self.started_at,
            last_activity: self.last_activity,
        }
    }

    fn close_open_pause(&mut self, now: DateTime<Utc>) {
        if let Some(open) = self.paused_intervals.last_mut().filter(|i| i.resume_end.is_none()) {
            open.resume_end = Some(now);
        }
    }

    fn require(&self, allowed: &[SessionState], operation: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    fn invalid_state(&self, operation: &str) -> AccessMapError {
        AccessMapError::InvalidState {
            session_id: self.id,
            state: self.state.to_string(),
            operation: operation.to_string(),
        }
    }
}

fn seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessmap_core::models::Coordinate;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    fn sample(lat: f64, lon: f64, at: DateTime<Utc>) -> PathSample {
        PathSample::new(Coordinate::new(lat, lon).unwrap(), at)
    }

    fn recording() -> RecordingSession {
        let mut session = RecordingSession::new(SessionId::new(), OwnerId::new("u1"), t0());
        session.begin(t0()).unwrap();
        session
    }

    fn assert_invalid_state(result: Result<()>) {
        assert!(
            matches!(result, Err(AccessMapError::InvalidState { .. })),
            "expected InvalidState, got {:?}",
            result
        );
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = RecordingSession::new(SessionId::new(), OwnerId::new("u1"), t0());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.active_duration(t0() + secs(100)), Duration::zero());
    }

    #[test]
    fn test_append_requires_recording() {
        let mut idle = RecordingSession::new(SessionId::new(), OwnerId::new("u1"), t0());
        assert_invalid_state(idle.append_sample(sample(1.0, 1.0, t0()), t0()));

        let mut paused = recording();
        paused.pause(t0() + secs(1)).unwrap();
        assert_invalid_state(paused.append_sample(sample(1.0, 1.0, t0() + secs(2)), t0() + secs(2)));
        assert!(paused.samples().is_empty());
    }

    #[test]
    fn test_out_of_order_sample_rejected() {
        let mut session = recording();
        session.append_sample(sample(13.7563, 100.5018, t0() + secs(30)), t0()).unwrap();

        let err = session
            .append_sample(sample(13.7570, 100.5020, t0() + secs(10)), t0())
            .unwrap_err();

        assert!(matches!(err, AccessMapError::OutOfOrderSample { .. }));
        assert_eq!(session.samples().len(), 1);
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let mut session = recording();
        let s = sample(13.7563, 100.5018, t0() + secs(5));
        session.append_sample(s, t0()).unwrap();
        session.append_sample(s, t0()).unwrap();
        assert_eq!(session.samples().len(), 2);
        assert_eq!(session.distance_meters(), 0.0);
    }

    #[test]
    fn test_double_pause_fails() {
        let mut session = recording();
        session.pause(t0() + secs(1)).unwrap();
        assert_invalid_state(session.pause(t0() + secs(2)));
        assert_eq!(session.paused_intervals().len(), 1);
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut session = recording();
        assert_invalid_state(session.resume(t0() + secs(1)));
    }

    #[test]
    fn test_pause_interval_bookkeeping() {
        let mut session = recording();
        session.pause(t0() + secs(10)).unwrap();

        let open = session.paused_intervals().last().unwrap();
        assert_eq!(open.pause_start, t0() + secs(10));
        assert!(open.resume_end.is_none());

        session.resume(t0() + secs(15)).unwrap();
        let closed = session.paused_intervals().last().unwrap();
        assert_eq!(closed.resume_end, Some(t0() + secs(15)));
    }

    #[test]
    fn test_duration_excludes_pauses() {
        let mut session = recording();
        session.pause(t0() + secs(10)).unwrap();
        session.resume(t0() + secs(15)).unwrap();

        let summary = session.stop(t0() + secs(25)).unwrap();
        assert!((summary.active_duration_seconds - 20.0).abs() < 0.1);
    }

    #[test]
    fn test_open_pause_not_counted_while_paused() {
        let mut session = recording();
        session.pause(t0() + secs(10)).unwrap();

        assert_eq!(session.active_duration(t0() + secs(60)), secs(10));
    }

    #[test]
    fn test_stop_from_paused_closes_interval() {
        let mut session = recording();
        session.pause(t0() + secs(10)).unwrap();

        let summary = session.stop(t0() + secs(40)).unwrap();
        assert!((summary.active_duration_seconds - 10.0).abs() < 0.1);
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.paused_intervals().iter().all(|i| i.resume_end.is_some()));
    }

    #[test]
    fn test_stop_summary_distance() {
        let mut session = recording();
        session.append_sample(sample(13.7563, 100.5018, t0()), t0()).unwrap();
        session.append_sample(sample(13.7570, 100.5020, t0() + secs(30)), t0() + secs(30)).unwrap();

        let summary = session.stop(t0() + secs(31)).unwrap();
        assert_eq!(summary.path.len(), 2);
        assert!((summary.total_distance_meters - 80.8).abs() < 1.0);
        assert_eq!(summary.started_at, t0());
        assert_eq!(summary.stopped_at, t0() + secs(31));
    }

    #[test]
    fn test_single_sample_distance_is_zero() {
        let mut session = recording();
        session.append_sample(sample(1.0, 1.0, t0()), t0()).unwrap();
        assert_eq!(session.stop(t0() + secs(1)).unwrap().total_distance_meters, 0.0);
    }

    #[test]
    fn test_stop_from_idle_is_invalid() {
        let mut idle = RecordingSession::new(SessionId::new(), OwnerId::new("u1"), t0());
        assert!(matches!(idle.stop(t0()), Err(AccessMapError::InvalidState { .. })));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut stopped = recording();
        stopped.stop(t0() + secs(1)).unwrap();
        assert_invalid_state(stopped.pause(t0() + secs(2)));
        assert_invalid_state(stopped.resume(t0() + secs(2)));
        assert_invalid_state(stopped.discard(t0() + secs(2)));
        assert!(stopped.stop(t0() + secs(2)).is_err());

        let mut discarded = recording();
        discarded.discard(t0() + secs(1)).unwrap();
        assert_eq!(discarded.state(), SessionState::Discarded);
        assert_invalid_state(discarded.begin(t0() + secs(2)));
        assert_invalid_state(discarded.append_sample(sample(0.0, 0.0, t0()), t0()));
        assert_invalid_state(discarded.discard(t0() + secs(2)));
    }

    #[test]
    fn test_discard_from_any_live_state() {
        let mut idle = RecordingSession::new(SessionId::new(), OwnerId::new("u1"), t0());
        assert!(idle.discard(t0()).is_ok());

        let mut paused = recording();
        paused.pause(t0() + secs(1)).unwrap();
        assert!(paused.discard(t0() + secs(2)).is_ok());
    }

    #[test]
    fn test_idle_tracking() {
        let mut session = recording();
        session.append_sample(sample(1.0, 1.0, t0()), t0() + secs(30)).unwrap();
        assert_eq!(session.last_activity(), t0() + secs(30));
        assert_eq!(session.idle_for(t0() + secs(90)), secs(60));
    }

    #[test]
    fn test_snapshot() {
        let mut session = recording();
        session.append_sample(sample(1.0, 1.0, t0()), t0()).unwrap();
        session.pause(t0() + secs(4)).unwrap();

        let snapshot = session.snapshot(t0() + secs(10));
        assert_eq!(snapshot.state, SessionState::Paused);
        assert_eq!(snapshot.sample_count, 1);
        assert!((snapshot.active_duration_seconds - 4.0).abs() < 1e-9);
    }
}
