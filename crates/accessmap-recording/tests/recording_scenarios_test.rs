//! Recording lifecycle scenarios driven through the registry

use std::sync::Arc;
use std::time::Duration;

use accessmap_core::clock::ManualClock;
use accessmap_core::error::AccessMapError;
use accessmap_core::models::{Coordinate, OwnerId, SessionState};
use accessmap_recording::SessionRegistry;
use chrono::{DateTime, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn setup() -> (Arc<ManualClock>, SessionRegistry) {
    let clock = Arc::new(ManualClock::new(t0()));
    let registry = SessionRegistry::new(clock.clone(), Duration::from_secs(4 * 3600));
    (clock, registry)
}

#[test]
fn test_two_sample_route_summary() {
    let (clock, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();

    registry
        .append_sample(id, Coordinate::new(13.7563, 100.5018).unwrap(), t0())
        .unwrap();
    clock.advance(chrono::Duration::seconds(30));
    registry
        .append_sample(
            id,
            Coordinate::new(13.7570, 100.5020).unwrap(),
            t0() + chrono::Duration::seconds(30),
        )
        .unwrap();

    let summary = registry.stop(id).unwrap();

    assert_eq!(summary.path.len(), 2);
    assert_eq!(summary.owner_id, OwnerId::new("u1"));
    // Haversine of the two points is ~80.8m
    assert!(
        (summary.total_distance_meters - 82.0).abs() < 2.0,
        "distance {}",
        summary.total_distance_meters
    );
    assert!((summary.active_duration_seconds - 30.0).abs() < 0.1);
}

#[test]
fn test_pause_resume_accounting() {
    let (clock, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();

    clock.advance(chrono::Duration::seconds(10));
    registry.pause(id).unwrap();
    clock.advance(chrono::Duration::seconds(5));
    registry.resume(id).unwrap();
    clock.advance(chrono::Duration::seconds(10));

    let summary = registry.stop(id).unwrap();
    assert!((summary.active_duration_seconds - 20.0).abs() <= 0.1);
}

#[test]
fn test_repeated_pause_cycles() {
    let (clock, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();

    for _ in 0..3 {
        clock.advance(chrono::Duration::seconds(60));
        registry.pause(id).unwrap();
        clock.advance(chrono::Duration::seconds(600));
        registry.resume(id).unwrap();
    }
    clock.advance(chrono::Duration::seconds(60));

    let snapshot = registry.snapshot(id).unwrap();
    assert!((snapshot.active_duration_seconds - 240.0).abs() <= 0.1);

    let summary = registry.stop(id).unwrap();
    assert!((summary.active_duration_seconds - 240.0).abs() <= 0.1);
}

#[test]
fn test_pause_while_paused_fails_loudly() {
    let (_, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();
    registry.pause(id).unwrap();

    let err = registry.pause(id).unwrap_err();
    assert!(matches!(err, AccessMapError::InvalidState { .. }), "got {:?}", err);
}

#[test]
fn test_out_of_order_sample_not_added() {
    let (_, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();
    let here = Coordinate::new(13.7563, 100.5018).unwrap();

    registry.append_sample(id, here, t0() + chrono::Duration::seconds(30)).unwrap();
    let err = registry.append_sample(id, here, t0()).unwrap_err();

    assert!(matches!(err, AccessMapError::OutOfOrderSample { .. }));
    assert_eq!(registry.snapshot(id).unwrap().sample_count, 1);
    assert_eq!(registry.stop(id).unwrap().path.len(), 1);
}

#[test]
fn test_samples_rejected_while_paused() {
    let (_, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();
    registry.pause(id).unwrap();

    let err = registry
        .append_sample(id, Coordinate::new(0.0, 0.0).unwrap(), t0())
        .unwrap_err();
    assert!(matches!(err, AccessMapError::InvalidState { .. }));

    registry.resume(id).unwrap();
    assert_eq!(registry.snapshot(id).unwrap().state, SessionState::Recording);
}

#[test]
fn test_stop_from_paused() {
    let (clock, registry) = setup();
    let id = registry.start(OwnerId::new("u1")).unwrap();
    clock.advance(chrono::Duration::seconds(10));
    registry.pause(id).unwrap();
    clock.advance(chrono::Duration::seconds(50));

    let summary = registry.stop(id).unwrap();
    assert!((summary.active_duration_seconds - 10.0).abs() <= 0.1);
    assert_eq!(registry.get_active_session(&OwnerId::new("u1")), None);
}
