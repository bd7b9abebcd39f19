//! Integration tests for the duration tracker against a real database,
//! including the serialize-to-kv round trip the CLI relies on between
//! invocations.

use chrono::{Duration, Utc};
use uuid::Uuid;

use repflow_core::{format_duration, Database, FixedIdentity, SessionTracker, TrackerStatus};

#[test]
fn tracker_survives_a_kv_round_trip() {
    let db = Database::open_memory().unwrap();
    let identity = FixedIdentity(Uuid::new_v4());
    let start = Utc::now();

    let mut tracker = SessionTracker::new();
    tracker.start(start, None, &identity, &db).unwrap();

    // Persist and reload, as separate CLI invocations do.
    db.kv_set("tracker", &serde_json::to_string(&tracker).unwrap())
        .unwrap();
    let mut tracker: SessionTracker =
        serde_json::from_str(&db.kv_get("tracker").unwrap().unwrap()).unwrap();
    assert_eq!(tracker.status(), TrackerStatus::Started);

    tracker
        .pause(start + Duration::seconds(90), &db)
        .unwrap();
    tracker
        .resume(start + Duration::seconds(150), &db)
        .unwrap();
    tracker.end(start + Duration::seconds(180), &db).unwrap();

    // 90s active, 60s paused, 30s active again.
    assert_eq!(tracker.last_duration_secs(), Some(120));

    let record = db.get_session(1).unwrap();
    assert_eq!(record.status, "ended");
    assert_eq!(record.duration_secs, Some(120));
    assert_eq!(format_duration(120), "2m 0s");
}

#[test]
fn tracker_links_to_a_workout_row() {
    let db = Database::open_memory().unwrap();
    let actor = Uuid::new_v4();
    let identity = FixedIdentity(actor);
    let workout_id = Uuid::new_v4();
    let start = Utc::now();

    let mut tracker = SessionTracker::new();
    tracker.start(start, Some(workout_id), &identity, &db).unwrap();
    tracker.end(start + Duration::seconds(45), &db).unwrap();

    let record = db.get_session(1).unwrap();
    assert_eq!(record.actor, actor);
    assert_eq!(record.workout_id, Some(workout_id));
    assert_eq!(record.duration_secs, Some(45));
    assert!(record.end_time.is_some());
}
