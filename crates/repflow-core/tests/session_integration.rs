//! Integration tests for the session layer against a real database.
//!
//! Tests the full workflow from starting a workout through set completion,
//! saving mid-session, resuming in a fresh state machine, and finishing
//! with XP and badge updates.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use repflow_core::{
    evaluate_badges, newly_unlocked, Collaborators, Database, Event, Exercise, FixedIdentity,
    NullFeedback, SessionFlow, SessionRunner, SessionStatus, Workout, WorkoutStatus, WORKOUT_XP,
};

fn sample_workout() -> Workout {
    Workout::new(
        "Push Day",
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        vec![
            Exercise::new("Bench Press", 80.0, 8, 2).with_rest(90),
            Exercise::new("Overhead Press", 45.0, 10, 2),
        ],
    )
}

#[test]
fn save_mid_session_then_resume_from_database() {
    let db = Database::open_memory().unwrap();
    let actor = Uuid::new_v4();
    let identity = FixedIdentity(actor);
    let feedback = NullFeedback;

    let workout = sample_workout();
    db.insert_workout(&workout).unwrap();

    let flow = SessionFlow::new(db.get_workout(workout.id).unwrap()).unwrap();
    let mut runner = SessionRunner::new(
        flow,
        Collaborators {
            store: &db,
            logger: &db,
            feedback: &feedback,
            identity: &identity,
        },
    );

    // Complete the first set, then spend a minute resting.
    let events = runner.complete_set();
    assert!(matches!(events[0], Event::SetCompleted { .. }));
    assert!(matches!(events[1], Event::RestStarted { .. }));
    for _ in 0..60 {
        runner.tick();
    }

    // Quit with save.
    runner.request_quit();
    let saved = runner.save_and_exit().unwrap();
    assert!(matches!(saved, Event::ProgressSaved { .. }));

    // A fresh machine built from the stored row picks up where we left off.
    let stored = db.get_workout(workout.id).unwrap();
    assert_eq!(stored.status, WorkoutStatus::InProgress);
    assert_eq!(stored.current_exercise_index, 0);
    assert_eq!(stored.current_set_index, 1);
    assert_eq!(stored.exercises[0].completed_sets, 1);

    let resumed = SessionFlow::new(stored).unwrap();
    assert_eq!(resumed.exercise_index(), 0);
    assert_eq!(resumed.set_index(), 1);
    assert_eq!(resumed.elapsed_secs(), 60);
    assert_eq!(resumed.progress_percent(), 50);
}

#[test]
fn finishing_a_workout_awards_xp_and_unlocks_badges() {
    let db = Database::open_memory().unwrap();
    let actor = Uuid::new_v4();
    let identity = FixedIdentity(actor);
    let feedback = NullFeedback;

    let workout = sample_workout();
    let workout_id = workout.id;
    db.insert_workout(&workout).unwrap();

    let flow = SessionFlow::new(workout).unwrap();
    let mut runner = SessionRunner::new(
        flow,
        Collaborators {
            store: &db,
            logger: &db,
            feedback: &feedback,
            identity: &identity,
        },
    );

    // Drive all 4 sets to completion, skipping every rest.
    let mut finished = false;
    for _ in 0..4 {
        for event in runner.complete_set() {
            match event {
                Event::WorkoutFinished { total_sets, .. } => {
                    assert_eq!(total_sets, 4);
                    finished = true;
                }
                Event::RestStarted { .. } => {
                    runner.skip_rest();
                }
                _ => {}
            }
        }
    }
    assert!(finished);
    assert_eq!(runner.flow().status(), SessionStatus::Finished);

    runner.finalize().unwrap();

    let stored = db.get_workout(workout_id).unwrap();
    assert_eq!(stored.status, WorkoutStatus::Completed);
    assert_eq!(db.total_xp(actor).unwrap(), WORKOUT_XP);
    assert_eq!(db.completed_workout_count().unwrap(), 1);

    // Evaluate badges against the same day the workout completed.
    let stats = db.progress_stats(actor, Utc::now().date_naive()).unwrap();
    let current = evaluate_badges(&stats);
    assert!(current.contains("first-100"));
    assert!(current.contains("first-workout"));

    let previous = db.unlocked_badge_ids(actor).unwrap();
    let fresh = newly_unlocked(&previous, &current);
    assert!(fresh.contains(&"first-workout"));
    db.mark_badges_unlocked(actor, &fresh, Utc::now()).unwrap();

    // A second evaluation finds nothing new.
    let previous = db.unlocked_badge_ids(actor).unwrap();
    assert!(newly_unlocked(&previous, &current).is_empty());

    // Per-set log rows were appended as a side effect.
    let sets: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM set_logs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(sets, 4);
}

#[test]
fn discarding_a_session_cancels_the_workout() {
    let db = Database::open_memory().unwrap();
    let identity = FixedIdentity(Uuid::new_v4());
    let feedback = NullFeedback;

    let workout = sample_workout();
    db.insert_workout(&workout).unwrap();

    let flow = SessionFlow::new(db.get_workout(workout.id).unwrap()).unwrap();
    let mut runner = SessionRunner::new(
        flow,
        Collaborators {
            store: &db,
            logger: &db,
            feedback: &feedback,
            identity: &identity,
        },
    );

    runner.complete_set();
    runner.request_quit();
    runner.discard_and_exit().unwrap();

    let stored = db.get_workout(workout.id).unwrap();
    assert_eq!(stored.status, WorkoutStatus::Cancelled);
    // Discard keeps the cursor where the original row had it.
    assert_eq!(stored.current_set_index, 0);
}
