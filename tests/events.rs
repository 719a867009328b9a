#![cfg(feature = "emitter")]

mod support;

use std::sync::mpsc;
use std::time::Duration;

use book_tracker::{ReadingStatus, TrackerEvent};
use support::{at, tracker_at, BookBuilder};

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn book_events_carry_id_and_status() {
    let (mut tracker, _, _) = tracker_at(2025, 6, 1);
    let (tx, rx) = mpsc::channel();
    for event in [TrackerEvent::BookAdded, TrackerEvent::BookUpdated, TrackerEvent::BookDeleted] {
        let tx = tx.clone();
        tracker.on(event, move |payload: String| {
            let _ = tx.send((event, payload));
        });
    }

    let id = tracker.add(BookBuilder::new("Dune").build()).unwrap();
    let (event, payload) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event, TrackerEvent::BookAdded);
    let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["status"], "currently_reading");

    tracker.update_status(id, ReadingStatus::Completed).unwrap();
    let (event, payload) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event, TrackerEvent::BookUpdated);
    assert!(payload.contains("completed"));

    tracker.delete(id).unwrap();
    let (event, _) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(event, TrackerEvent::BookDeleted);
}

#[test]
fn goal_changes_are_announced() {
    let (mut tracker, _, _) = tracker_at(2025, 6, 1);
    let (tx, rx) = mpsc::channel();
    tracker.on(TrackerEvent::GoalChanged, move |payload: String| {
        let _ = tx.send(payload);
    });

    tracker.set_target(52).unwrap();
    let payload = rx.recv_timeout(WAIT).unwrap();
    let goal: book_tracker::ReadingGoal = serde_json::from_str(&payload).unwrap();
    assert_eq!(goal.target_books, 52);
    assert_eq!(goal.year, 2025);
}

#[test]
fn rollover_event_carries_archived_goal() {
    let (mut tracker, clock, _) = tracker_at(2025, 12, 31);
    let (tx, rx) = mpsc::channel();
    tracker.on(TrackerEvent::YearRolledOver, move |payload: String| {
        let _ = tx.send(payload);
    });

    clock.set(at(2026, 1, 1));
    tracker.advance_year_if_needed().unwrap();

    let archived: book_tracker::YearlyGoal =
        serde_json::from_str(&rx.recv_timeout(WAIT).unwrap()).unwrap();
    assert_eq!(archived.year, 2025);
}

#[test]
fn removed_listener_stops_receiving() {
    let (mut tracker, _, _) = tracker_at(2025, 6, 1);
    let (tx, rx) = mpsc::channel();
    let listener = tracker.on(TrackerEvent::GenresChanged, move |payload: String| {
        let _ = tx.send(payload);
    });

    tracker.add_genre("Horror").unwrap();
    let names: Vec<String> = serde_json::from_str(&rx.recv_timeout(WAIT).unwrap()).unwrap();
    assert!(names.contains(&"Horror".to_string()));

    assert!(tracker.remove_listener(&listener));
    tracker.add_genre("Westerns").unwrap();
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}
