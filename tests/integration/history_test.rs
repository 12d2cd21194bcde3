//! History Integration Tests
//!
//! The undo/redo timeline fed by real canvas snapshots: human and AI
//! edits in one ordered stack, AI batching, and reconstruction across
//! delta compaction.

use std::sync::Arc;

use chrono::{Duration, Utc};

use social_canvas::models::history::CanvasSnapshot;
use social_canvas::models::settings::HistoryConfig;
use social_canvas::services::canvas::CanvasAggregate;
use social_canvas::services::history::CanvasHistory;
use social_canvas::storage::Database;
use social_canvas_core::EditSource;

const LONG: &str = "Content that is comfortably past the twenty character minimum.";

fn aggregate() -> Arc<CanvasAggregate> {
    let db = Database::new_in_memory().unwrap();
    Arc::new(CanvasAggregate::create(db, "History Canvas").unwrap())
}

fn capture(agg: &CanvasAggregate, source: EditSource) -> CanvasSnapshot {
    CanvasSnapshot::capture(&agg.get_full_canvas().unwrap(), source)
}

#[test]
fn test_history_tracks_real_canvas_edits() {
    let agg = aggregate();
    let history = CanvasHistory::new(HistoryConfig::default());

    history.push(capture(&agg, EditSource::User));

    agg.update_section("purpose", LONG).unwrap();
    history.push(capture(&agg, EditSource::User));

    agg.update_section("customers", LONG).unwrap();
    history.push(capture(&agg, EditSource::User));

    assert_eq!(history.len(), 3);

    // undo back to the empty canvas
    let one_back = history.undo().unwrap();
    assert_eq!(one_back.sections["customers"], "");
    assert_eq!(one_back.sections["purpose"], LONG);

    let two_back = history.undo().unwrap();
    assert_eq!(two_back.sections["purpose"], "");

    // redo restores the final state
    history.redo();
    let latest = history.redo().unwrap();
    assert_eq!(latest.sections["customers"], LONG);
}

#[test]
fn test_undo_redo_round_trip_over_many_pushes() {
    let agg = aggregate();
    let history = CanvasHistory::new(HistoryConfig::default());

    history.push(capture(&agg, EditSource::User));
    let keys = ["purpose", "customers", "channels", "revenue", "costs"];
    for key in keys {
        agg.update_section(key, LONG).unwrap();
        history.push(capture(&agg, EditSource::User));
    }
    let n = history.len();
    assert_eq!(n, keys.len() + 1);

    let mut first = None;
    for _ in 0..(n - 1) {
        first = history.undo();
    }
    assert!(first.unwrap().sections.values().all(String::is_empty));
    assert!(history.undo().is_none());

    let mut last = None;
    for _ in 0..(n - 1) {
        last = history.redo();
    }
    assert_eq!(last.unwrap().sections["costs"], LONG);
    assert!(history.redo().is_none());
}

#[test]
fn test_ai_edits_batch_human_edits_do_not() {
    let agg = aggregate();
    let history = CanvasHistory::new(HistoryConfig::default());
    let base = Utc::now();

    history.push(capture(&agg, EditSource::User));

    // two AI snapshots 5 seconds apart collapse into one entry
    agg.update_section("purpose", LONG).unwrap();
    let mut ai_one = capture(&agg, EditSource::Agent);
    ai_one.timestamp = base;
    history.push(ai_one);
    assert_eq!(history.len(), 2);

    agg.update_section("customers", LONG).unwrap();
    let mut ai_two = capture(&agg, EditSource::Agent);
    ai_two.timestamp = base + Duration::seconds(5);
    history.push(ai_two);
    assert_eq!(history.len(), 2);

    // a user push at the same cadence creates a new entry
    agg.update_section("channels", LONG).unwrap();
    let mut user = capture(&agg, EditSource::User);
    user.timestamp = base + Duration::seconds(6);
    history.push(user);
    assert_eq!(history.len(), 3);

    // one undo steps over the whole AI batch
    history.undo();
    let before_ai = history.undo().unwrap();
    assert_eq!(before_ai.sections["purpose"], "");
    assert_eq!(before_ai.sections["customers"], "");
}

#[test]
fn test_mixed_timeline_compacts_and_reconstructs() {
    let agg = aggregate();
    let history = CanvasHistory::new(HistoryConfig {
        full_snapshot_window: 3,
        max_entries: 500,
        ai_batch_window_secs: 30,
    });

    history.push(capture(&agg, EditSource::User));

    let edits: Vec<(&str, String)> = (0..9)
        .map(|i| ("purpose", format!("Purpose revision number {} with padding", i)))
        .collect();
    let base = Utc::now();
    for (i, (key, content)) in edits.iter().enumerate() {
        agg.update_section(key, content).unwrap();
        let mut snap = capture(&agg, EditSource::User);
        // keep each push outside any batching ambiguity
        snap.timestamp = base + Duration::seconds(i as i64 * 60);
        history.push(snap);
    }
    assert_eq!(history.len(), 10);

    // every reconstruction on the way back is exact, across the delta zone
    for i in (0..9).rev() {
        let snap = history.undo().unwrap();
        let expected = if i == 0 {
            String::new()
        } else {
            format!("Purpose revision number {} with padding", i - 1)
        };
        assert_eq!(snap.sections["purpose"], expected, "at undo to {}", i);
    }
}

#[test]
fn test_redo_discarded_after_new_edit() {
    let agg = aggregate();
    let history = CanvasHistory::new(HistoryConfig::default());

    history.push(capture(&agg, EditSource::User));
    agg.update_section("purpose", LONG).unwrap();
    history.push(capture(&agg, EditSource::User));

    history.undo();

    agg.update_section("customers", LONG).unwrap();
    history.push(capture(&agg, EditSource::User));

    assert!(history.redo().is_none());
    let current = history.current().unwrap();
    assert_eq!(current.sections["customers"], LONG);
    // the push captured the live canvas, which still holds the purpose edit
    assert_eq!(current.sections["purpose"], LONG);
}
