//! End-to-end flow: run the timer to completion, record the session the
//! way a host would, and read the statistics back out.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use pomodesk_core::stats::{streaks, today_stats, weekly_series, Session};
use pomodesk_core::storage::Database;
use pomodesk_core::timer::{TimerDurations, TimerEngine, TimerMode, TimerState};
use pomodesk_core::Event;

/// Local midday on `days_ago`, as a UTC instant. Keeps local-day bucketing
/// deterministic in any test timezone.
fn local_midday(days_ago: i64) -> DateTime<Utc> {
    let date = Local::now().date_naive() - Duration::days(days_ago);
    Local
        .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn completed_focus_run_lands_in_stats() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::new(TimerDurations {
        focus_min: 25,
        short_break_min: 5,
        long_break_min: 15,
    });

    // Drive the engine to completion with a coarse, uneven tick cadence.
    let t0 = local_midday(0);
    engine.start(t0).unwrap();
    assert!(engine.tick(t0 + Duration::seconds(60)).is_none());
    assert!(engine.tick(t0 + Duration::seconds(900)).is_none());
    let completed = engine.tick(t0 + Duration::seconds(25 * 60)).unwrap();

    // The host records the session; breaks would be skipped here.
    let (mode, minutes, at) = match completed {
        Event::TimerCompleted {
            mode,
            minutes_completed,
            at,
        } => (mode, minutes_completed, at),
        other => panic!("expected TimerCompleted, got {other:?}"),
    };
    assert_eq!(mode, TimerMode::Focus);
    db.record_session(&Session::new(minutes, mode, at)).unwrap();

    // Stats read the recorded history back.
    let today = Local::now().date_naive();
    let sessions = db.all_sessions().unwrap();
    let stat = today_stats(&sessions, today);
    assert!((stat.focus_minutes - 25.0).abs() < f64::EPSILON);
    assert_eq!(stat.sessions_completed, 1);

    let series = weekly_series(&sessions, today);
    assert_eq!(series.len(), 7);
    assert!((series[6].focus_minutes - 25.0).abs() < f64::EPSILON);

    let summary = streaks(&sessions, today);
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.total_sessions, 1);
}

#[test]
fn abandoned_break_run_records_nothing() {
    let db = Database::open_memory().unwrap();
    let mut engine = TimerEngine::default();
    engine.switch_mode(TimerMode::ShortBreak);

    let t0 = local_midday(0);
    engine.start(t0).unwrap();
    // The user switches back to focus mid-break: no completion, nothing
    // recorded.
    engine.switch_mode(TimerMode::Focus);
    assert!(engine.tick(t0 + Duration::seconds(3600)).is_none());
    assert_eq!(engine.state(), TimerState::Idle);
    assert!(db.all_sessions().unwrap().is_empty());
}

#[test]
fn history_across_days_yields_streaks() {
    let db = Database::open_memory().unwrap();
    for days_ago in [0, 1, 2, 6] {
        db.record_session(&Session::new(25.0, TimerMode::Focus, local_midday(days_ago)))
            .unwrap();
    }
    db.record_session(&Session::new(5.0, TimerMode::ShortBreak, local_midday(0)))
        .unwrap();

    let today = Local::now().date_naive();
    let sessions = db.all_sessions().unwrap();

    let summary = streaks(&sessions, today);
    assert_eq!(summary.current_streak, 3);
    assert_eq!(summary.longest_streak, 3);
    assert_eq!(summary.total_sessions, 5);

    let series = weekly_series(&sessions, today);
    assert!((series[0].focus_minutes - 25.0).abs() < f64::EPSILON); // today-6
    assert_eq!(series[3].focus_minutes, 0.0);
    assert!((series[6].focus_minutes - 25.0).abs() < f64::EPSILON);
}
