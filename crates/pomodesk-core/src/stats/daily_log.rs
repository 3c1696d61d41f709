//! Incrementally-maintained per-day totals, persisted whole-document.
//!
//! This is the non-remote fallback path: one JSON array of daily entries
//! under a single kv key, read and rewritten in full on every update.
//! Historical entries are never modified once their day has passed.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::aggregate::DailyStat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    entries: Vec<DailyStat>,
}

impl DailyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted document. A corrupt blob degrades to an empty
    /// history rather than an error.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!(%err, "discarding malformed daily log");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn entries(&self) -> &[DailyStat] {
        &self.entries
    }

    /// Today's entry, zeroed if the day hasn't been touched yet.
    pub fn today(&self, today: NaiveDate) -> DailyStat {
        self.entries
            .iter()
            .find(|e| e.date == today)
            .cloned()
            .unwrap_or_else(|| DailyStat::empty(today))
    }

    /// Apply deltas to today's entry, creating it on first touch. Entries
    /// stay sorted ascending by date; `tasks_completed` is clamped at zero
    /// so un-completing a task never goes negative.
    pub fn apply(
        &mut self,
        today: NaiveDate,
        minutes_delta: f64,
        tasks_delta: i32,
        sessions_delta: u32,
    ) {
        match self.entries.iter_mut().find(|e| e.date == today) {
            Some(entry) => {
                entry.focus_minutes += minutes_delta;
                entry.tasks_completed =
                    entry.tasks_completed.saturating_add_signed(tasks_delta);
                entry.sessions_completed += sessions_delta;
            }
            None => {
                self.entries.push(DailyStat {
                    date: today,
                    focus_minutes: minutes_delta,
                    tasks_completed: tasks_delta.max(0) as u32,
                    sessions_completed: sessions_delta,
                });
                self.entries.sort_by_key(|e| e.date);
            }
        }
    }

    /// 7-wide zero-filled window over the log, `today-6 ..= today`.
    pub fn weekly(&self, today: NaiveDate) -> Vec<DailyStat> {
        (0..7)
            .map(|i| {
                let date = today - Duration::days(6 - i);
                self.entries
                    .iter()
                    .find(|e| e.date == date)
                    .cloned()
                    .unwrap_or_else(|| DailyStat::empty(date))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn apply_creates_and_accumulates() {
        let mut log = DailyLog::new();
        log.apply(day(20), 25.0, 0, 1);
        log.apply(day(20), 15.0, 1, 1);
        let today = log.today(day(20));
        assert!((today.focus_minutes - 40.0).abs() < f64::EPSILON);
        assert_eq!(today.tasks_completed, 1);
        assert_eq!(today.sessions_completed, 2);
    }

    #[test]
    fn tasks_completed_clamps_at_zero() {
        let mut log = DailyLog::new();
        log.apply(day(20), 0.0, -1, 0);
        assert_eq!(log.today(day(20)).tasks_completed, 0);
    }

    #[test]
    fn entries_stay_sorted_by_date() {
        let mut log = DailyLog::new();
        log.apply(day(22), 10.0, 0, 1);
        log.apply(day(20), 10.0, 0, 1);
        log.apply(day(21), 10.0, 0, 1);
        let dates: Vec<NaiveDate> = log.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(20), day(21), day(22)]);
    }

    #[test]
    fn roundtrip_through_json() {
        let mut log = DailyLog::new();
        log.apply(day(20), 25.0, 2, 1);
        let raw = log.to_json().unwrap();
        let restored = DailyLog::from_json(&raw);
        assert_eq!(restored.entries(), log.entries());
    }

    #[test]
    fn malformed_blob_degrades_to_empty() {
        let log = DailyLog::from_json("{not json");
        assert!(log.entries().is_empty());
        let log = DailyLog::from_json("{\"unexpected\": true}");
        assert!(log.entries().is_empty());
    }

    #[test]
    fn weekly_window_is_zero_filled() {
        let mut log = DailyLog::new();
        log.apply(day(20), 30.0, 0, 1);
        log.apply(day(17), 15.0, 0, 1);
        log.apply(day(10), 99.0, 0, 1); // outside the window
        let week = log.weekly(day(20));
        assert_eq!(week.len(), 7);
        assert!((week[6].focus_minutes - 30.0).abs() < f64::EPSILON);
        assert!((week[3].focus_minutes - 15.0).abs() < f64::EPSILON);
        assert_eq!(week[0].focus_minutes, 0.0);
    }
}
