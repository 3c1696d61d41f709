//! Statistics for completed focus sessions.
//!
//! Aggregation is pure: functions take a session list and a reference date
//! and derive today/weekly/streak views. The `DailyLog` is the incremental
//! whole-document counterpart used by the local persistence path.

mod aggregate;
mod daily_log;
mod session;

pub use aggregate::{streaks, today_stats, weekly_series, DailyStat, StreakSummary};
pub use daily_log::DailyLog;
pub use session::Session;
