use chrono::Local;
use clap::Subcommand;
use pomodesk_core::stats::{streaks, today_stats, weekly_series};
use pomodesk_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's focus totals
    Today,
    /// 7-day series, oldest first
    Week,
    /// Current and longest day streak
    Streak,
    /// All-time totals
    All,
}

#[derive(serde::Serialize)]
struct AllTimeStats {
    total_sessions: u32,
    focus_sessions: u32,
    total_focus_minutes: f64,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.all_sessions()?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Today => {
            let stat = today_stats(&sessions, today);
            println!("{}", serde_json::to_string_pretty(&stat)?);
        }
        StatsAction::Week => {
            let series = weekly_series(&sessions, today);
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        StatsAction::Streak => {
            let summary = streaks(&sessions, today);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::All => {
            let focus: Vec<_> = sessions.iter().filter(|s| s.is_focus()).collect();
            let stats = AllTimeStats {
                total_sessions: sessions.len() as u32,
                focus_sessions: focus.len() as u32,
                total_focus_minutes: focus.iter().map(|s| s.duration_minutes).sum(),
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
