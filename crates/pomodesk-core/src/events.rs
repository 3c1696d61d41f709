use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerState};

/// Every state change in the timer produces an Event.
/// Hosts render them; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Delivered at most once per run, on the tick that observes expiry.
    /// Recording the session (focus only) and any notification are the
    /// caller's responsibility.
    TimerCompleted {
        mode: TimerMode,
        minutes_completed: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        remaining_secs: u32,
        initial_secs: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}
