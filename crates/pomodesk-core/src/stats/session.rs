use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// A completed countdown run. Immutable once created.
///
/// Only focus sessions count toward minute/streak statistics, but break
/// sessions may still be stored and travel through the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub duration_minutes: f64,
    pub mode: TimerMode,
    /// Wall-clock completion time. Day bucketing uses the *local* calendar
    /// day of this instant.
    pub occurred_at: DateTime<Utc>,
}

impl Session {
    pub fn new(duration_minutes: f64, mode: TimerMode, occurred_at: DateTime<Utc>) -> Self {
        Self {
            duration_minutes,
            mode,
            occurred_at,
        }
    }

    /// The local calendar day this session completed on.
    pub fn local_date(&self) -> NaiveDate {
        self.occurred_at.with_timezone(&Local).date_naive()
    }

    pub fn is_focus(&self) -> bool {
        self.mode == TimerMode::Focus
    }
}
