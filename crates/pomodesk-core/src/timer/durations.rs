use serde::{Deserialize, Serialize};

use super::TimerMode;

/// Per-mode countdown lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    #[serde(default = "default_focus")]
    pub focus_min: u32,
    #[serde(default = "default_short_break")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break")]
    pub long_break_min: u32,
}

fn default_focus() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus_min: default_focus(),
            short_break_min: default_short_break(),
            long_break_min: default_long_break(),
        }
    }
}

impl TimerDurations {
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_min,
            TimerMode::ShortBreak => self.short_break_min,
            TimerMode::LongBreak => self.long_break_min,
        }
    }

    /// Countdown length in seconds for `mode`.
    ///
    /// Saturating to guard against absurd configured values.
    pub fn secs_for(&self, mode: TimerMode) -> u32 {
        self.minutes_for(mode).saturating_mul(60)
    }
}
