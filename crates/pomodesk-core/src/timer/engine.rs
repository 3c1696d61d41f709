//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick(now)`
//! periodically (anything at or under a second works; missed or late ticks
//! cannot drift the countdown because remaining time is derived from an
//! absolute deadline, never decremented).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Idle | Completed)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(durations);
//! engine.start(Utc::now());
//! // In a loop:
//! engine.tick(Utc::now()); // Returns Some(Event::TimerCompleted) when done
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TimerDurations;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Parse a stored mode string, falling back to focus.
    pub fn from_str_lossy(raw: &str) -> TimerMode {
        match raw {
            "short_break" => TimerMode::ShortBreak,
            "long_break" => TimerMode::LongBreak,
            _ => TimerMode::Focus,
        }
    }
}

/// Coarse engine state for display and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Completed,
}

/// The timer's source of truth. `remaining_secs` on the engine is a cached
/// projection of `deadline` while running; it becomes authoritative only
/// once the deadline is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running { deadline: DateTime<Utc> },
    Completed,
}

/// Core timer engine.
///
/// Operates on wall-clock observations -- no internal thread. The caller
/// supplies `now` to every time-sensitive operation, which keeps the engine
/// deterministic under test and immune to host scheduling jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: TimerDurations,
    mode: TimerMode,
    run: RunState,
    /// Remaining seconds. Frozen value while idle; refreshed from the
    /// deadline on every tick/pause while running.
    remaining_secs: u32,
    /// Countdown length the current run started from, in seconds.
    initial_secs: u32,
}

impl TimerEngine {
    /// Create a new engine in focus mode, idle, at the configured duration.
    pub fn new(durations: TimerDurations) -> Self {
        let initial = durations.secs_for(TimerMode::Focus);
        Self {
            durations,
            mode: TimerMode::Focus,
            run: RunState::Idle,
            remaining_secs: initial,
            initial_secs: initial,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match self.run {
            RunState::Idle => TimerState::Idle,
            RunState::Running { .. } => TimerState::Running,
            RunState::Completed => TimerState::Completed,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    /// Remaining seconds as of `now`. Derived from the deadline while
    /// running, the frozen value otherwise.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        match self.run {
            RunState::Running { deadline } => derive_remaining(deadline, now),
            _ => self.remaining_secs,
        }
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.initial_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs(now) as f64 / self.initial_secs as f64)
    }

    /// Build a full state snapshot event as of `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            mode: self.mode,
            remaining_secs: self.remaining_secs(now),
            initial_secs: self.initial_secs,
            progress: self.progress(now),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select `mode` and reload its configured duration.
    ///
    /// Valid in any state. An in-flight deadline is abandoned without a
    /// completion event.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.mode = mode;
        self.run = RunState::Idle;
        self.initial_secs = self.durations.secs_for(mode);
        self.remaining_secs = self.initial_secs;
        Event::ModeSwitched {
            mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Begin (or resume) the countdown from the frozen remaining time.
    ///
    /// Rejected unless idle with time left -- a completed run must be
    /// reset or switched away from first.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.run {
            RunState::Idle if self.remaining_secs > 0 => {
                let deadline = now + chrono::Duration::seconds(i64::from(self.remaining_secs));
                self.run = RunState::Running { deadline };
                Some(Event::TimerStarted {
                    mode: self.mode,
                    duration_secs: self.remaining_secs,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Freeze the countdown at its currently derived remaining time.
    ///
    /// No-op unless running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.run {
            RunState::Running { deadline } => {
                self.remaining_secs = derive_remaining(deadline, now);
                self.run = RunState::Idle;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Return to idle at the full configured duration for the current mode.
    pub fn reset(&mut self) -> Event {
        self.run = RunState::Idle;
        self.initial_secs = self.durations.secs_for(self.mode);
        self.remaining_secs = self.initial_secs;
        Event::TimerReset { at: Utc::now() }
    }

    /// Call periodically while running. Returns `Some(Event::TimerCompleted)`
    /// exactly once, on the tick that observes expiry; later ticks are no-ops
    /// until the engine is started again.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.run {
            RunState::Running { deadline } => {
                self.remaining_secs = derive_remaining(deadline, now);
                if self.remaining_secs == 0 {
                    self.run = RunState::Completed;
                    return Some(Event::TimerCompleted {
                        mode: self.mode,
                        minutes_completed: f64::from(self.initial_secs) / 60.0,
                        at: now,
                    });
                }
                None
            }
            _ => None,
        }
    }

    /// Replace the per-mode duration configuration.
    ///
    /// A running countdown keeps its deadline; the new values take effect
    /// the next time a mode is entered. When idle or completed, the current
    /// mode's duration is re-applied immediately, mirroring the settings
    /// form being saved.
    pub fn update_durations(&mut self, durations: TimerDurations) {
        self.durations = durations;
        if !matches!(self.run, RunState::Running { .. }) {
            self.run = RunState::Idle;
            self.initial_secs = self.durations.secs_for(self.mode);
            self.remaining_secs = self.initial_secs;
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerDurations::default())
    }
}

/// `max(0, ceil((deadline - now) / 1s))`, the one formula the whole engine
/// hangs off.
fn derive_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let ms = (deadline - now).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        ((ms + 999) / 1000) as u32
    }
}
