mod durations;
mod engine;

pub use durations::TimerDurations;
pub use engine::{RunState, TimerEngine, TimerMode, TimerState};
