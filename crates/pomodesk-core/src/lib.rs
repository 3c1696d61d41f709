//! # Pomodesk Core Library
//!
//! This library provides the core business logic for the Pomodesk focus
//! timer. All operations are available via a standalone CLI binary; any GUI
//! is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a deadline-based state machine. The caller supplies
//!   the clock: `tick(now)` is invoked periodically and remaining time is
//!   derived from an absolute deadline, so delayed or missed ticks cannot
//!   drift the countdown.
//! - **Stats**: pure aggregation of completed focus sessions into
//!   today/weekly/streak views, plus the incrementally-maintained daily log
//!   used by the local whole-document persistence path.
//! - **Storage**: SQLite session/task storage and TOML-based configuration.
//! - **Remote**: client for a hosted CRUD session table keyed by user
//!   identity.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`Database`]: session, task, and kv persistence
//! - [`Config`]: application configuration management
//! - [`RemoteStore`]: hosted session table client

pub mod error;
pub mod events;
pub mod quotes;
pub mod remote;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, RemoteError};
pub use events::Event;
pub use quotes::{Quote, QuoteDeck};
pub use remote::RemoteStore;
pub use stats::{DailyLog, DailyStat, Session, StreakSummary};
pub use storage::{Config, Database, RemoteConfig};
pub use task::Task;
pub use timer::{TimerDurations, TimerEngine, TimerMode, TimerState};
