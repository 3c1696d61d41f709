//! SQLite-based session, task, and key-value storage.
//!
//! Provides persistent storage for:
//! - Completed focus/break sessions
//! - The task list
//! - A kv store (engine snapshot, daily-stat document, sync cursor)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::stats::{DailyLog, Session};
use crate::task::Task;
use crate::timer::TimerMode;

use super::data_dir;

/// kv key holding the whole-document daily-stat array.
pub const DAILY_LOG_KEY: &str = "daily_stats";

/// Parse datetime from RFC3339 string with fallback to current time.
fn parse_datetime_fallback(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_session(row: &rusqlite::Row) -> Result<Session, rusqlite::Error> {
    let mode_str: String = row.get(0)?;
    let occurred_str: String = row.get(2)?;
    Ok(Session {
        mode: TimerMode::from_str_lossy(&mode_str),
        duration_minutes: row.get(1)?,
        occurred_at: parse_datetime_fallback(&occurred_str),
    })
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let created_str: String = row.get(3)?;
    let completed_str: Option<String> = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
        created_at: parse_datetime_fallback(&created_str),
        completed_at: completed_str.as_deref().map(parse_datetime_fallback),
    })
}

/// SQLite database for session, task, and kv storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/pomodesk/pomodesk.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("pomodesk.db");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                mode         TEXT NOT NULL,
                duration_min REAL NOT NULL,
                occurred_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id           TEXT PRIMARY KEY,
                title        TEXT NOT NULL,
                completed    INTEGER NOT NULL DEFAULT 0,
                created_at   TEXT NOT NULL,
                completed_at TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Indexes for the day-window and mode-filtered queries
            CREATE INDEX IF NOT EXISTS idx_sessions_occurred_at ON sessions(occurred_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_occurred_at_mode ON sessions(occurred_at, mode);",
        )?;
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Record a completed session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, session: &Session) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO sessions (mode, duration_min, occurred_at) VALUES (?1, ?2, ?3)",
            params![
                session.mode.as_str(),
                session.duration_minutes,
                session.occurred_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All stored sessions, oldest first.
    pub fn all_sessions(&self) -> Result<Vec<Session>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT mode, duration_min, occurred_at FROM sessions ORDER BY occurred_at ASC",
        )?;
        let rows = stmt.query_map([], row_to_session)?;
        rows.collect()
    }

    /// Sessions completed at or after `cutoff`, oldest first.
    pub fn sessions_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Session>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT mode, duration_min, occurred_at FROM sessions
             WHERE occurred_at >= ?1 ORDER BY occurred_at ASC",
        )?;
        let rows = stmt.query_map(params![cutoff.to_rfc3339()], row_to_session)?;
        rows.collect()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Insert a task.
    pub fn insert_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, completed, created_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.id,
                task.title,
                task.completed,
                task.created_at.to_rfc3339(),
                task.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// All tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, completed, created_at, completed_at
             FROM tasks ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], row_to_task)?;
        rows.collect()
    }

    /// Look up one task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, title, completed, created_at, completed_at FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()
    }

    /// Flip a task's completion flag. Returns false if the id is unknown.
    pub fn set_task_completed(
        &self,
        id: &str,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?2, completed_at = ?3 WHERE id = ?1",
            params![id, completed, completed_at.map(|t| t.to_rfc3339())],
        )?;
        Ok(changed > 0)
    }

    /// Delete a task. Returns false if the id is unknown.
    pub fn delete_task(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Daily log document ───────────────────────────────────────────

    /// Load the whole-document daily log. Missing or corrupt blobs come
    /// back as empty history.
    pub fn load_daily_log(&self) -> Result<DailyLog, rusqlite::Error> {
        Ok(match self.kv_get(DAILY_LOG_KEY)? {
            Some(raw) => DailyLog::from_json(&raw),
            None => DailyLog::new(),
        })
    }

    /// Replace the persisted daily log document.
    pub fn save_daily_log(&self, log: &DailyLog) -> Result<(), rusqlite::Error> {
        match log.to_json() {
            Ok(raw) => self.kv_set(DAILY_LOG_KEY, &raw),
            Err(err) => {
                tracing::error!(%err, "failed to serialize daily log; keeping previous document");
                Ok(())
            }
        }
    }
}
