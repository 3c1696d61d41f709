//! Task list entries.
//!
//! Completing or un-completing a task feeds the daily log's
//! `tasks_completed` counter for the local day; the list itself is plain
//! CRUD through [`crate::storage::Database`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_open_with_unique_id() {
        let a = Task::new("one");
        let b = Task::new("two");
        assert!(!a.completed);
        assert!(a.completed_at.is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn task_serialization() {
        let task = Task::new("write tests");
        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }
}
