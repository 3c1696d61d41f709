use chrono::{Local, Utc};
use clap::Subcommand;
use pomodesk_core::storage::Database;
use pomodesk_core::task::Task;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
    },
    /// Mark a task completed
    Done {
        /// Task id (prefix accepted)
        id: String,
    },
    /// Reopen a completed task
    Undone {
        /// Task id (prefix accepted)
        id: String,
    },
    /// List tasks
    List,
    /// Remove a task
    Rm {
        /// Task id (prefix accepted)
        id: String,
    },
}

/// Resolve a possibly-abbreviated task id against the stored list.
fn resolve_id(db: &Database, prefix: &str) -> Result<Task, Box<dyn std::error::Error>> {
    let matches: Vec<Task> = db
        .list_tasks()?
        .into_iter()
        .filter(|t| t.id.starts_with(prefix))
        .collect();
    match matches.len() {
        0 => Err(format!("no task matches id '{prefix}'").into()),
        1 => Ok(matches.into_iter().next().expect("checked length")),
        n => Err(format!("id '{prefix}' is ambiguous ({n} matches)").into()),
    }
}

/// Bump today's `tasks_completed` by `delta`, clamped at zero. Log-only on
/// storage failure; the task row is already updated.
fn bump_daily_tasks(db: &Database, delta: i32) {
    let today = Local::now().date_naive();
    match db.load_daily_log() {
        Ok(mut log) => {
            log.apply(today, 0.0, delta, 0);
            if let Err(err) = db.save_daily_log(&log) {
                tracing::error!(%err, "failed to save daily log");
            }
        }
        Err(err) => tracing::error!(%err, "failed to load daily log"),
    }
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Add { title } => {
            let task = Task::new(title);
            db.insert_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Done { id } => {
            let task = resolve_id(&db, &id)?;
            if !task.completed {
                db.set_task_completed(&task.id, true, Some(Utc::now()))?;
                bump_daily_tasks(&db, 1);
            }
            println!("completed: {}", task.title);
        }
        TaskAction::Undone { id } => {
            let task = resolve_id(&db, &id)?;
            if task.completed {
                db.set_task_completed(&task.id, false, None)?;
                bump_daily_tasks(&db, -1);
            }
            println!("reopened: {}", task.title);
        }
        TaskAction::List => {
            let tasks = db.list_tasks()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Rm { id } => {
            let task = resolve_id(&db, &id)?;
            db.delete_task(&task.id)?;
            println!("removed: {}", task.title);
        }
    }
    Ok(())
}
