use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use pomodesk_core::remote::RemoteStore;
use pomodesk_core::storage::{Config, Database};

const CURSOR_KEY: &str = "sync_cursor";

#[derive(Subcommand)]
pub enum SyncAction {
    /// Push locally recorded sessions newer than the sync cursor
    Push,
    /// Fetch a recent window of remote sessions and print it
    Pull {
        /// Window size in days
        #[arg(long, default_value = "7")]
        days: i64,
    },
}

fn load_cursor(db: &Database) -> Option<DateTime<Utc>> {
    let raw = db.kv_get(CURSOR_KEY).ok().flatten()?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let remote_cfg = config
        .remote
        .as_ref()
        .ok_or("remote store is not configured (set the [remote] section)")?;
    let store = RemoteStore::new(remote_cfg)?;
    let db = Database::open()?;
    let rt = tokio::runtime::Runtime::new()?;

    match action {
        SyncAction::Push => {
            let cursor = load_cursor(&db);
            let pending: Vec<_> = match cursor {
                Some(cursor) => db
                    .sessions_since(cursor)?
                    .into_iter()
                    .filter(|s| s.occurred_at > cursor)
                    .collect(),
                None => db.all_sessions()?,
            };

            if pending.is_empty() {
                println!("nothing to push");
                return Ok(());
            }

            // At-most-once effort: stop on the first failure and advance the
            // cursor only past what was actually accepted.
            let mut pushed = 0usize;
            let mut last_ok: Option<DateTime<Utc>> = None;
            for session in &pending {
                match rt.block_on(store.insert_session(session)) {
                    Ok(()) => {
                        pushed += 1;
                        last_ok = Some(session.occurred_at);
                    }
                    Err(err) => {
                        tracing::error!(%err, "push failed; will retry remaining sessions next run");
                        break;
                    }
                }
            }

            if let Some(ts) = last_ok {
                db.kv_set(CURSOR_KEY, &ts.to_rfc3339())?;
            }
            println!("pushed {pushed}/{} sessions", pending.len());
        }
        SyncAction::Pull { days } => {
            let to = Utc::now();
            let from = to - Duration::days(days.max(0));
            let sessions = rt.block_on(store.sessions_between(from, to))?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
