use chrono::{Local, Utc};
use clap::Subcommand;
use pomodesk_core::stats::Session;
use pomodesk_core::storage::{Config, Database};
use pomodesk_core::timer::{TimerDurations, TimerEngine, TimerMode};
use pomodesk_core::Event;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown, keeping remaining time
    Pause,
    /// Reset the current mode to its full duration
    Reset,
    /// Select a mode (focus, short, long)
    Switch {
        /// Target mode
        mode: String,
    },
    /// Print current timer state as JSON (ticks the engine first)
    Status,
    /// Update per-mode durations in minutes
    SetDurations {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long)]
        short: Option<u32>,
        #[arg(long)]
        long: Option<u32>,
    },
}

fn parse_mode(raw: &str) -> Result<TimerMode, Box<dyn std::error::Error>> {
    match raw {
        "focus" => Ok(TimerMode::Focus),
        "short" | "short_break" => Ok(TimerMode::ShortBreak),
        "long" | "long_break" => Ok(TimerMode::LongBreak),
        other => Err(format!("unknown mode '{other}' (expected focus, short, long)").into()),
    }
}

fn load_engine(db: &Database, config: &Config) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
        tracing::warn!("discarding corrupt timer engine snapshot");
    }
    TimerEngine::new(config.timer_durations())
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Persist a just-completed run. Focus sessions land in the session table
/// and the daily log; break completions are not recorded. Storage failures
/// are logged and do not unwind the in-memory completion.
fn record_completion(db: &Database, event: &Event) {
    let Event::TimerCompleted {
        mode,
        minutes_completed,
        at,
    } = event
    else {
        return;
    };
    if *mode != TimerMode::Focus {
        return;
    }

    let session = Session::new(*minutes_completed, *mode, *at);
    if let Err(err) = db.record_session(&session) {
        tracing::error!(%err, "failed to record completed session");
    }

    let today = Local::now().date_naive();
    match db.load_daily_log() {
        Ok(mut log) => {
            log.apply(today, *minutes_completed, 0, 1);
            if let Err(err) = db.save_daily_log(&log) {
                tracing::error!(%err, "failed to save daily log");
            }
        }
        Err(err) => tracing::error!(%err, "failed to load daily log"),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut config = Config::load_or_default();
    let mut engine = load_engine(&db, &config);
    let now = Utc::now();

    match action {
        TimerAction::Start => {
            match engine.start(now) {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => eprintln!("timer not started (already running, or nothing to count down)"),
            }
        }
        TimerAction::Pause => match engine.pause(now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => eprintln!("timer is not running"),
        },
        TimerAction::Reset => {
            let event = engine.reset();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Switch { mode } => {
            let event = engine.switch_mode(parse_mode(&mode)?);
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TimerAction::Status => {
            if let Some(event) = engine.tick(now) {
                record_completion(&db, &event);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            let snapshot = engine.snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::SetDurations { focus, short, long } => {
            let current = engine.durations();
            let durations = TimerDurations {
                focus_min: focus.unwrap_or(current.focus_min),
                short_break_min: short.unwrap_or(current.short_break_min),
                long_break_min: long.unwrap_or(current.long_break_min),
            };
            if durations.focus_min == 0
                || durations.short_break_min == 0
                || durations.long_break_min == 0
            {
                return Err("durations must be at least one minute".into());
            }
            engine.update_durations(durations);
            config.durations.focus = durations.focus_min;
            config.durations.short_break = durations.short_break_min;
            config.durations.long_break = durations.long_break_min;
            config.save()?;
            let snapshot = engine.snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
