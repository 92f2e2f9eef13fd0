pub mod types;
pub mod config;
pub mod error;
pub mod settings;
pub mod identity;
pub mod week_index;
pub mod standings;
pub mod ledger;
pub mod scores;
pub mod resolver;
pub mod views;
pub mod rounds;
pub mod placements;
pub mod engine;

pub use engine::{build_postseason_brackets, build_report};
pub use error::BracketError;
pub use settings::LeagueSettings;
pub use types::{BracketReport, LeagueSnapshot, PostseasonBrackets};

use config::*;

use std::{
    env,
    fs,
    path::Path,
};
use tracing::{info, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// ── Snapshot in, report out ────────────────────────────────────────────

pub fn load_snapshot(path: &Path) -> Result<LeagueSnapshot, String> {
    let data = fs::read_to_string(path).map_err(|e| format!("read snapshot {}: {e}", path.display()))?;
    serde_json::from_str::<LeagueSnapshot>(&data).map_err(|e| format!("parse snapshot {}: {e}", path.display()))
}

/// Build the report for the configured snapshot and serialize it.
pub fn render_report(config: &RunnerConfig) -> Result<String, String> {
    let snapshot_path = config.snapshot_path.trim();
    if snapshot_path.is_empty() {
        return Err(
            "No snapshot path. Pass one as the first argument, set snapshotPath in brackets.json, or set LEAGUE_SNAPSHOT_PATH.".to_string(),
        );
    }
    let snapshot = load_snapshot(Path::new(snapshot_path))?;
    debug!(
        "loaded snapshot: {} rosters, {} scored weeks, {}+{} bracket matches",
        snapshot.rosters.len(),
        snapshot.matchups.len(),
        snapshot.winners_bracket.len(),
        snapshot.losers_bracket.len()
    );
    let report = build_report(&snapshot).map_err(|e| format!("resolve brackets {snapshot_path}: {e}"))?;
    let payload = if config.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    payload.map_err(|e| e.to_string())
}

pub fn write_report(config: &RunnerConfig, payload: &str) -> Result<(), String> {
    let Some(path) = config.output_file() else {
        println!("{payload}");
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("create output dir {}: {e}", parent.display()))?;
    }
    fs::write(&path, payload).map_err(|e| format!("write report {}: {e}", path.display()))?;
    info!("report written to {}", path.display());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────

/// Daily rolling file when a log directory is configured, stderr otherwise.
/// The returned guard must live until the process is done logging.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).ok();
            let file_appender = tracing_appender::rolling::daily(dir, "brackets.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

pub fn run() -> Result<(), String> {
    if let Ok(cwd) = env::current_dir() {
        load_env_file(&cwd);
    }
    let config = load_runner_config()?.with_snapshot_arg(env::args().nth(1));

    let _guard = init_tracing(config.log_directory().as_deref());
    info!("postseason brackets starting");

    let payload = render_report(&config)?;
    write_report(&config, &payload)
}
