use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use meetingflow_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.meetingflow/`, or `./.meetingflow/` when no home directory is known.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Ensure `~/.meetingflow/` and `~/.meetingflow/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&app_dir())
}

/// Create `app_dir` and its `logs/` subdirectory, including missing parents.
pub fn ensure_directories_in(app_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("creating {}", app_dir.display()))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to an `EnvFilter` directive.
///
/// Unknown names are passed through so full directives such as
/// `"meetingflow_data=debug"` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.trim().to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.trim().to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` when one is given.
/// Falls back to `"warn"` if the level is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    let stderr_layer = log_file.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Events-path discovery ──────────────────────────────────────────────────────

/// Locate a default events input when `--events` is not given.
pub fn discover_events_path() -> Option<PathBuf> {
    discover_events_path_in(&app_dir())
}

/// Checks, in order, and returns the first that exists:
/// 1. `<app_dir>/events.json`
/// 2. `<app_dir>/events/`
pub fn discover_events_path_in(app_dir: &Path) -> Option<PathBuf> {
    let candidates = [app_dir.join("events.json"), app_dir.join("events")];
    candidates.into_iter().find(|p| p.exists())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
