use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{MeetingFlowError, Result};
use crate::plans::PlanType;

/// Directory under the home directory holding MeetingFlow state.
pub const APP_DIR_NAME: &str = ".meetingflow";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Estimate what your calendar meetings cost
#[derive(Parser, Debug, Clone)]
#[command(
    name = "meetingflow",
    about = "Estimate what your calendar meetings cost",
    version
)]
pub struct Settings {
    /// Events JSON file or directory of JSON files
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Role assignments JSON file (email -> role)
    #[arg(long)]
    pub roles: Option<PathBuf>,

    /// Hourly rate overrides JSON file (role -> rate)
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// Role billed for unassigned attendees
    #[arg(long, default_value = "engineer")]
    pub default_role: String,

    /// Reporting window in days (metadata only)
    #[arg(long)]
    pub days: Option<f64>,

    /// Plan type
    #[arg(long, default_value = "pro", value_parser = ["free", "pro"])]
    pub plan: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Timezone for timestamps without an offset ("auto" = system)
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Number of insight bullets in the text report
    #[arg(long, default_value = "3")]
    pub top_insights: usize,

    /// Logging level
    #[arg(
        long,
        default_value = "WARNING",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.meetingflow/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<PathBuf>,
}

impl LastUsedParams {
    /// `~/.meetingflow/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params; `Default` when the file is absent or unreadable.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Write params atomically (temp file + rename), creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and merge last-used params.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation with explicit args and config path.
    ///
    /// Values given on the command line always win over persisted ones.
    /// `plan`, `events`, `roles` and `days` are never restored from disk.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Could not clear {}: {}", config_path.display(), e);
            }
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // clap ids use the field name (underscores), not the flag spelling.
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "default_role") {
            if let Some(v) = last.default_role {
                settings.default_role = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "rates") && settings.rates.is_none() {
            settings.rates = last.rates;
        }

        Self::resolve_auto_values(settings)
    }

    /// Persist the last-used params to `~/.meetingflow/last_used.json`.
    pub fn save_last_used(&self) -> Result<()> {
        self.save_last_used_to(&LastUsedParams::config_path())
    }

    /// Persist the last-used params to `config_path`.
    ///
    /// Values that fail [`Settings::validate`] are never written. Call this
    /// only once a run has succeeded. A `--clear` run writes nothing.
    pub fn save_last_used_to(&self, config_path: &std::path::Path) -> Result<()> {
        if self.clear {
            return Ok(());
        }
        self.validate()?;
        LastUsedParams::from(self).save_to(config_path)
    }

    /// Resolve `"auto"` timezone and apply `--debug`.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        settings.timezone = crate::time_utils::resolve_timezone_name(&settings.timezone);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// The selected plan as a typed value.
    pub fn plan_type(&self) -> Result<PlanType> {
        self.plan.parse()
    }

    /// Check values clap cannot validate on its own.
    pub fn validate(&self) -> Result<()> {
        if !crate::time_utils::validate_timezone(&self.timezone) {
            return Err(MeetingFlowError::Config(format!(
                "unknown timezone \"{}\"",
                self.timezone
            )));
        }
        if self.default_role.trim().is_empty() {
            return Err(MeetingFlowError::Config(
                "default role must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            timezone: Some(s.timezone.clone()),
            format: Some(s.format.clone()),
            default_role: Some(s.default_role.clone()),
            rates: s.rates.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
