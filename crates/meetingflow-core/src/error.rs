use std::path::PathBuf;
use thiserror::Error;

/// All errors produced around the MeetingFlow pipeline.
///
/// The cost/summary/insight pipeline itself never fails; these errors come
/// from loading input, validating configuration and building rate tables.
#[derive(Error, Debug)]
pub enum MeetingFlowError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A JSON document parsed but does not have the expected shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A plan name string is not one of the recognised plan types.
    #[error("Invalid plan type: {0}")]
    InvalidPlan(String),

    /// An hourly rate is negative or not a finite number.
    #[error("Invalid hourly rate for role {role}: {rate}")]
    InvalidRate { role: String, rate: f64 },

    /// The rate table does not contain its designated default role.
    #[error("Default role {0} is missing from the rate table")]
    MissingDefaultRole(String),

    /// The events path does not exist.
    #[error("Input path not found: {0}")]
    InputPathNotFound(PathBuf),

    /// No JSON event files were found under the given directory.
    #[error("No JSON files found in {0}")]
    NoInputFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the MeetingFlow crates.
pub type Result<T> = std::result::Result<T, MeetingFlowError>;
