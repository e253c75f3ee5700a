use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocuShuttleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail store error: {0}")]
    Mail(#[from] crate::mail::MailError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Forward To email '{0}' is not a valid email address")]
    InvalidRecipient(String),

    #[error("Subject keyword is required")]
    EmptySubjectKeyword,

    #[error("{field} is required")]
    MissingDate { field: &'static str },

    #[error("{field} '{value}' must be in MM/DD/YYYY or YYYY-MM-DD format")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {start} cannot be after end date {end}")]
    StartAfterEnd { start: String, end: String },

    #[error("Local time {value} does not exist in time zone {timezone}")]
    NonexistentLocalTime { value: String, timezone: String },

    #[error("File number prefix '{prefix}' {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Delay '{0}' must be a non-negative number of seconds")]
    InvalidDelay(String),

    #[error("Unknown time zone '{0}'")]
    UnknownTimezone(String),

    #[error("Could not determine a data directory (no home directory)")]
    NoDataDir,
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("Worker thread panicked")]
    Panicked,

    #[error("Run aborted during setup: {0}")]
    Setup(#[from] crate::pipeline::PipelineError),
}

pub type Result<T> = std::result::Result<T, DocuShuttleError>;
