use thiserror::Error;

/// Errors that abort a run before any item is processed.
///
/// Failures on individual items never surface here; they are logged and the
/// item is skipped.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::error::ConfigError),

    #[error("Cannot open Sent Items: {0}")]
    Store(#[source] crate::mail::MailError),

    #[error("No item view available: {0}")]
    NoItems(#[source] crate::mail::MailError),
}
