pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod pipeline;
pub mod sanitize;
pub mod service;
pub mod worker;

pub use audit::ForwardLog;
pub use config::{load_settings, FilterConfig, RunSettings};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, DocuShuttleError, Result, WorkerError};
pub use mail::{DuplicateTracker, ForwardTracker, MailError, MailItem, MailStore};
pub use pipeline::{
    CancellationToken, Pipeline, PipelineConfig, PipelineError, ProgressEvent, RunMode,
    RunOutcome, SearchMatch, SearchOutcome,
};
pub use service::ForwardService;
pub use worker::{ForwardWorker, WorkerOutcome};
