pub mod cancel;
pub mod config;
pub mod context;
pub mod error;
pub mod filters;
pub mod progress;
pub mod runner;
pub mod throttle;

pub use cancel::CancellationToken;
pub use config::{PipelineConfig, RunMode};
pub use context::{ItemContext, SearchMatch, SkipReason};
pub use error::PipelineError;
pub use filters::FileNumberMatcher;
pub use progress::{ChannelProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{Pipeline, RunOutcome, SearchOutcome, SCAN_REPORT_INTERVAL};
pub use throttle::{SleepThrottle, Throttle};
