pub mod forward;

pub use forward::{ForwardWorker, WorkerOutcome};

// Re-export crossbeam_channel so callers can select over worker events
pub use crossbeam_channel;
