use crossbeam_channel::Sender;

use super::config::RunMode;
use super::context::SearchMatch;

/// Events emitted by the pipeline during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started {
        mode: RunMode,
        total: usize,
        restriction: &'static str,
    },
    /// Free-form status line for display.
    Message(String),
    Skipped {
        position: usize,
        total: usize,
        reason: String,
    },
    ItemFailed {
        position: usize,
        total: usize,
        error: String,
    },
    Matched(SearchMatch),
    Forwarded {
        position: usize,
        total: usize,
        subject: String,
        recipient: String,
        attachments: Vec<String>,
        file_number: Option<String>,
    },
    /// Emitted every [`super::runner::SCAN_REPORT_INTERVAL`] items.
    Scanned { scanned: usize, total: usize },
    Cancelled { scanned: usize },
    Finished { scanned: usize, matched: usize },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to a channel. A dropped receiver is ignored so a closed
/// UI never stops a run.
pub struct ChannelProgress {
    sender: Sender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}
