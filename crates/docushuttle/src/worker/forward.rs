use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};
use log::{debug, error, info};

use crate::error::WorkerError;
use crate::mail::MailStore;
use crate::pipeline::{
    CancellationToken, ChannelProgress, Pipeline, PipelineError, ProgressEvent, RunMode,
    RunOutcome, SearchOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutcome {
    Forward(RunOutcome),
    Search(SearchOutcome),
}

impl WorkerOutcome {
    pub fn scanned(&self) -> usize {
        match self {
            WorkerOutcome::Forward(o) => o.scanned,
            WorkerOutcome::Search(o) => o.scanned,
        }
    }

    pub fn cancelled(&self) -> bool {
        match self {
            WorkerOutcome::Forward(o) => o.cancelled,
            WorkerOutcome::Search(o) => o.cancelled,
        }
    }
}

/// Runs one pipeline on a dedicated thread.
///
/// The caller keeps the handle to cancel the run, drain progress events and
/// collect the outcome. Events stay readable after the run has finished.
pub struct ForwardWorker {
    cancel: CancellationToken,
    events: Receiver<ProgressEvent>,
    handle: JoinHandle<Result<WorkerOutcome, PipelineError>>,
}

impl ForwardWorker {
    pub fn spawn(
        pipeline: Pipeline,
        store: Arc<dyn MailStore>,
        mode: RunMode,
    ) -> Result<Self, WorkerError> {
        Self::spawn_with_token(pipeline, store, mode, CancellationToken::new())
    }

    /// Like [`spawn`](Self::spawn), observing an existing token.
    pub fn spawn_with_token(
        pipeline: Pipeline,
        store: Arc<dyn MailStore>,
        mode: RunMode,
        cancel: CancellationToken,
    ) -> Result<Self, WorkerError> {
        let (event_tx, event_rx) = unbounded::<ProgressEvent>();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("docushuttle-{}", mode_name(mode)))
            .spawn(move || {
                debug!("Worker started ({} mode)", mode_name(mode));
                let progress = ChannelProgress::new(event_tx);
                let result = match mode {
                    RunMode::Forward => pipeline
                        .forward(store.as_ref(), &worker_cancel, &progress)
                        .map(WorkerOutcome::Forward),
                    RunMode::Search => pipeline
                        .search(store.as_ref(), &worker_cancel, &progress)
                        .map(WorkerOutcome::Search),
                };
                if let Err(e) = &result {
                    error!("Run aborted: {}", e);
                }
                debug!("Worker stopped");
                result
            })
            .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

        info!("Started {} worker", mode_name(mode));

        Ok(Self {
            cancel,
            events: event_rx,
            handle,
        })
    }

    /// Requests cancellation. The run stops before its next item.
    pub fn cancel(&self) {
        info!("Cancellation requested...");
        self.cancel.cancel();
    }

    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Blocks for the next event. `None` once the run has finished and all
    /// events were drained.
    pub fn recv_event(&self) -> Option<ProgressEvent> {
        self.events.recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<WorkerOutcome, WorkerError> {
        match self.handle.join() {
            Ok(result) => Ok(result?),
            Err(e) => {
                error!("Worker panicked: {:?}", e);
                Err(WorkerError::Panicked)
            }
        }
    }
}

fn mode_name(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Forward => "forward",
        RunMode::Search => "search",
    }
}
