//! Test harness for isolated pipeline runs.
//!
//! The `TestHarness` struct provides:
//! - A temp-dir data directory with a file-backed database and audit log
//! - An in-memory mail store shared with every run
//! - A throttle that records delays instead of sleeping

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use docushuttle::config::RunSettings;
use docushuttle::mail::{ForwardTracker, MemoryMailStore, MemoryMessage};
use docushuttle::pipeline::{
    CancellationToken, Pipeline, ProgressEvent, ProgressReporter, RunOutcome, SearchOutcome,
    Throttle,
};
use docushuttle::service::ForwardService;

/// Fixed "now" used for window clamping, well after the test dates.
pub fn test_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[derive(Default)]
pub struct RecordingThrottle {
    pub waits: Mutex<Vec<Duration>>,
}

impl Throttle for RecordingThrottle {
    fn wait(&self, delay: Duration) {
        self.waits.lock().unwrap().push(delay);
    }
}

/// Collects every event. Optionally cancels the run after the N-th
/// `Forwarded` event.
pub struct RecordingProgress {
    pub events: Mutex<Vec<ProgressEvent>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    pub fn cancelling_after(forwards: usize, token: CancellationToken) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_after: Some((forwards, token)),
        }
    }

    pub fn forwarded_subjects(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Forwarded { subject, .. } => Some(subject.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        if let Some((limit, token)) = &self.cancel_after {
            let forwarded = events
                .iter()
                .filter(|e| matches!(e, ProgressEvent::Forwarded { .. }))
                .count();
            if forwarded >= *limit {
                token.cancel();
            }
        }
    }
}

/// Test harness providing an isolated environment for integration tests.
pub struct TestHarness {
    temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub service: ForwardService,
    pub store: MemoryMailStore,
    pub throttle: Arc<RecordingThrottle>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("data");
        let service = ForwardService::open(&data_dir).expect("Failed to open service");

        Self {
            temp_dir,
            data_dir,
            service,
            store: MemoryMailStore::new(),
            throttle: Arc::new(RecordingThrottle::default()),
        }
    }

    pub fn with_messages(messages: impl IntoIterator<Item = MemoryMessage>) -> Self {
        let harness = Self::new();
        for message in messages {
            harness.store.push(message);
        }
        harness
    }

    pub fn tracker(&self) -> ForwardTracker {
        self.service.tracker()
    }

    pub fn pipeline(&self, settings: &RunSettings) -> Pipeline {
        self.service
            .prepare(settings, test_now())
            .expect("settings should be valid")
            .with_throttle(self.throttle.clone())
    }

    pub fn forward(&self, settings: &RunSettings) -> (RunOutcome, RecordingProgress) {
        let progress = RecordingProgress::new();
        let outcome = self
            .pipeline(settings)
            .forward(&self.store, &CancellationToken::new(), &progress)
            .expect("run should start");
        (outcome, progress)
    }

    pub fn forward_cancelling_after(
        &self,
        settings: &RunSettings,
        forwards: usize,
    ) -> (RunOutcome, RecordingProgress) {
        let cancel = CancellationToken::new();
        let progress = RecordingProgress::cancelling_after(forwards, cancel.clone());
        let outcome = self
            .pipeline(settings)
            .forward(&self.store, &cancel, &progress)
            .expect("run should start");
        (outcome, progress)
    }

    pub fn search(&self, settings: &RunSettings) -> SearchOutcome {
        self.pipeline(settings)
            .search(&self.store, &CancellationToken::new(), &RecordingProgress::new())
            .expect("run should start")
    }

    pub fn forward_log(&self) -> String {
        std::fs::read_to_string(self.data_dir.join(docushuttle::config::paths::FORWARD_LOG_FILE))
            .unwrap_or_default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.throttle.waits.lock().unwrap().clone()
    }
}
