use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, info_span, warn};

use crate::audit::ForwardLog;
use crate::mail::{DuplicateTracker, ItemSet, MailError, MailItem, MailStore, SubjectRestriction};
use crate::sanitize;

use super::cancel::CancellationToken;
use super::config::{PipelineConfig, RunMode};
use super::context::{ItemContext, SearchMatch, SkipReason};
use super::error::PipelineError;
use super::filters::subject_matches;
use super::progress::{ProgressEvent, ProgressReporter};
use super::throttle::{SleepThrottle, Throttle};

/// A `Scanned` progress event is emitted every this many items.
pub const SCAN_REPORT_INTERVAL: usize = 100;

/// Result of a forward-mode run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub scanned: usize,
    pub forwarded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub effective_delay: Duration,
    /// Hints for the user when nothing was forwarded.
    pub suggestions: Vec<String>,
}

/// Result of a search-mode run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub scanned: usize,
    pub matches: Vec<SearchMatch>,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Default)]
struct ScanTotals {
    scanned: usize,
    matched: usize,
    skipped: usize,
    failed: usize,
    cancelled: bool,
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    tracker: Arc<dyn DuplicateTracker>,
    forward_log: Option<ForwardLog>,
    throttle: Arc<dyn Throttle>,
}

impl Pipeline {
    pub fn new(config: Arc<PipelineConfig>, tracker: Arc<dyn DuplicateTracker>) -> Self {
        Self {
            config,
            tracker,
            forward_log: None,
            throttle: Arc::new(SleepThrottle),
        }
    }

    /// Appends every forwarded subject to `log`.
    pub fn with_forward_log(mut self, log: ForwardLog) -> Self {
        self.forward_log = Some(log);
        self
    }

    /// Replaces the sleeping throttle, e.g. to record delays in tests.
    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scans Sent Items and forwards every item that passes the filter chain.
    pub fn forward(
        &self,
        store: &dyn MailStore,
        cancel: &CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<RunOutcome, PipelineError> {
        let filter = &self.config.filter;
        let recipient = sanitize::redact_recipient(&filter.recipient);
        let _run_span = info_span!("forward_run",
            recipient = %recipient,
            keyword = %sanitize::truncate_subject(&filter.subject_keyword),
        )
        .entered();

        if let Some(account) = store.account_name() {
            progress.report(ProgressEvent::Message(format!(
                "Accessing mail account: {}",
                account
            )));
        }
        if filter.is_long_range() {
            let message = format!(
                "Date range of {} days. Using {:.1}-second delay.",
                filter.date_range_days(),
                self.config.effective_delay.as_secs_f64()
            );
            info!("{}", message);
            progress.report(ProgressEvent::Message(message));
        }

        let totals = self.scan(RunMode::Forward, store, cancel, progress, |ctx, item| {
            self.deliver(ctx, item, progress)
        })?;

        let message = if totals.cancelled {
            format!(
                "Operation cancelled. Scanned {}, forwarded {}.",
                totals.scanned, totals.matched
            )
        } else {
            format!(
                "Scanned {} emails, forwarded {}.",
                totals.scanned, totals.matched
            )
        };
        info!("{}", message);
        progress.report(ProgressEvent::Message(message));

        let suggestions = if totals.matched == 0 && !totals.cancelled {
            self.suggestions(RunMode::Forward)
        } else {
            Vec::new()
        };
        for hint in &suggestions {
            progress.report(ProgressEvent::Message(hint.clone()));
        }

        Ok(RunOutcome {
            scanned: totals.scanned,
            forwarded: totals.matched,
            skipped: totals.skipped,
            failed: totals.failed,
            cancelled: totals.cancelled,
            effective_delay: self.config.effective_delay,
            suggestions,
        })
    }

    /// Scans Sent Items and reports matching items without forwarding.
    pub fn search(
        &self,
        store: &dyn MailStore,
        cancel: &CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<SearchOutcome, PipelineError> {
        let _run_span = info_span!("search_run",
            keyword = %sanitize::truncate_subject(&self.config.filter.subject_keyword),
        )
        .entered();

        let mut matches = Vec::new();
        let totals = self.scan(RunMode::Search, store, cancel, progress, |ctx, _item| {
            let hit = SearchMatch {
                sent_at: ctx
                    .sent_at
                    .ok_or_else(|| MailError::attribute("SentOn", "not read"))?,
                subject: ctx.subject.clone().unwrap_or_default(),
                file_number: ctx.file_number.clone(),
            };
            progress.report(ProgressEvent::Matched(hit.clone()));
            matches.push(hit);
            Ok(())
        })?;

        info!(
            "Search complete: scanned {} emails, found {} matches",
            totals.scanned,
            matches.len()
        );

        let suggestions = if matches.is_empty() && !totals.cancelled {
            self.suggestions(RunMode::Search)
        } else {
            Vec::new()
        };
        for hint in &suggestions {
            progress.report(ProgressEvent::Message(hint.clone()));
        }

        Ok(SearchOutcome {
            scanned: totals.scanned,
            matches,
            skipped: totals.skipped,
            failed: totals.failed,
            cancelled: totals.cancelled,
            suggestions,
        })
    }

    fn scan<F>(
        &self,
        mode: RunMode,
        store: &dyn MailStore,
        cancel: &CancellationToken,
        progress: &dyn ProgressReporter,
        mut on_match: F,
    ) -> Result<ScanTotals, PipelineError>
    where
        F: FnMut(&ItemContext, &dyn MailItem) -> Result<(), MailError>,
    {
        let (restriction, set) = {
            let _step = info_span!("open_sent_items").entered();
            self.open_items(store, progress)?
        };
        let total = set.total;

        if self.config.window_clamped {
            warn!(
                "End date is in the future; scanning up to {}",
                self.config.window.end().format("%Y-%m-%d %H:%M:%S %Z")
            );
        }
        progress.report(ProgressEvent::Started {
            mode,
            total,
            restriction: restriction.label(),
        });
        progress.report(ProgressEvent::Message(format!(
            "Scanning {} emails...",
            total
        )));

        let mut totals = ScanTotals::default();
        for (index, next) in set.items.enumerate() {
            if cancel.is_cancelled() {
                info!("Cancellation requested after {} items", totals.scanned);
                totals.cancelled = true;
                progress.report(ProgressEvent::Cancelled {
                    scanned: totals.scanned,
                });
                break;
            }

            let position = index + 1;
            totals.scanned += 1;
            let _item_span = info_span!("item", position, total).entered();

            let mut ctx = ItemContext::new(position, total);
            let result = next.and_then(|item| match self.evaluate(mode, item.as_ref(), &mut ctx)? {
                Some(reason) => Ok(Some(reason)),
                None => on_match(&ctx, item.as_ref()).map(|_| None),
            });

            match result {
                Ok(None) => totals.matched += 1,
                Ok(Some(reason)) => {
                    debug!("Email {}/{} skipped: {}", position, total, reason);
                    totals.skipped += 1;
                    progress.report(ProgressEvent::Skipped {
                        position,
                        total,
                        reason: reason.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Email {}/{}: {}", position, total, e);
                    totals.failed += 1;
                    progress.report(ProgressEvent::ItemFailed {
                        position,
                        total,
                        error: e.to_string(),
                    });
                }
            }

            if position % SCAN_REPORT_INTERVAL == 0 {
                progress.report(ProgressEvent::Scanned {
                    scanned: position,
                    total,
                });
            }
        }

        progress.report(ProgressEvent::Finished {
            scanned: totals.scanned,
            matched: totals.matched,
        });
        Ok(totals)
    }

    /// Opens Sent Items and applies the most selective restriction the
    /// store accepts.
    fn open_items(
        &self,
        store: &dyn MailStore,
        progress: &dyn ProgressReporter,
    ) -> Result<(SubjectRestriction, ItemSet), PipelineError> {
        let folder = store.open_sent_items().map_err(PipelineError::Store)?;
        match folder.count() {
            Ok(count) => progress.report(ProgressEvent::Message(format!(
                "Sent Items folder contains {} emails.",
                count
            ))),
            Err(e) => warn!("Could not count Sent Items: {}", e),
        }

        let mut last_error = None;
        for restriction in SubjectRestriction::fallback_chain(&self.config.filter.subject_keyword) {
            match folder.restrict(&restriction) {
                Ok(set) => {
                    debug!(
                        "Using {} restriction ({} items)",
                        restriction.label(),
                        set.total
                    );
                    return Ok((restriction, set));
                }
                Err(e) => {
                    warn!("{} restriction failed, trying next: {}", restriction.label(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(PipelineError::NoItems(last_error.unwrap_or_else(|| {
            MailError::FolderUnavailable("Sent Items".to_string())
        })))
    }

    /// Runs the predicate chain. Returns the first failing predicate, or
    /// `None` when the item passes.
    fn evaluate(
        &self,
        mode: RunMode,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        if let Some(reason) = self.step_class(item)? {
            return Ok(Some(reason));
        }
        if let Some(reason) = self.step_subject(item, ctx)? {
            return Ok(Some(reason));
        }
        if let Some(reason) = self.step_file_number(item, ctx)? {
            return Ok(Some(reason));
        }
        if let Some(reason) = self.step_date(item, ctx)? {
            return Ok(Some(reason));
        }
        if mode == RunMode::Forward {
            if let Some(reason) = self.step_attachments(item, ctx)? {
                return Ok(Some(reason));
            }
        }
        self.step_duplicate(item, ctx)
    }

    fn step_class(&self, item: &dyn MailItem) -> Result<Option<SkipReason>, MailError> {
        Ok((!item.class()?.is_mail()).then_some(SkipReason::NotMail))
    }

    fn step_subject(
        &self,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        let subject = item.subject()?;
        let matched = subject_matches(subject.as_deref(), &self.config.filter.subject_keyword);
        ctx.subject = subject;
        if matched {
            Ok(None)
        } else {
            Ok(Some(SkipReason::SubjectMismatch {
                subject: sanitize::truncate_subject(ctx.subject.as_deref().unwrap_or("")),
            }))
        }
    }

    fn step_file_number(
        &self,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        if self.config.matcher.is_empty() {
            return Ok(None);
        }
        ctx.attachments = item.attachment_names()?;
        let subject = ctx.subject.as_deref().unwrap_or("");
        ctx.file_number = self
            .config
            .matcher
            .extract(ctx.attachments.first().map(String::as_str), subject);
        Ok(ctx.file_number.is_none().then_some(SkipReason::NoFileNumber))
    }

    fn step_date(
        &self,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        let sent_at = item.sent_at()?;
        ctx.sent_at = Some(sent_at);
        let window = &self.config.window;
        if window.contains(&sent_at) {
            return Ok(None);
        }
        let shown = sent_at.format("%Y-%m-%d %H:%M:%S").to_string();
        if window.is_before(&sent_at) {
            Ok(Some(SkipReason::BeforeStart { sent_at: shown }))
        } else {
            Ok(Some(SkipReason::AfterEnd { sent_at: shown }))
        }
    }

    fn step_attachments(
        &self,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        // Already read when prefixes are configured.
        if self.config.matcher.is_empty() {
            ctx.attachments = item.attachment_names()?;
        }
        let missing = self.config.filter.require_attachments && ctx.attachments.is_empty();
        Ok(missing.then_some(SkipReason::NoAttachments))
    }

    fn step_duplicate(
        &self,
        item: &dyn MailItem,
        ctx: &mut ItemContext,
    ) -> Result<Option<SkipReason>, MailError> {
        let tracking_id = match &ctx.file_number {
            Some(number) => number.clone(),
            None => item.entry_id()?,
        };
        ctx.tracking_id = Some(tracking_id.clone());

        let filter = &self.config.filter;
        if filter.skip_forwarded && self.tracker.has_forwarded(&tracking_id, &filter.recipient) {
            return Ok(Some(SkipReason::AlreadyForwarded { tracking_id }));
        }
        Ok(None)
    }

    /// Sends the forward and records it. Only a failed send is an error;
    /// tracking and audit failures are logged.
    fn deliver(
        &self,
        ctx: &ItemContext,
        item: &dyn MailItem,
        progress: &dyn ProgressReporter,
    ) -> Result<(), MailError> {
        let _step = info_span!("deliver").entered();
        let filter = &self.config.filter;
        let subject = ctx.outgoing_subject();

        item.forward(&filter.recipient, &subject)?;
        let now = Utc::now();
        info!("Forwarded: {}", sanitize::truncate_subject(&subject));

        progress.report(ProgressEvent::Forwarded {
            position: ctx.position,
            total: ctx.total,
            subject: subject.clone(),
            recipient: filter.recipient.clone(),
            attachments: ctx.attachments.clone(),
            file_number: ctx.file_number.clone(),
        });

        if let Some(tracking_id) = &ctx.tracking_id {
            self.tracker.record_forwarded(tracking_id, &filter.recipient, now);
        }

        if let Some(log) = &self.forward_log {
            if let Err(e) = log.append(&subject, now) {
                warn!(
                    "Failed to append to forward log {}: {}",
                    log.path().display(),
                    e
                );
            }
        }

        let delay = self.config.effective_delay;
        if !delay.is_zero() {
            self.throttle.wait(delay);
        }
        Ok(())
    }

    fn suggestions(&self, mode: RunMode) -> Vec<String> {
        let filter = &self.config.filter;
        let mut hints = vec![format!(
            "No emails matched the criteria (subject containing '{}', date range: {} to {}).",
            filter.subject_keyword,
            filter.start_date.format("%m/%d/%Y"),
            filter.end_date.format("%m/%d/%Y"),
        )];
        if mode == RunMode::Forward && filter.require_attachments {
            hints.push(
                "Suggestion: Uncheck 'Require Attachments' to include emails without attachments."
                    .to_string(),
            );
        }
        if filter.skip_forwarded {
            hints.push(
                "Suggestion: Uncheck 'Skip Previously Forwarded Emails' to include previously forwarded emails."
                    .to_string(),
            );
        }
        if !filter.file_number_prefixes.is_empty() {
            hints.push(format!(
                "Suggestion: Verify the file number prefixes {} match attachment filenames or subjects.",
                filter.file_number_prefixes.join(", ")
            ));
        }
        hints.push(format!(
            "Suggestion: Verify the subject keyword '{}' matches the email subjects in Sent Items.",
            filter.subject_keyword
        ));
        hints
    }
}
