use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::{DateWindow, FilterConfig};

use super::error::PipelineError;
use super::filters::FileNumberMatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Forward every matching item.
    Forward,
    /// Report matching items without sending anything.
    Search,
}

/// Everything derived from a [`FilterConfig`] during run setup.
#[derive(Debug)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub window: DateWindow,
    /// True when the window's end was pulled back to the current time.
    pub window_clamped: bool,
    pub effective_delay: Duration,
    pub matcher: FileNumberMatcher,
}

impl PipelineConfig {
    /// Validates the filter and derives the sent-time window, the throttle
    /// delay and the file number matcher. `now` bounds the window's end.
    pub fn prepare(filter: FilterConfig, now: DateTime<Utc>) -> Result<Self, PipelineError> {
        filter.validate()?;

        let mut window = filter.window()?;
        let window_clamped = window.clamp_end(now);
        let effective_delay = filter.effective_delay();
        let matcher = FileNumberMatcher::new(&filter.file_number_prefixes)?;

        Ok(Self {
            filter,
            window,
            window_clamped,
            effective_delay,
            matcher,
        })
    }
}
