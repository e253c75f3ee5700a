use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::ConfigError;

use super::dates::{parse_date, DateWindow};
use super::schema::RunSettings;
use super::validate::{parse_prefixes, validate_delay, validate_email, validate_prefix};

/// Date ranges longer than this many days are throttled.
pub const LONG_RANGE_DAYS: i64 = 8;

/// Minimum delay between forwards for long date ranges.
pub const LONG_RANGE_MIN_DELAY_SECS: f64 = 3.0;

/// Validated, immutable input for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub recipient: String,
    pub subject_keyword: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub file_number_prefixes: Vec<String>,
    pub require_attachments: bool,
    pub skip_forwarded: bool,
    pub delay_seconds: f64,
    pub timezone: Tz,
}

impl FilterConfig {
    pub fn from_settings(settings: &RunSettings) -> Result<Self, ConfigError> {
        let timezone: Tz = settings
            .timezone
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(settings.timezone.clone()))?;

        let config = Self {
            recipient: settings.recipient.trim().to_string(),
            subject_keyword: settings.subject_keyword.trim().to_string(),
            start_date: parse_date("Start date", &settings.start_date)?,
            end_date: parse_date("End date", &settings.end_date)?,
            file_number_prefixes: parse_prefixes(&settings.file_number_prefix)?,
            require_attachments: settings.require_attachments,
            skip_forwarded: settings.skip_forwarded,
            delay_seconds: settings.delay_seconds,
            timezone,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field. Configs built by hand (rather than through
    /// [`from_settings`](Self::from_settings)) go through this too before a
    /// pipeline accepts them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !validate_email(&self.recipient) {
            return Err(ConfigError::InvalidRecipient(self.recipient.clone()));
        }
        if self.subject_keyword.trim().is_empty() {
            return Err(ConfigError::EmptySubjectKeyword);
        }
        for prefix in &self.file_number_prefixes {
            validate_prefix(prefix)?;
        }
        validate_delay(self.delay_seconds)?;
        // Also rejects start > end.
        self.window()?;
        Ok(())
    }

    pub fn window(&self) -> Result<DateWindow, ConfigError> {
        DateWindow::new(self.start_date, self.end_date, self.timezone)
    }

    /// Calendar days between start and end date.
    pub fn date_range_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn is_long_range(&self) -> bool {
        self.date_range_days() > LONG_RANGE_DAYS
    }

    /// Configured delay, floored at three seconds for long ranges. Values
    /// too large for a [`Duration`] saturate.
    pub fn effective_delay(&self) -> Duration {
        let mut secs = self.delay_seconds;
        if self.is_long_range() {
            secs = secs.max(LONG_RANGE_MIN_DELAY_SECS);
        }
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Inverse of [`from_settings`](Self::from_settings), used when saving a
    /// recipient profile.
    pub fn to_settings(&self) -> RunSettings {
        RunSettings {
            recipient: self.recipient.clone(),
            subject_keyword: self.subject_keyword.clone(),
            start_date: self.start_date.format("%m/%d/%Y").to_string(),
            end_date: self.end_date.format("%m/%d/%Y").to_string(),
            file_number_prefix: self.file_number_prefixes.join(","),
            require_attachments: self.require_attachments,
            skip_forwarded: self.skip_forwarded,
            delay_seconds: self.delay_seconds,
            timezone: self.timezone.name().to_string(),
        }
    }
}
