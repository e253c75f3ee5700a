//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use docushuttle::config::RunSettings;
use docushuttle::mail::MemoryMessage;

pub const RECIPIENT: &str = "ops@example.com";

/// Builder for [`RunSettings`], starting from a short January 2024 range.
pub struct SettingsBuilder {
    settings: RunSettings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: RunSettings::new(RECIPIENT, "BILLING INVOICE", "01/01/2024", "01/05/2024"),
        }
    }

    pub fn recipient(mut self, recipient: &str) -> Self {
        self.settings.recipient = recipient.to_string();
        self
    }

    pub fn keyword(mut self, keyword: &str) -> Self {
        self.settings.subject_keyword = keyword.to_string();
        self
    }

    pub fn dates(mut self, start: &str, end: &str) -> Self {
        self.settings.start_date = start.to_string();
        self.settings.end_date = end.to_string();
        self
    }

    pub fn prefixes(mut self, prefixes: &str) -> Self {
        self.settings.file_number_prefix = prefixes.to_string();
        self
    }

    pub fn require_attachments(mut self, value: bool) -> Self {
        self.settings.require_attachments = value;
        self
    }

    pub fn skip_forwarded(mut self, value: bool) -> Self {
        self.settings.skip_forwarded = value;
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.settings.delay_seconds = seconds;
        self
    }

    pub fn timezone(mut self, tz: &str) -> Self {
        self.settings.timezone = tz.to_string();
        self
    }

    pub fn build(self) -> RunSettings {
        self.settings
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A sent time in US Eastern standard time (UTC-5).
pub fn eastern(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let local = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap();
    offset.from_local_datetime(&local).unwrap()
}

/// Matching message with one attachment named after its file number.
pub fn invoice(subject: &str, file_number: &str, sent_at: DateTime<FixedOffset>) -> MemoryMessage {
    MemoryMessage::new(subject, sent_at).with_attachment(format!("{}.pdf", file_number))
}

/// `count` matching messages, one per minute on January 3rd 2024, with file
/// numbers `7600000`, `7600001`, ...
pub fn invoice_batch(count: u32) -> Vec<MemoryMessage> {
    (0..count)
        .map(|i| {
            invoice(
                "BILLING INVOICE",
                &format!("76{:05}", i),
                eastern(2024, 1, 3, 9 + i / 60, i % 60, 0),
            )
        })
        .collect()
}
