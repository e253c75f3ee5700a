use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "US/Eastern";

/// Raw, string-typed run settings as collected from the user or a saved
/// recipient profile. Validated into a [`FilterConfig`](super::FilterConfig)
/// before any run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub recipient: String,
    pub subject_keyword: String,
    /// `MM/DD/YYYY` or `YYYY-MM-DD`.
    pub start_date: String,
    pub end_date: String,
    /// Comma-separated numeric prefixes, e.g. `"76, 81"`. Empty disables
    /// file-number filtering.
    #[serde(default)]
    pub file_number_prefix: String,
    #[serde(default = "default_true")]
    pub require_attachments: bool,
    #[serde(default = "default_true")]
    pub skip_forwarded: bool,
    #[serde(default)]
    pub delay_seconds: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl RunSettings {
    /// Settings with the same defaults a freshly-deserialized document gets.
    pub fn new(
        recipient: impl Into<String>,
        subject_keyword: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject_keyword: subject_keyword.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            file_number_prefix: String::new(),
            require_attachments: true,
            skip_forwarded: true,
            delay_seconds: 0.0,
            timezone: default_timezone(),
        }
    }
}
