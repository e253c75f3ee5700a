use std::fmt;

use chrono::{DateTime, FixedOffset};

/// State accumulated while one item moves through the predicate chain.
#[derive(Debug, Clone, Default)]
pub struct ItemContext {
    // Position in the scan (1-based) and the store-reported total
    pub position: usize,
    pub total: usize,

    // Subject step
    pub subject: Option<String>,

    // File number step, only set when prefixes are configured
    pub file_number: Option<String>,

    // Date step
    pub sent_at: Option<DateTime<FixedOffset>>,

    pub attachments: Vec<String>,

    // File number if found, else the store's entry id
    pub tracking_id: Option<String>,
}

impl ItemContext {
    pub fn new(position: usize, total: usize) -> Self {
        Self {
            position,
            total,
            ..Default::default()
        }
    }

    /// Subject used for the forward: the file number when one was
    /// extracted, otherwise the original subject.
    pub fn outgoing_subject(&self) -> String {
        self.file_number
            .clone()
            .or_else(|| self.subject.clone())
            .unwrap_or_default()
    }
}

/// Why an item was not forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotMail,
    SubjectMismatch { subject: String },
    NoFileNumber,
    BeforeStart { sent_at: String },
    AfterEnd { sent_at: String },
    NoAttachments,
    AlreadyForwarded { tracking_id: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotMail => write!(f, "not a mail message"),
            SkipReason::SubjectMismatch { subject } => {
                write!(f, "subject '{}' does not contain the keyword", subject)
            }
            SkipReason::NoFileNumber => write!(f, "no valid file number found"),
            SkipReason::BeforeStart { sent_at } => write!(f, "sent {} before start date", sent_at),
            SkipReason::AfterEnd { sent_at } => write!(f, "sent {} after end date", sent_at),
            SkipReason::NoAttachments => write!(f, "no attachments"),
            SkipReason::AlreadyForwarded { tracking_id } => {
                write!(f, "'{}' previously forwarded", tracking_id)
            }
        }
    }
}

/// One search-mode hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub sent_at: DateTime<FixedOffset>,
    pub subject: String,
    pub file_number: Option<String>,
}

impl fmt::Display for SearchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.sent_at.format("%Y-%m-%d %H:%M:%S"),
            self.subject
        )?;
        if let Some(number) = &self.file_number {
            write!(f, " (File Number: {})", number)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_subject_prefers_file_number() {
        let mut ctx = ItemContext::new(1, 1);
        ctx.subject = Some("Q1 BILLING INVOICE".to_string());
        assert_eq!(ctx.outgoing_subject(), "Q1 BILLING INVOICE");

        ctx.file_number = Some("7612345".to_string());
        assert_eq!(ctx.outgoing_subject(), "7612345");
    }

    #[test]
    fn test_search_match_display() {
        let sent_at = DateTime::parse_from_rfc3339("2024-01-03T09:15:00-05:00").unwrap();
        let with_number = SearchMatch {
            sent_at,
            subject: "Q1 BILLING INVOICE".to_string(),
            file_number: Some("7612345".to_string()),
        };
        assert_eq!(
            with_number.to_string(),
            "[2024-01-03 09:15:00] Q1 BILLING INVOICE (File Number: 7612345)"
        );

        let without = SearchMatch {
            file_number: None,
            ..with_number
        };
        assert_eq!(without.to_string(), "[2024-01-03 09:15:00] Q1 BILLING INVOICE");
    }
}
