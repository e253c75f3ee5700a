//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Logs are meant to be shareable for debugging, so recipients are masked
//! and subjects are cut to a bounded length.

/// Longest subject (in characters) kept in span fields.
pub const MAX_SUBJECT_CHARS: usize = 60;

/// Masks the local part of an address, keeping its first character.
///
/// - `ops@example.com` → `o***@example.com`
/// - `a@b.io` → `a***@b.io`
/// - `not-an-address` → `***`
pub fn redact_recipient(recipient: &str) -> String {
    match recipient.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

/// Cuts a subject to [`MAX_SUBJECT_CHARS`], appending `…` when shortened.
pub fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() <= MAX_SUBJECT_CHARS {
        return subject.to_string();
    }
    let mut out: String = subject.chars().take(MAX_SUBJECT_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_recipient() {
        assert_eq!(redact_recipient("ops@example.com"), "o***@example.com");
        assert_eq!(redact_recipient("  Ops.Team@Example.com "), "O***@Example.com");
        assert_eq!(redact_recipient("a@b.io"), "a***@b.io");
    }

    #[test]
    fn test_redact_recipient_malformed() {
        assert_eq!(redact_recipient("not-an-address"), "***");
        assert_eq!(redact_recipient("@example.com"), "***");
        assert_eq!(redact_recipient("ops@"), "***");
        assert_eq!(redact_recipient(""), "***");
    }

    #[test]
    fn test_truncate_subject_short_unchanged() {
        assert_eq!(truncate_subject("Q1 BILLING INVOICE"), "Q1 BILLING INVOICE");
        assert_eq!(truncate_subject(""), "");
    }

    #[test]
    fn test_truncate_subject_long() {
        let long = "x".repeat(100);
        let out = truncate_subject(&long);
        assert_eq!(out.chars().count(), MAX_SUBJECT_CHARS + 1);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_truncate_subject_multibyte() {
        let long = "é".repeat(MAX_SUBJECT_CHARS + 5);
        let out = truncate_subject(&long);
        assert!(out.starts_with("éé"));
        assert_eq!(out.chars().count(), MAX_SUBJECT_CHARS + 1);
    }
}
