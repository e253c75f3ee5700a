//! Input validation shared by the loader and recipient profiles.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::ConfigError;

/// Total length of a file number: prefix plus trailing digits.
pub const FILE_NUMBER_LEN: usize = 7;

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

pub fn validate_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

/// Splits a comma-separated prefix list, dropping blank entries.
///
/// Every prefix must be ASCII digits and no longer than a full file number.
pub fn parse_prefixes(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            validate_prefix(p)?;
            Ok(p.to_string())
        })
        .collect()
}

pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "must be numeric".to_string(),
        });
    }
    if prefix.len() > FILE_NUMBER_LEN {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: format!("must be at most {} digits", FILE_NUMBER_LEN),
        });
    }
    Ok(())
}

/// Accepts any non-negative delay a [`Duration`] can hold.
pub fn validate_delay(delay_seconds: f64) -> Result<(), ConfigError> {
    if Duration::try_from_secs_f64(delay_seconds).is_err() {
        return Err(ConfigError::InvalidDelay(delay_seconds.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ops@example.com"));
        assert!(validate_email("first.last+tag@mail.example.co"));
        assert!(!validate_email("ops@example"));
        assert!(!validate_email("not an email"));
        assert!(!validate_email(""));
        assert!(!validate_email("ops@example.c"));
    }

    #[test]
    fn test_parse_prefixes_trims_and_skips_blanks() {
        assert_eq!(parse_prefixes("76, 81,").unwrap(), vec!["76", "81"]);
        assert_eq!(parse_prefixes(" , ").unwrap(), Vec::<String>::new());
        assert!(parse_prefixes("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_prefixes_rejects_non_numeric() {
        let err = parse_prefixes("76,AB").unwrap_err();
        assert!(err.to_string().contains("'AB'"));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_prefix_longer_than_file_number_rejected() {
        assert!(validate_prefix("1234567").is_ok());
        assert!(validate_prefix("12345678").is_err());
    }

    #[test]
    fn test_validate_delay() {
        assert!(validate_delay(0.0).is_ok());
        assert!(validate_delay(2.5).is_ok());
        assert!(validate_delay(-1.0).is_err());
        assert!(validate_delay(f64::NAN).is_err());
        assert!(validate_delay(f64::INFINITY).is_err());
    }

    #[test]
    fn test_delay_beyond_duration_range_rejected() {
        assert!(validate_delay(86_400.0 * 365.0).is_ok());
        assert!(validate_delay(1e20).is_err());
    }
}
