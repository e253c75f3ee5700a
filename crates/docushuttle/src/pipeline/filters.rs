//! Per-item predicates that do not touch the store.

use std::path::Path;

use regex::Regex;

use crate::config::validate::FILE_NUMBER_LEN;
use crate::error::ConfigError;

/// Case-insensitive substring test, comparing uppercased text. An empty or
/// missing subject never matches.
pub fn subject_matches(subject: Option<&str>, keyword: &str) -> bool {
    match subject {
        Some(subject) if !subject.is_empty() => subject
            .to_uppercase()
            .contains(&keyword.trim().to_uppercase()),
        _ => false,
    }
}

/// File name without its final extension (`"7612345.pdf"` → `"7612345"`).
pub fn attachment_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Finds file numbers: a configured prefix followed by exactly enough ASCII
/// digits to reach seven characters.
#[derive(Debug, Clone)]
pub struct FileNumberMatcher {
    patterns: Vec<Regex>,
}

impl FileNumberMatcher {
    pub fn new(prefixes: &[String]) -> Result<Self, ConfigError> {
        let patterns = prefixes
            .iter()
            .map(|prefix| {
                let digits = FILE_NUMBER_LEN.checked_sub(prefix.len()).ok_or_else(|| {
                    ConfigError::InvalidPrefix {
                        prefix: prefix.clone(),
                        reason: format!("must be at most {} digits", FILE_NUMBER_LEN),
                    }
                })?;
                let pattern = format!("{}[0-9]{{{}}}", regex::escape(prefix), digits);
                Regex::new(&pattern).map_err(|e| ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First match in `text`, trying prefixes in configured order.
    pub fn find_in(&self, text: &str) -> Option<String> {
        self.patterns
            .iter()
            .find_map(|re| re.find(text).map(|m| m.as_str().to_string()))
    }

    /// Searches the first attachment's file stem, then the subject.
    pub fn extract(&self, first_attachment: Option<&str>, subject: &str) -> Option<String> {
        first_attachment
            .and_then(|name| self.find_in(attachment_stem(name)))
            .or_else(|| self.find_in(subject))
    }
}
