//! Server-side subject restrictions.
//!
//! Stores try these strategies in order: a DASL phrase match, a DASL `LIKE`
//! substring match, and finally no restriction with client-side filtering
//! only.

/// Escapes a value for embedding in a restriction filter string.
///
/// Single quotes are doubled and percent signs are escaped, so a keyword
/// cannot terminate the quoted literal or inject wildcards.
pub fn sanitize_filter_value(value: &str) -> String {
    value.replace('\'', "''").replace('%', "%%")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRestriction {
    /// Case-insensitive phrase match on the subject.
    Phrase(String),
    /// Substring match on the subject.
    Like(String),
    /// No restriction.
    All,
}

impl SubjectRestriction {
    /// The fallback chain for a keyword, most selective first.
    pub fn fallback_chain(keyword: &str) -> [SubjectRestriction; 3] {
        [
            SubjectRestriction::Phrase(keyword.to_string()),
            SubjectRestriction::Like(keyword.to_string()),
            SubjectRestriction::All,
        ]
    }

    /// Renders the restriction in Outlook's filter syntax.
    pub fn filter_string(&self) -> Option<String> {
        match self {
            SubjectRestriction::Phrase(keyword) => Some(format!(
                "@SQL=\"urn:schemas:httpmail:subject\" ci_phrasematch '{}'",
                sanitize_filter_value(keyword)
            )),
            SubjectRestriction::Like(keyword) => Some(format!(
                "@SQL=\"urn:schemas:httpmail:subject\" LIKE '%{}%'",
                sanitize_filter_value(keyword)
            )),
            SubjectRestriction::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubjectRestriction::Phrase(_) => "DASL",
            SubjectRestriction::Like(_) => "LIKE",
            SubjectRestriction::All => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filter_value() {
        assert_eq!(sanitize_filter_value("O'Brien 100%"), "O''Brien 100%%");
        assert_eq!(sanitize_filter_value(""), "");
        assert_eq!(sanitize_filter_value("INVOICE"), "INVOICE");
    }

    #[test]
    fn test_phrase_filter_string() {
        let r = SubjectRestriction::Phrase("Bob's INVOICE".to_string());
        assert_eq!(
            r.filter_string().unwrap(),
            "@SQL=\"urn:schemas:httpmail:subject\" ci_phrasematch 'Bob''s INVOICE'"
        );
    }

    #[test]
    fn test_like_filter_string() {
        let r = SubjectRestriction::Like("50% off".to_string());
        assert_eq!(
            r.filter_string().unwrap(),
            "@SQL=\"urn:schemas:httpmail:subject\" LIKE '%50%% off%'"
        );
        assert_eq!(SubjectRestriction::All.filter_string(), None);
    }

    #[test]
    fn test_fallback_chain_order() {
        let chain = SubjectRestriction::fallback_chain("INVOICE");
        let labels: Vec<_> = chain.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["DASL", "LIKE", "none"]);
    }
}
