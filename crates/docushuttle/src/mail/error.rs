//! Mail store error types.

use thiserror::Error;

/// Errors raised by a mail store or one of its items.
#[derive(Error, Debug)]
pub enum MailError {
    /// The store (e.g. the desktop mail client) could not be reached.
    #[error("Mail store unavailable: {0}")]
    StoreUnavailable(String),

    /// The Sent Items folder could not be opened.
    #[error("Failed to open folder '{0}'")]
    FolderUnavailable(String),

    /// A server-side restriction was rejected by the store.
    #[error("Restriction '{filter}' failed: {reason}")]
    Restrict { filter: String, reason: String },

    /// Reading a property of a single item failed.
    #[error("Failed to access {property}: {reason}")]
    Attribute {
        property: &'static str,
        reason: String,
    },

    /// Enumerating the next item failed.
    #[error("Failed to enumerate item: {0}")]
    Enumerate(String),

    /// Building or sending the forward failed.
    #[error("Failed to forward email: {0}")]
    Forward(String),
}

impl MailError {
    pub fn attribute(property: &'static str, reason: impl Into<String>) -> Self {
        MailError::Attribute {
            property,
            reason: reason.into(),
        }
    }
}

/// Result type for mail store operations.
pub type Result<T> = std::result::Result<T, MailError>;
