//! Duplicate tracking for forwarded emails.

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::db::{forwarded_repo, Database, DatabaseError};

/// Answers "was this already forwarded to this recipient?" and records
/// forwards. Recipients compare case-insensitively.
pub trait DuplicateTracker: Send + Sync {
    fn has_forwarded(&self, tracking_id: &str, recipient: &str) -> bool;

    fn record_forwarded(&self, tracking_id: &str, recipient: &str, at: DateTime<Utc>);
}

/// SQLite-backed tracker over the `forwarded_emails` table.
///
/// Storage failures never propagate: a failed lookup answers "not
/// forwarded" so delivery proceeds, and a failed write is logged.
#[derive(Clone)]
pub struct ForwardTracker {
    db: Database,
}

impl ForwardTracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Strict lookup that surfaces storage errors.
    pub fn try_has_forwarded(
        &self,
        tracking_id: &str,
        recipient: &str,
    ) -> Result<bool, DatabaseError> {
        forwarded_repo::exists(&self.db, tracking_id, recipient)
    }

    /// Strict upsert that surfaces storage errors.
    pub fn try_record_forwarded(
        &self,
        tracking_id: &str,
        recipient: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        forwarded_repo::upsert(&self.db, tracking_id, recipient, &at.to_rfc3339())
    }

    /// Number of forwards recorded for a recipient.
    pub fn count_for(&self, recipient: &str) -> Result<u64, DatabaseError> {
        forwarded_repo::count_by_recipient(&self.db, recipient)
    }
}

impl DuplicateTracker for ForwardTracker {
    fn has_forwarded(&self, tracking_id: &str, recipient: &str) -> bool {
        match self.try_has_forwarded(tracking_id, recipient) {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    "Duplicate check failed for '{}', assuming not forwarded: {}",
                    tracking_id, e
                );
                false
            }
        }
    }

    fn record_forwarded(&self, tracking_id: &str, recipient: &str, at: DateTime<Utc>) {
        match self.try_record_forwarded(tracking_id, recipient, at) {
            Ok(()) => debug!("Recorded '{}' as forwarded", tracking_id),
            Err(e) => warn!("Failed to record '{}' as forwarded: {}", tracking_id, e),
        }
    }
}
