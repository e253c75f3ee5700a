//! Narrow views over an external mail store.

use chrono::{DateTime, FixedOffset};

use super::error::Result;
use super::query::SubjectRestriction;

/// Outlook's `olMail` object class.
pub const OUTLOOK_MAIL_CLASS: u32 = 43;

/// Kind of entry yielded by a folder. Stores may yield receipts, meeting
/// requests and similar entries alongside genuine messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    Mail,
    Other(u32),
}

impl ItemClass {
    pub fn from_outlook(code: u32) -> Self {
        if code == OUTLOOK_MAIL_CLASS {
            ItemClass::Mail
        } else {
            ItemClass::Other(code)
        }
    }

    pub fn is_mail(&self) -> bool {
        matches!(self, ItemClass::Mail)
    }
}

/// Read-only projection of one item plus its forward capability.
///
/// Every accessor is fallible: property reads on a live store can fail for
/// a single item without the store as a whole being broken.
pub trait MailItem: Send {
    fn class(&self) -> Result<ItemClass>;

    /// `None` when the item has no subject at all.
    fn subject(&self) -> Result<Option<String>>;

    fn sent_at(&self) -> Result<DateTime<FixedOffset>>;

    /// Attachment file names in store order.
    fn attachment_names(&self) -> Result<Vec<String>>;

    /// Store-provided identifier, unique per item.
    fn entry_id(&self) -> Result<String>;

    /// Forwards the item to `recipient` under a new subject and sends it.
    fn forward(&self, recipient: &str, subject: &str) -> Result<()>;
}

/// Iterator over a folder's items, newest first.
pub type ItemIter = Box<dyn Iterator<Item = Result<Box<dyn MailItem>>> + Send>;

/// A restricted view of a folder.
pub struct ItemSet {
    /// Number of items the store reports for this view.
    pub total: usize,
    pub items: ItemIter,
}

impl std::fmt::Debug for ItemSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSet").field("total", &self.total).finish()
    }
}

pub trait MailFolder: Send {
    /// Total number of items in the folder, unrestricted.
    fn count(&self) -> Result<usize>;

    /// Returns the items matching `restriction`, sorted by sent time
    /// descending. [`SubjectRestriction::All`] must always be supported.
    fn restrict(&self, restriction: &SubjectRestriction) -> Result<ItemSet>;
}

pub trait MailStore: Send + Sync {
    /// Display name of the signed-in account, when the store knows it.
    fn account_name(&self) -> Option<String> {
        None
    }

    fn open_sent_items(&self) -> Result<Box<dyn MailFolder>>;
}
