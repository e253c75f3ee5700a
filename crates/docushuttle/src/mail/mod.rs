//! Mail store abstraction.
//!
//! The pipeline sees an external mail store only through the traits in
//! [`item`]. A desktop client binding implements them; [`memory`] provides
//! an in-process store for tests and dry runs.

pub mod error;
pub mod item;
pub mod memory;
pub mod query;
pub mod tracker;

pub use error::MailError;
pub use item::{ItemClass, ItemIter, ItemSet, MailFolder, MailItem, MailStore};
pub use memory::{MemoryMailStore, MemoryMessage, SentForward};
pub use query::{sanitize_filter_value, SubjectRestriction};
pub use tracker::{DuplicateTracker, ForwardTracker};
