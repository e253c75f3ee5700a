//! In-memory mail store for tests, demos and dry runs.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, FixedOffset};

use super::error::{MailError, Result};
use super::item::{ItemClass, ItemSet, MailFolder, MailItem, MailStore};
use super::query::SubjectRestriction;

/// One stored message.
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    pub class: ItemClass,
    pub subject: Option<String>,
    pub sent_at: DateTime<FixedOffset>,
    pub attachments: Vec<String>,
    /// Assigned by the store on insert when left empty.
    pub entry_id: String,
    /// Simulates a failing send for this message.
    pub fail_forward: bool,
    /// Simulates a failing subject read for this message.
    pub fail_subject: bool,
    /// Simulates the enumerator failing to produce this message.
    pub fail_enumerate: bool,
}

impl MemoryMessage {
    pub fn new(subject: impl Into<String>, sent_at: DateTime<FixedOffset>) -> Self {
        Self {
            class: ItemClass::Mail,
            subject: Some(subject.into()),
            sent_at,
            attachments: Vec::new(),
            entry_id: String::new(),
            fail_forward: false,
            fail_subject: false,
            fail_enumerate: false,
        }
    }

    pub fn with_attachment(mut self, name: impl Into<String>) -> Self {
        self.attachments.push(name.into());
        self
    }

    pub fn with_class(mut self, class: ItemClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_entry_id(mut self, id: impl Into<String>) -> Self {
        self.entry_id = id.into();
        self
    }

    pub fn without_subject(mut self) -> Self {
        self.subject = None;
        self
    }

    pub fn failing_forward(mut self) -> Self {
        self.fail_forward = true;
        self
    }

    pub fn failing_subject(mut self) -> Self {
        self.fail_subject = true;
        self
    }

    pub fn failing_enumerate(mut self) -> Self {
        self.fail_enumerate = true;
        self
    }
}

/// A forward the store has "sent".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentForward {
    pub entry_id: String,
    pub recipient: String,
    pub subject: String,
}

#[derive(Default)]
struct MemoryState {
    messages: Vec<MemoryMessage>,
    sent: Vec<SentForward>,
    unavailable: bool,
    rejected: Vec<&'static str>,
    account: Option<String>,
}

/// Cheaply cloneable; clones share the same messages and sent log.
#[derive(Clone, Default)]
pub struct MemoryMailStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryMailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: impl IntoIterator<Item = MemoryMessage>) -> Self {
        let store = Self::new();
        for message in messages {
            store.push(message);
        }
        store
    }

    pub fn push(&self, mut message: MemoryMessage) {
        if let Ok(mut state) = self.state.lock() {
            if message.entry_id.is_empty() {
                message.entry_id = format!("ENTRY-{:04}", state.messages.len() + 1);
            }
            state.messages.push(message);
        }
    }

    /// Forwards sent so far, in send order.
    pub fn sent(&self) -> Vec<SentForward> {
        self.state
            .lock()
            .map(|s| s.sent.clone())
            .unwrap_or_default()
    }

    /// Makes `open_sent_items` fail, as if the client were not running.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.unavailable = unavailable;
        }
    }

    /// Makes restrictions with the given label (`"DASL"`, `"LIKE"`) fail.
    pub fn reject_restriction(&self, label: &'static str) {
        if let Ok(mut state) = self.state.lock() {
            state.rejected.push(label);
        }
    }

    pub fn set_account_name(&self, name: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.account = Some(name.into());
        }
    }
}

fn lock(state: &Mutex<MemoryState>) -> Result<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| MailError::StoreUnavailable("store lock poisoned".to_string()))
}

impl MailStore for MemoryMailStore {
    fn account_name(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.account.clone())
    }

    fn open_sent_items(&self) -> Result<Box<dyn MailFolder>> {
        if lock(&self.state)?.unavailable {
            return Err(MailError::StoreUnavailable(
                "mail client is not running".to_string(),
            ));
        }
        Ok(Box::new(MemoryFolder {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemoryFolder {
    state: Arc<Mutex<MemoryState>>,
}

impl MailFolder for MemoryFolder {
    fn count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.messages.len())
    }

    fn restrict(&self, restriction: &SubjectRestriction) -> Result<ItemSet> {
        let state = lock(&self.state)?;
        if state.rejected.contains(&restriction.label()) {
            return Err(MailError::Restrict {
                filter: restriction.filter_string().unwrap_or_default(),
                reason: "restriction not supported".to_string(),
            });
        }

        let needle = match restriction {
            SubjectRestriction::Phrase(k) | SubjectRestriction::Like(k) => Some(k.to_uppercase()),
            SubjectRestriction::All => None,
        };

        let mut selected: Vec<MemoryMessage> = state
            .messages
            .iter()
            .filter(|m| match &needle {
                Some(needle) => m
                    .subject
                    .as_deref()
                    .is_some_and(|s| s.to_uppercase().contains(needle.as_str())),
                None => true,
            })
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));

        let total = selected.len();
        let shared = Arc::clone(&self.state);
        let items = selected.into_iter().map(move |message| {
            if message.fail_enumerate {
                return Err(MailError::Enumerate(format!(
                    "item {} could not be read",
                    message.entry_id
                )));
            }
            Ok(Box::new(MemoryItem {
                message,
                state: Arc::clone(&shared),
            }) as Box<dyn MailItem>)
        });

        Ok(ItemSet {
            total,
            items: Box::new(items),
        })
    }
}

struct MemoryItem {
    message: MemoryMessage,
    state: Arc<Mutex<MemoryState>>,
}

impl MailItem for MemoryItem {
    fn class(&self) -> Result<ItemClass> {
        Ok(self.message.class)
    }

    fn subject(&self) -> Result<Option<String>> {
        if self.message.fail_subject {
            return Err(MailError::attribute("Subject", "property not available"));
        }
        Ok(self.message.subject.clone())
    }

    fn sent_at(&self) -> Result<DateTime<FixedOffset>> {
        Ok(self.message.sent_at)
    }

    fn attachment_names(&self) -> Result<Vec<String>> {
        Ok(self.message.attachments.clone())
    }

    fn entry_id(&self) -> Result<String> {
        Ok(self.message.entry_id.clone())
    }

    fn forward(&self, recipient: &str, subject: &str) -> Result<()> {
        if self.message.fail_forward {
            return Err(MailError::Forward("transport rejected the message".to_string()));
        }
        let mut state = lock(&self.state).map_err(|e| MailError::Forward(e.to_string()))?;
        state.sent.push(SentForward {
            entry_id: self.message.entry_id.clone(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
        });
        Ok(())
    }
}
