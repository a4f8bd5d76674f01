//! Change notification for the check-in document.
//!
//! The storage primitive has no native change event, so the original
//! synthesized one through a DOM mutation signal. Here every successful
//! mutation publishes directly: the manager calls `trigger_check()`,
//! the broker re-reads the store, diffs against the last known value,
//! and notifies listeners only when the document actually changed.
//! There is deliberately no polling loop.

use serde_json::Value;

use crate::models::CheckInDocument;
use crate::store::DocumentStore;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// A subscribed listener. Errors are logged and isolated so one failing
/// listener never starves the rest.
pub type Listener = Box<dyn FnMut(&CheckInDocument) -> Result<(), Box<dyn std::error::Error>>>;

/// Detects document changes and fans them out to listeners.
pub struct ChangeBroker {
    store: DocumentStore,
    key: String,
    running: bool,
    last_known: Option<Value>,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl ChangeBroker {
    pub fn new(store: DocumentStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            running: false,
            last_known: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Begin watching. Idempotent; the current stored value becomes the
    /// diffing baseline so startup does not fire a spurious change.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_known = self.store.read(&self.key);
        tracing::debug!("Change broker started for '{}'", self.key);
    }

    /// Stop watching. Idempotent. Checks are ignored while stopped.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register a listener, invoked in registration order on every
    /// detected change.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != len_before
    }

    /// Manual change check, called by every successful mutation.
    /// Returns `true` if a change was detected and broadcast.
    pub fn trigger_check(&mut self) -> bool {
        self.check_for_changes()
    }

    fn check_for_changes(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let current = self.store.read(&self.key);
        if current == self.last_known {
            return false;
        }
        self.last_known = current.clone();

        let Some(value) = current else {
            // Document was cleared; nothing to hand to listeners.
            return true;
        };
        match serde_json::from_value::<CheckInDocument>(value) {
            Ok(doc) => self.notify(&doc),
            Err(e) => tracing::warn!("Stored value under '{}' is not a document: {}", self.key, e),
        }
        true
    }

    fn notify(&mut self, doc: &CheckInDocument) {
        for (id, listener) in self.listeners.iter_mut() {
            if let Err(e) = listener(doc) {
                tracing::warn!("Listener {:?} failed: {}", id, e);
            }
        }
    }
}

impl std::fmt::Debug for ChangeBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBroker")
            .field("key", &self.key)
            .field("running", &self.running)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
