//! Per-connection POP3 session state.
//!
//! A session is created when a client connects, mutated by command handlers
//! for the lifetime of the connection, and discarded on disconnect. The
//! dispatch core never persists any of it. Handlers gate themselves on the
//! protocol state machine and share intermediate results (the maildrop
//! listing, deletion markers) through the keyed attribute store.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::mailbox::Mailbox;

/// Attribute key holding the ordered maildrop listing (`Vec<MessageId>`).
///
/// Protocol message numbers are 1-based indexes into this listing.
pub const MESSAGE_LISTING: &str = "MESSAGE_LISTING";

/// Attribute key holding identifiers marked for deletion (`Vec<MessageId>`).
pub const DELETED_MESSAGES: &str = "DELETED_MESSAGES";

/// The POP3 protocol state machine.
///
/// The dispatch core only reads this value; transitions are driven by the
/// authentication and update handlers of a full server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Client connected, not yet authenticated.
    Authorization,
    /// Maildrop locked; retrieval and deletion commands are permitted.
    Transaction,
    /// QUIT received; pending deletions are being applied.
    Update,
}

/// Mutable state owned by one client connection.
pub struct Pop3Session {
    state: SessionState,
    attributes: HashMap<String, Box<dyn Any + Send>>,
    mailbox: Arc<dyn Mailbox>,
}

impl Pop3Session {
    /// Creates a session in the `Authorization` state backed by `mailbox`.
    #[must_use]
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self {
            state: SessionState::Authorization,
            attributes: HashMap::new(),
            mailbox,
        }
    }

    /// Returns the current protocol state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Moves the session to a new protocol state.
    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Returns a typed view of an attribute, or `None` when the key is
    /// absent or holds a value of a different type.
    #[must_use]
    pub fn attribute<T: 'static>(&self, key: &str) -> Option<&T> {
        self.attributes
            .get(key)
            .and_then(|value| value.downcast_ref())
    }

    /// Stores an attribute, replacing any previous value under the key.
    pub fn set_attribute<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.attributes.insert(key.into(), Box::new(value));
    }

    /// Returns the backing mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &dyn Mailbox {
        self.mailbox.as_ref()
    }
}

impl fmt::Debug for Pop3Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Pop3Session")
            .field("state", &self.state)
            .field("attributes", &keys)
            .finish()
    }
}
