//! Backing mailbox collaborator interface.
//!
//! Concrete storage lives outside this crate. Handlers address messages by
//! the identifiers a maildrop listing put into the session and ask the
//! mailbox for a content stream when a message body is actually needed.

use std::fmt;
use std::io::{self, Read};

/// Stable identifier of a message within a maildrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    /// Creates an identifier from its numeric value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read access to the messages of an authenticated user's maildrop.
pub trait Mailbox: Send + Sync {
    /// Opens the content stream for a message.
    ///
    /// Returns `Ok(None)` when the mailbox holds no content for the
    /// identifier. The returned stream is consumed lazily by the transport
    /// layer; implementations must not require it to be drained eagerly.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the content stream cannot be opened.
    fn message(&self, id: MessageId) -> io::Result<Option<Box<dyn Read + Send>>>;
}
