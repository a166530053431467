//! POP3 command handling on top of the `courier-protocols` dispatch core.
//!
//! This crate supplies the protocol-specific pieces a POP3 server wires into
//! a [`CommandDispatcher`](courier_protocols::CommandDispatcher): the
//! per-connection [`Pop3Session`], the `+OK`/`-ERR` response shapes, the
//! payload transforms required for multiline bodies (CRLF normalization and
//! dot-stuffing), and the command handlers themselves. [`RetrHandler`] is the
//! template every handler follows: a pure function of session and request to
//! a response, with every failure mode converted to a negative response at
//! the point of detection.
//!
//! Mailbox storage stays behind the [`Mailbox`] trait; the handlers only ever
//! ask it to open a message stream by identifier. Network I/O is equally out
//! of scope: the hosting transport frames lines, feeds them to the
//! dispatcher, and drains whatever [`Pop3Response`] comes back.

mod handlers;
mod mailbox;
mod response;
mod session;
mod stream;

pub use handlers::{
    CapaHandler, CapabilityContributor, MANDATORY_COMMANDS, RetrHandler, UnknownHandler,
};
pub use mailbox::{Mailbox, MessageId};
pub use response::{Pop3Response, StatusIndicator, StreamResponse, TextResponse};
pub use session::{DELETED_MESSAGES, MESSAGE_LISTING, Pop3Session, SessionState};
pub use stream::{CrlfNormalizingReader, DotStuffedReader};
