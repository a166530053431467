//! POP3 command handlers.
//!
//! Each handler implements [`CommandHandler`] over
//! ([`Pop3Session`](crate::Pop3Session), [`Pop3Response`](crate::Pop3Response))
//! and is wired into the dispatcher as part of the startup extension pool.
//! Handlers never panic and never return errors to the dispatcher; every
//! failure mode becomes a negative response.
//!
//! [`CommandHandler`]: courier_protocols::CommandHandler

mod capa;
mod retr;
mod unknown;

pub use capa::{CapaHandler, CapabilityContributor};
pub use retr::RetrHandler;
pub use unknown::UnknownHandler;

/// Tracing target for handler events.
pub(crate) const HANDLER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::handlers");

/// Verbs a POP3 dispatcher requires coverage for before serving clients.
///
/// Hosts pass this list to
/// [`DispatcherBuilder::mandatory_verbs`](courier_protocols::DispatcherBuilder::mandatory_verbs)
/// when wiring a full server; wiring fails unless every one of these verbs
/// resolves to a non-empty handler chain.
pub const MANDATORY_COMMANDS: &[&str] = &[
    "USER", "PASS", "LIST", "NOOP", "RSET", "DELE", "QUIT", "STAT", "RETR", "TOP", "UIDL",
];
