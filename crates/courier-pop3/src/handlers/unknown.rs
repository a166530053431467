//! Fallback handler for unrecognized commands.

use courier_protocols::{CommandHandler, Request};

use crate::response::{Pop3Response, TextResponse};
use crate::session::Pop3Session;

/// Answers every unrecognized command line with `-ERR Unknown command`.
///
/// Wired as the dispatcher's fallback chain rather than under a verb of its
/// own, so [`implemented_verbs`](CommandHandler::implemented_verbs) is empty.
#[derive(Debug, Default)]
pub struct UnknownHandler;

impl UnknownHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandHandler<Pop3Session, Pop3Response> for UnknownHandler {
    fn implemented_verbs(&self) -> Vec<String> {
        Vec::new()
    }

    fn on_command(&self, _session: &mut Pop3Session, _request: &Request) -> Option<Pop3Response> {
        Some(TextResponse::err("Unknown command").into())
    }
}
