//! RETR command handler: message retrieval.
//!
//! Retrieval is only legal in the `Transaction` state. Within it the handler
//! resolves the 1-based message number against the maildrop listing stored in
//! the session, refuses messages already marked for deletion without touching
//! the mailbox, and otherwise streams the message content wrapped in the
//! CRLF/dot-stuffing transforms. Every failure mode is a negative response;
//! nothing propagates to the dispatcher.

use courier_protocols::{CommandHandler, Request};
use tracing::{debug, warn};

use super::HANDLER_TARGET;
use crate::mailbox::MessageId;
use crate::response::{Pop3Response, StreamResponse, TextResponse};
use crate::session::{DELETED_MESSAGES, MESSAGE_LISTING, Pop3Session, SessionState};
use crate::stream::{CrlfNormalizingReader, DotStuffedReader};

/// Handles the RETR command.
#[derive(Debug, Default)]
pub struct RetrHandler;

impl RetrHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandHandler<Pop3Session, Pop3Response> for RetrHandler {
    fn implemented_verbs(&self) -> Vec<String> {
        vec!["RETR".to_owned()]
    }

    fn on_command(&self, session: &mut Pop3Session, request: &Request) -> Option<Pop3Response> {
        if session.state() != SessionState::Transaction {
            return Some(TextResponse::rejection().into());
        }

        let Some(number) = request.argument().and_then(parse_message_number) else {
            return Some(TextResponse::err("Usage: RETR [mail number]").into());
        };

        let Some(id) = message_at(session, number) else {
            return Some(does_not_exist(number));
        };

        if is_marked_deleted(session, id) {
            return Some(TextResponse::err(format!("Message ({number}) already deleted.")).into());
        }

        match session.mailbox().message(id) {
            Ok(Some(content)) => {
                debug!(target: HANDLER_TARGET, message = number, "streaming message content");
                let body = CrlfNormalizingReader::new(DotStuffedReader::new(content));
                Some(StreamResponse::ok("Message follows", Box::new(body)).into())
            }
            Ok(None) => Some(does_not_exist(number)),
            Err(error) => {
                warn!(
                    target: HANDLER_TARGET,
                    %error,
                    message = number,
                    "failed to open message stream"
                );
                Some(TextResponse::err("Error while retrieving message.").into())
            }
        }
    }
}

/// Parses the argument as a positive 1-based message number.
fn parse_message_number(argument: &str) -> Option<usize> {
    let number = argument.trim().parse::<usize>().ok()?;
    (number > 0).then_some(number)
}

/// Resolves a message number against the session's maildrop listing.
fn message_at(session: &Pop3Session, number: usize) -> Option<MessageId> {
    session
        .attribute::<Vec<MessageId>>(MESSAGE_LISTING)?
        .get(number - 1)
        .copied()
}

/// Returns `true` when the identifier is marked for deletion.
fn is_marked_deleted(session: &Pop3Session, id: MessageId) -> bool {
    session
        .attribute::<Vec<MessageId>>(DELETED_MESSAGES)
        .is_some_and(|deleted| deleted.contains(&id))
}

fn does_not_exist(number: usize) -> Pop3Response {
    TextResponse::err(format!("Message ({number}) does not exist.")).into()
}
