//! CAPA command handler and capability aggregation.
//!
//! Optional protocol features are advertised by whichever extension modules
//! implement them, so the CAPA handler does not hardcode the capability list.
//! During startup the host wires an ordered pool of
//! [`CapabilityContributor`]s into the handler; on every CAPA command the
//! handler concatenates their per-call contributions, which may vary with the
//! session state (an authentication extension, say, only advertises itself
//! before login).

use std::sync::{Arc, OnceLock};

use courier_protocols::{CommandHandler, Request, WiringError};
use tracing::debug;

use super::HANDLER_TARGET;
use crate::response::{Pop3Response, TextResponse};
use crate::session::Pop3Session;

/// Capability the handler itself always advertises.
const BASE_CAPABILITY: &str = "PIPELINING";

/// Advertises named capabilities for the CAPA listing.
pub trait CapabilityContributor: Send + Sync {
    /// Returns the capability lines to advertise for this session.
    fn capabilities(&self, session: &Pop3Session) -> Vec<String>;
}

/// Handles the CAPA command by aggregating wired contributors.
///
/// The handler is wired exactly once, before dispatch begins; afterwards the
/// contributor list is read-only. It also implements
/// [`CapabilityContributor`] itself for the hardcoded base capability, so
/// hosts include it in the contributor pool they wire.
#[derive(Default)]
pub struct CapaHandler {
    contributors: OnceLock<Vec<Arc<dyn CapabilityContributor>>>,
}

impl CapaHandler {
    /// Creates an unwired handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the ordered contributor pool.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::AlreadyWired`] when called a second time;
    /// wiring happens exactly once during startup.
    pub fn wire(&self, contributors: Vec<Arc<dyn CapabilityContributor>>) -> Result<(), WiringError> {
        debug!(
            target: HANDLER_TARGET,
            contributors = contributors.len(),
            "wiring capability registry"
        );
        self.contributors
            .set(contributors)
            .map_err(|_| WiringError::already_wired("capability registry"))
    }

    /// Concatenates every contributor's capabilities, in wiring order.
    #[must_use]
    pub fn list_capabilities(&self, session: &Pop3Session) -> Vec<String> {
        self.contributors
            .get()
            .map_or_else(Vec::new, |contributors| {
                contributors
                    .iter()
                    .flat_map(|contributor| contributor.capabilities(session))
                    .collect()
            })
    }
}

impl CommandHandler<Pop3Session, Pop3Response> for CapaHandler {
    fn implemented_verbs(&self) -> Vec<String> {
        vec!["CAPA".to_owned()]
    }

    fn on_command(&self, session: &mut Pop3Session, _request: &Request) -> Option<Pop3Response> {
        let mut response = TextResponse::ok("Capability list follows");
        for capability in self.list_capabilities(session) {
            response.append_line(capability);
        }
        response.append_line(".");
        Some(response.into())
    }
}

impl CapabilityContributor for CapaHandler {
    fn capabilities(&self, _session: &Pop3Session) -> Vec<String> {
        vec![BASE_CAPABILITY.to_owned()]
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::*;
    use crate::mailbox::{Mailbox, MessageId};

    struct EmptyMailbox;

    impl Mailbox for EmptyMailbox {
        fn message(&self, _id: MessageId) -> io::Result<Option<Box<dyn Read + Send>>> {
            Ok(None)
        }
    }

    struct FixedContributor(&'static [&'static str]);

    impl CapabilityContributor for FixedContributor {
        fn capabilities(&self, _session: &Pop3Session) -> Vec<String> {
            self.0.iter().map(|name| (*name).to_owned()).collect()
        }
    }

    fn session() -> Pop3Session {
        Pop3Session::new(Arc::new(EmptyMailbox))
    }

    #[test]
    fn aggregates_contributors_in_wiring_order() {
        let handler = Arc::new(CapaHandler::new());
        handler
            .wire(vec![
                Arc::clone(&handler) as Arc<dyn CapabilityContributor>,
                Arc::new(FixedContributor(&["X"])),
                Arc::new(FixedContributor(&["Y", "Z"])),
            ])
            .expect("wire contributors");

        let capabilities = handler.list_capabilities(&session());
        assert_eq!(capabilities, vec!["PIPELINING", "X", "Y", "Z"]);
    }

    #[test]
    fn response_body_ends_with_sentinel() {
        let handler = Arc::new(CapaHandler::new());
        handler
            .wire(vec![Arc::clone(&handler) as Arc<dyn CapabilityContributor>])
            .expect("wire contributors");

        let response = handler
            .on_command(&mut session(), &Request::parse("CAPA"))
            .expect("capa always answers");
        let text = response.as_text().expect("textual response");
        assert_eq!(text.message(), Some("Capability list follows"));
        assert_eq!(
            text.lines().to_vec(),
            vec!["PIPELINING".to_owned(), ".".to_owned()]
        );
    }

    #[test]
    fn second_wiring_is_rejected() {
        let handler = CapaHandler::new();
        handler.wire(Vec::new()).expect("first wiring");
        let error = handler.wire(Vec::new()).expect_err("second wiring");
        assert!(matches!(error, WiringError::AlreadyWired { .. }));
    }

    #[test]
    fn unwired_handler_advertises_nothing() {
        let handler = CapaHandler::new();
        assert!(handler.list_capabilities(&session()).is_empty());
    }
}
