//! End-to-end dispatch tests: wiring a POP3 dispatcher from handler pools
//! and driving it with raw command lines, the way a connection loop would.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};

use courier_protocols::{
    CommandDispatcher, CommandHandler, ResultHandler, WiringError,
};
use courier_pop3::{
    CapaHandler, CapabilityContributor, MANDATORY_COMMANDS, Mailbox, MessageId, Pop3Response,
    Pop3Session, RetrHandler, SessionState, StatusIndicator, UnknownHandler, DELETED_MESSAGES,
    MESSAGE_LISTING,
};

struct FixtureMailbox {
    messages: HashMap<MessageId, Vec<u8>>,
}

impl Mailbox for FixtureMailbox {
    fn message(&self, id: MessageId) -> io::Result<Option<Box<dyn Read + Send>>> {
        Ok(self
            .messages
            .get(&id)
            .map(|content| Box::new(Cursor::new(content.clone())) as Box<dyn Read + Send>))
    }
}

/// Result handler stamping an audit line onto textual responses.
struct AuditTagger(&'static str);

impl ResultHandler<Pop3Session, Pop3Response> for AuditTagger {
    fn on_response(
        &self,
        _session: &mut Pop3Session,
        response: Pop3Response,
        _elapsed: Duration,
        _handler: &dyn CommandHandler<Pop3Session, Pop3Response>,
    ) -> Pop3Response {
        match response {
            Pop3Response::Text(mut text) => {
                text.append_line(self.0);
                text.into()
            }
            other => other,
        }
    }
}

fn wire_dispatcher() -> Arc<CommandDispatcher<Pop3Session, Pop3Response>> {
    let capa = Arc::new(CapaHandler::new());
    capa.wire(vec![Arc::clone(&capa) as Arc<dyn CapabilityContributor>])
        .expect("wire capability registry");

    let fallback: Arc<dyn CommandHandler<Pop3Session, Pop3Response>> =
        Arc::new(UnknownHandler::new());
    let dispatcher = CommandDispatcher::builder(fallback)
        .command_handlers([
            capa as Arc<dyn CommandHandler<Pop3Session, Pop3Response>>,
            Arc::new(RetrHandler::new()),
        ])
        .mandatory_verbs(["CAPA", "RETR"])
        .build()
        .expect("wire dispatcher");
    Arc::new(dispatcher)
}

#[fixture]
fn session() -> Pop3Session {
    let mailbox = Arc::new(FixtureMailbox {
        messages: HashMap::from([(MessageId::new(20), b"hello\n.trap\n".to_vec())]),
    });
    let mut session = Pop3Session::new(mailbox);
    session.set_state(SessionState::Transaction);
    session.set_attribute(
        MESSAGE_LISTING,
        vec![MessageId::new(10), MessageId::new(20)],
    );
    session.set_attribute(DELETED_MESSAGES, Vec::<MessageId>::new());
    session
}

fn render(response: Pop3Response) -> String {
    let mut output = Vec::new();
    response.write_to(&mut output).expect("render response");
    String::from_utf8(output).expect("ascii output")
}

#[rstest]
fn retrieval_round_trip_streams_stuffed_content(mut session: Pop3Session) {
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"RETR 2")
        .expect("retr answers");
    assert_eq!(
        render(response),
        "+OK Message follows\r\nhello\r\n..trap\r\n.\r\n"
    );
}

#[rstest]
fn verbs_route_case_insensitively(mut session: Pop3Session) {
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"retr 2")
        .expect("retr answers");
    assert!(render(response).starts_with("+OK Message follows"));
}

#[rstest]
fn deleted_message_is_reported(mut session: Pop3Session) {
    session.set_attribute(DELETED_MESSAGES, vec![MessageId::new(20)]);
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"RETR 2")
        .expect("retr answers");
    assert_eq!(render(response), "-ERR Message (2) already deleted.\r\n");
}

#[rstest]
fn unknown_verb_falls_back(mut session: Pop3Session) {
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"XFROBNICATE now")
        .expect("fallback answers");
    assert_eq!(render(response), "-ERR Unknown command\r\n");
}

#[rstest]
fn capa_with_trailing_space_parses_as_bare_verb(mut session: Pop3Session) {
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"CAPA ")
        .expect("capa answers");
    assert_eq!(
        render(response),
        "+OK Capability list follows\r\nPIPELINING\r\n.\r\n"
    );
}

#[rstest]
fn result_handlers_transform_in_registration_order(mut session: Pop3Session) {
    let capa = Arc::new(CapaHandler::new());
    capa.wire(Vec::new()).expect("wire capability registry");

    let fallback: Arc<dyn CommandHandler<Pop3Session, Pop3Response>> =
        Arc::new(UnknownHandler::new());
    let dispatcher = CommandDispatcher::builder(fallback)
        .command_handler(capa as Arc<dyn CommandHandler<Pop3Session, Pop3Response>>)
        .result_handlers([
            Arc::new(AuditTagger("first")) as Arc<dyn ResultHandler<Pop3Session, Pop3Response>>,
            Arc::new(AuditTagger("second")),
        ])
        .build()
        .expect("wire dispatcher");

    let response = dispatcher
        .dispatch(&mut session, b"CAPA")
        .expect("capa answers");
    let text = response.as_text().expect("textual response");
    let tags: Vec<&str> = text
        .lines()
        .iter()
        .rev()
        .take(2)
        .rev()
        .map(String::as_str)
        .collect();
    assert_eq!(tags, vec!["first", "second"]);
}

#[rstest]
fn wrong_state_gets_bare_rejection(mut session: Pop3Session) {
    session.set_state(SessionState::Authorization);
    let dispatcher = wire_dispatcher();
    let response = dispatcher
        .dispatch(&mut session, b"RETR 2")
        .expect("retr answers");
    let text = response.as_text().expect("textual response");
    assert_eq!(text.indicator(), StatusIndicator::Err);
    assert_eq!(text.message(), None);
}

#[test]
fn full_mandatory_list_requires_full_command_coverage() {
    let fallback: Arc<dyn CommandHandler<Pop3Session, Pop3Response>> =
        Arc::new(UnknownHandler::new());
    let result = CommandDispatcher::builder(fallback)
        .command_handler(
            Arc::new(RetrHandler::new()) as Arc<dyn CommandHandler<Pop3Session, Pop3Response>>
        )
        .mandatory_verbs(MANDATORY_COMMANDS)
        .build();
    assert!(matches!(
        result,
        Err(WiringError::MissingMandatoryCommand { .. })
    ));
}
