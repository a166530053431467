//! Generic command dispatch for line-oriented server protocols.
//!
//! This crate is the routing backbone shared by concrete protocol
//! implementations (POP3-style mail retrieval being the reference consumer in
//! `courier-pop3`). It receives one framed line at a time from a transport
//! layer, decodes it, parses the leading verb, and executes the ordered chain
//! of [`CommandHandler`]s registered for that verb. Lines whose verb has no
//! chain fall back to a designated unknown-command handler.
//!
//! ## Wiring and dispatch phases
//!
//! A dispatcher is assembled exactly once at startup through
//! [`DispatcherBuilder`], which consumes explicit, typed pools of command
//! handlers and result handlers and validates mandatory-command coverage
//! before any line is dispatched. Validation failures are fatal
//! [`WiringError`]s; a server must not enter its accept loop with a partially
//! wired dispatcher. Once [`DispatcherBuilder::build`] returns, the chain
//! table and result pipeline are immutable and may be shared freely across
//! connection threads.
//!
//! ## Execution contract
//!
//! Handlers in a chain run in registration order and the first one to produce
//! a response short-circuits the rest. Every produced response then flows
//! through the [`ResultPipeline`], which gives cross-cutting observers (timing
//! capture, response rewriting, auditing) a chance to transform it. Handlers
//! convert their own failures into protocol responses; the dispatcher itself
//! never fails a request, it only reports "no response produced" by returning
//! `None`.

mod chain;
mod dispatcher;
mod errors;
mod handler;
mod pipeline;
mod request;

pub use chain::ChainTable;
pub use dispatcher::{CommandDispatcher, DispatcherBuilder};
pub use errors::WiringError;
pub use handler::{CommandHandler, ResultHandler};
pub use pipeline::ResultPipeline;
pub use request::{LineDecoder, Request, Verb};
