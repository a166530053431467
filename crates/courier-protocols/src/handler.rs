//! Extension traits implemented by protocol command modules.
//!
//! Concrete protocol crates implement [`CommandHandler`] once per command (or
//! command group) and hand the instances to the [`DispatcherBuilder`] as an
//! ordered pool. [`ResultHandler`]s observe and transform every response the
//! dispatcher produces. Both traits are object-safe; the dispatcher stores
//! them as shared trait objects.
//!
//! [`DispatcherBuilder`]: crate::DispatcherBuilder

use std::time::Duration;

use crate::request::Request;

/// Handles a parsed command line against a session.
///
/// `S` is the per-connection session type and `R` the protocol's response
/// type. A handler must convert every failure it detects (bad argument, wrong
/// session state, missing resource, I/O trouble) into a negative `R` value;
/// nothing may escape to the dispatcher as a panic or error.
pub trait CommandHandler<S, R>: Send + Sync {
    /// Returns the verbs this handler responds to.
    ///
    /// Tokens are normalized (trimmed, uppercased) during wiring, so
    /// implementations may declare them in any case.
    fn implemented_verbs(&self) -> Vec<String>;

    /// Executes the command, returning `Some` response to short-circuit the
    /// rest of the chain or `None` to let the next handler in the chain run.
    fn on_command(&self, session: &mut S, request: &Request) -> Option<R>;
}

/// Post-processes a response produced by a [`CommandHandler`].
///
/// Result handlers run in registration order; each receives the output of the
/// previous one along with the elapsed execution time of the producing
/// handler. A result handler must always return a response; returning the
/// input unchanged is the no-op.
pub trait ResultHandler<S, R>: Send + Sync {
    /// Observes and possibly transforms a produced response.
    fn on_response(
        &self,
        session: &mut S,
        response: R,
        elapsed: Duration,
        handler: &dyn CommandHandler<S, R>,
    ) -> R;
}
