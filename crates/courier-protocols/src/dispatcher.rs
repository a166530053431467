//! The per-line dispatch entry point and its wiring builder.
//!
//! [`DispatcherBuilder`] is the typed wiring surface: the hosting framework
//! splits its extension pool into per-kind lists (command handlers, result
//! handlers) and hands each list to the matching builder method before
//! calling [`DispatcherBuilder::build`]. The builder validates the pool and
//! mandatory-command coverage, then freezes everything into an immutable
//! [`CommandDispatcher`] that connection threads share by reference.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::chain::ChainTable;
use crate::errors::WiringError;
use crate::handler::{CommandHandler, ResultHandler};
use crate::pipeline::ResultPipeline;
use crate::request::{LineDecoder, Request, Verb};

/// Tracing target for dispatch events.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Routes decoded command lines to handler chains and post-processes the
/// responses they produce.
///
/// The dispatcher is stateless at request level: `dispatch` takes `&self`
/// and only the caller-owned session is mutated, so one dispatcher instance
/// serves every connection concurrently.
pub struct CommandDispatcher<S, R> {
    decoder: LineDecoder,
    table: ChainTable<S, R>,
    pipeline: ResultPipeline<S, R>,
}

impl<S, R> std::fmt::Debug for CommandDispatcher<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("decoder", &self.decoder)
            .field("table", &self.table)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl<S, R> CommandDispatcher<S, R> {
    /// Starts a builder whose fallback chain holds `fallback_handler`.
    ///
    /// The fallback handler answers every line whose verb has no registered
    /// chain; requiring it up front means the fallback chain always exists
    /// once wiring succeeds.
    pub fn builder(fallback_handler: Arc<dyn CommandHandler<S, R>>) -> DispatcherBuilder<S, R> {
        DispatcherBuilder::new(fallback_handler)
    }

    /// Dispatches one framed line against the session.
    ///
    /// The line is decoded and parsed, the verb's chain (or the fallback
    /// chain) is executed in order, and the first response produced is fed
    /// through the result pipeline and returned. Returns `None` when no
    /// handler in the chain produced a response; whether that is an error is
    /// the transport layer's decision.
    pub fn dispatch(&self, session: &mut S, line: &[u8]) -> Option<R> {
        let decoded = self.decoder.decode(line);
        let request = Request::parse(&decoded);
        debug!(target: DISPATCH_TARGET, verb = %request.verb(), "dispatching command line");

        for handler in self.table.chain_for(request.verb()) {
            let start = Instant::now();
            if let Some(response) = handler.on_command(session, &request) {
                let elapsed = start.elapsed();
                debug!(
                    target: DISPATCH_TARGET,
                    verb = %request.verb(),
                    ?elapsed,
                    "command handler produced a response"
                );
                return Some(
                    self.pipeline
                        .post_process(session, response, elapsed, handler.as_ref()),
                );
            }
        }
        None
    }

    /// Returns the frozen chain table.
    #[must_use]
    pub fn chain_table(&self) -> &ChainTable<S, R> {
        &self.table
    }

    /// Returns the frozen result pipeline.
    #[must_use]
    pub fn result_pipeline(&self) -> &ResultPipeline<S, R> {
        &self.pipeline
    }
}

/// One-shot builder assembling a [`CommandDispatcher`] from extension pools.
pub struct DispatcherBuilder<S, R> {
    decoder: LineDecoder,
    handlers: Vec<Arc<dyn CommandHandler<S, R>>>,
    result_handlers: Vec<Arc<dyn ResultHandler<S, R>>>,
    fallback: Arc<dyn CommandHandler<S, R>>,
    mandatory: Vec<Verb>,
}

impl<S, R> DispatcherBuilder<S, R> {
    /// Creates a builder with the mandatory unknown-command fallback handler.
    pub fn new(fallback_handler: Arc<dyn CommandHandler<S, R>>) -> Self {
        Self {
            decoder: LineDecoder::default(),
            handlers: Vec::new(),
            result_handlers: Vec::new(),
            fallback: fallback_handler,
            mandatory: Vec::new(),
        }
    }

    /// Sets the line decoder (default: 7-bit ASCII).
    #[must_use]
    pub fn decoder(mut self, decoder: LineDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Appends one command handler to the pool.
    #[must_use]
    pub fn command_handler(mut self, handler: Arc<dyn CommandHandler<S, R>>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Appends a pool of command handlers, preserving iteration order.
    ///
    /// Repeated calls append again; wiring runs exactly once per pool during
    /// startup, before any dispatch call.
    #[must_use]
    pub fn command_handlers(
        mut self,
        pool: impl IntoIterator<Item = Arc<dyn CommandHandler<S, R>>>,
    ) -> Self {
        self.handlers.extend(pool);
        self
    }

    /// Appends one result handler to the pipeline.
    #[must_use]
    pub fn result_handler(mut self, handler: Arc<dyn ResultHandler<S, R>>) -> Self {
        self.result_handlers.push(handler);
        self
    }

    /// Appends a pool of result handlers to the pipeline, in order.
    #[must_use]
    pub fn result_handlers(
        mut self,
        pool: impl IntoIterator<Item = Arc<dyn ResultHandler<S, R>>>,
    ) -> Self {
        self.result_handlers.extend(pool);
        self
    }

    /// Declares verbs that must resolve to a non-empty chain after wiring.
    #[must_use]
    pub fn mandatory_verbs<I>(mut self, verbs: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.mandatory
            .extend(verbs.into_iter().map(|verb| Verb::new(verb.as_ref())));
        self
    }

    /// Wires the pools into a dispatcher and validates the result.
    ///
    /// Every handler in the pool is appended to the chain of each verb it
    /// declares, in pool order. The chain table is then checked for
    /// completeness and frozen.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::NoCommandHandlers`] when the pool is empty and
    /// [`WiringError::MissingMandatoryCommand`] when a declared-mandatory
    /// verb has no handler. Both are fatal startup conditions.
    pub fn build(self) -> Result<CommandDispatcher<S, R>, WiringError> {
        if self.handlers.is_empty() {
            return Err(WiringError::NoCommandHandlers);
        }

        let mut table = ChainTable::new(self.fallback);
        for handler in &self.handlers {
            for token in handler.implemented_verbs() {
                table.append(Verb::new(&token), Arc::clone(handler));
            }
        }

        for verb in &self.mandatory {
            if !table.has_chain(verb) {
                return Err(WiringError::missing_mandatory(verb.clone()));
            }
        }

        debug!(
            target: DISPATCH_TARGET,
            verbs = table.len(),
            result_handlers = self.result_handlers.len(),
            "dispatcher wired"
        );

        Ok(CommandDispatcher {
            decoder: self.decoder,
            table,
            pipeline: ResultPipeline::new(self.result_handlers),
        })
    }
}
