//! Result-handler pipeline applied to every produced response.
//!
//! The pipeline is the dispatcher's hook for cross-cutting concerns: timing
//! capture, response rewriting, auditing. It defines ordering and chaining
//! only; concrete behaviours live with the protocol crates that register
//! result handlers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::handler::{CommandHandler, ResultHandler};

/// Ordered list of result handlers, frozen at wiring time.
pub struct ResultPipeline<S, R> {
    handlers: Vec<Arc<dyn ResultHandler<S, R>>>,
}

impl<S, R> ResultPipeline<S, R> {
    pub(crate) fn new(handlers: Vec<Arc<dyn ResultHandler<S, R>>>) -> Self {
        Self { handlers }
    }

    /// Feeds a response through every registered handler in registration
    /// order. Each handler receives the previous handler's output together
    /// with the elapsed execution time of the command handler that produced
    /// the original response.
    pub fn post_process(
        &self,
        session: &mut S,
        response: R,
        elapsed: Duration,
        producer: &dyn CommandHandler<S, R>,
    ) -> R {
        self.handlers.iter().fold(response, |current, handler| {
            handler.on_response(session, current, elapsed, producer)
        })
    }

    /// Returns `true` when no result handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the number of registered result handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl<S, R> fmt::Debug for ResultPipeline<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultPipeline")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    struct Producer;

    impl CommandHandler<(), String> for Producer {
        fn implemented_verbs(&self) -> Vec<String> {
            vec!["TEST".to_owned()]
        }

        fn on_command(&self, (): &mut (), _request: &Request) -> Option<String> {
            Some(String::new())
        }
    }

    struct Appender(&'static str);

    impl ResultHandler<(), String> for Appender {
        fn on_response(
            &self,
            (): &mut (),
            mut response: String,
            _elapsed: Duration,
            _handler: &dyn CommandHandler<(), String>,
        ) -> String {
            response.push_str(self.0);
            response
        }
    }

    #[test]
    fn applies_handlers_in_registration_order() {
        let pipeline =
            ResultPipeline::new(vec![Arc::new(Appender("a")), Arc::new(Appender("b"))]);
        let processed =
            pipeline.post_process(&mut (), "r".to_owned(), Duration::ZERO, &Producer);
        assert_eq!(processed, "rab");
    }

    #[test]
    fn empty_pipeline_returns_response_unchanged() {
        let pipeline: ResultPipeline<(), String> = ResultPipeline::new(Vec::new());
        assert!(pipeline.is_empty());
        let processed =
            pipeline.post_process(&mut (), "r".to_owned(), Duration::ZERO, &Producer);
        assert_eq!(processed, "r");
    }
}
