//! Verb-to-chain routing table.
//!
//! The table maps each normalized verb to the ordered chain of handlers wired
//! for it. The unknown-command fallback chain is a dedicated field rather
//! than a reserved map key, so it can never collide with a caller-supplied
//! verb. The table is built mutably by the dispatcher builder during the
//! single-threaded wiring phase and is read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::CommandHandler;
use crate::request::Verb;

/// Immutable routing table from verbs to handler chains.
pub struct ChainTable<S, R> {
    chains: HashMap<Verb, Vec<Arc<dyn CommandHandler<S, R>>>>,
    fallback: Vec<Arc<dyn CommandHandler<S, R>>>,
}

impl<S, R> ChainTable<S, R> {
    /// Creates a table whose fallback chain holds the given handler.
    pub(crate) fn new(fallback_handler: Arc<dyn CommandHandler<S, R>>) -> Self {
        Self {
            chains: HashMap::new(),
            fallback: vec![fallback_handler],
        }
    }

    /// Appends a handler to the chain for `verb`, creating the chain on first
    /// registration. Chain order is append order and is never rearranged.
    pub(crate) fn append(&mut self, verb: Verb, handler: Arc<dyn CommandHandler<S, R>>) {
        self.chains.entry(verb).or_default().push(handler);
    }

    /// Returns the chain for `verb`, or the fallback chain when the verb has
    /// no entry.
    #[must_use]
    pub fn chain_for(&self, verb: &Verb) -> &[Arc<dyn CommandHandler<S, R>>] {
        self.chains.get(verb).map_or(&self.fallback, Vec::as_slice)
    }

    /// Returns `true` when a non-empty chain exists for `verb`.
    #[must_use]
    pub fn has_chain(&self, verb: &Verb) -> bool {
        self.chains.get(verb).is_some_and(|chain| !chain.is_empty())
    }

    /// Returns `true` when no verb-specific chains are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Returns the number of registered verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }
}

impl<S, R> fmt::Debug for ChainTable<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut verbs: Vec<&str> = self.chains.keys().map(Verb::as_str).collect();
        verbs.sort_unstable();
        f.debug_struct("ChainTable")
            .field("verbs", &verbs)
            .field("fallback_len", &self.fallback.len())
            .finish()
    }
}
