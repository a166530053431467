//! Fatal startup wiring errors.
//!
//! Wiring problems are configuration defects: they are reported once, prevent
//! the server from entering its dispatch phase, and are never retried. They
//! are deliberately disjoint from per-request failures, which handlers encode
//! as negative protocol responses instead.

use thiserror::Error;

use crate::request::Verb;

/// Errors raised while assembling a dispatcher from extension pools.
#[derive(Debug, Error)]
pub enum WiringError {
    /// The command-handler pool was empty.
    #[error("no command handlers were supplied for wiring")]
    NoCommandHandlers,

    /// A verb declared mandatory resolved to no handler chain.
    #[error("no command handler is wired for mandatory command {verb}")]
    MissingMandatoryCommand {
        /// The mandatory verb without coverage.
        verb: Verb,
    },

    /// A wire-once component was wired a second time.
    #[error("{component} has already been wired")]
    AlreadyWired {
        /// The component that rejected the repeated wiring.
        component: &'static str,
    },
}

impl WiringError {
    /// Creates a missing-mandatory-command error.
    #[must_use]
    pub fn missing_mandatory(verb: Verb) -> Self {
        Self::MissingMandatoryCommand { verb }
    }

    /// Creates an already-wired error for the named component.
    #[must_use]
    pub fn already_wired(component: &'static str) -> Self {
        Self::AlreadyWired { component }
    }
}
