//! Session error types.
//!
//! Rejected player actions are not errors: they are dropped silently. The
//! variants here cover broken configuration and corrupted session state.

use thiserror::Error;

use crate::cards::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("session needs {min}..={max} participants, got {got}")]
    SeatCount { min: usize, max: usize, got: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Session state no longer satisfies the engine's invariants.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl SessionError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}
