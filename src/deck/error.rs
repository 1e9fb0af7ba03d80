//! Error types for the deck cycle.

use thiserror::Error;

/// Errors that can occur while building or cycling a deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// A deck or sweep parameter is out of range; rejected before any drawing.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Which parameter was rejected and why
        reason: String,
    },

    /// Pool plus discard cannot cover a draw under [`DrawPolicy::Strict`].
    ///
    /// [`DrawPolicy::Strict`]: super::DrawPolicy::Strict
    #[error("insufficient tokens: requested {requested}, only {available} left in pool and discard")]
    InsufficientTokens {
        /// Tokens asked for by the draw
        requested: usize,
        /// Tokens held by pool and discard together
        available: usize,
    },
}

impl DeckError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
