//! Error types for the parley system.
//!
//! These are programmer/config and environment errors only. User-input
//! problems (a phrase that fails to cast, a missing value) are handled by
//! the [`Flag`](crate::Flag) taxonomy and never become errors.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal error: a configuration defect or a transport failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The token stream did not match the grammar. This indicates a defect
    /// in the tokenizer/parser configuration, not bad user input, and is
    /// never surfaced to the end user.
    #[error("grammar mismatch at token {position}: expected {expected}, found {found}")]
    Grammar {
        /// Index of the offending token.
        position: usize,
        /// The token kinds the parser would have accepted.
        expected: String,
        /// The token kind actually present.
        found: String,
    },

    /// A named type was not registered and has no fallback.
    #[error("unknown argument type: {0}")]
    UnknownType(String),

    /// The host transport failed to deliver a message. Not retried here.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl Error {
    /// Creates a grammar mismatch error.
    #[must_use]
    pub fn grammar(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Grammar {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
