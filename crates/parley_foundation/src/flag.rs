//! Control-flow flags.
//!
//! A [`Flag`] signals abnormal or alternate termination of argument
//! processing. It is explicitly checked, never thrown, and never fed back
//! into the cast pipeline as input.

use crate::message::Message;
use crate::value::Value;

/// A tagged control value returned instead of a cast result.
#[derive(Clone, Debug, PartialEq)]
pub enum Flag {
    /// Abort the command invocation.
    Cancel,
    /// Hand control back to reprocess a freshly typed message.
    Retry(Message),
    /// Redirect to another command with the remaining input.
    Continue {
        /// Id of the command to continue with.
        command: String,
        /// Whether the redirected command skips permission-style checks.
        ignore_checks: bool,
        /// The unconsumed remainder of the message, filled in by the runner.
        rest: Option<String>,
    },
    /// A cast failed; optionally carries a diagnostic payload.
    Fail {
        /// Payload describing the failed input, if any.
        value: Option<Value>,
    },
}

impl Flag {
    /// Creates a cancel flag.
    #[must_use]
    pub fn cancel() -> Self {
        Self::Cancel
    }

    /// Creates a retry flag carrying the message to reprocess.
    #[must_use]
    pub fn retry(message: Message) -> Self {
        Self::Retry(message)
    }

    /// Creates a continue flag redirecting to `command`.
    #[must_use]
    pub fn continue_to(command: impl Into<String>) -> Self {
        Self::Continue {
            command: command.into(),
            ignore_checks: false,
            rest: None,
        }
    }

    /// Creates a fail flag with an optional payload.
    #[must_use]
    pub fn fail(value: Option<Value>) -> Self {
        Self::Fail { value }
    }

    /// Marks a continue flag as skipping checks. No-op on other variants.
    #[must_use]
    pub fn ignoring_checks(mut self) -> Self {
        if let Self::Continue { ignore_checks, .. } = &mut self {
            *ignore_checks = true;
        }
        self
    }

    /// Returns true for [`Flag::Cancel`].
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }

    /// Returns true for [`Flag::Retry`].
    #[must_use]
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(_))
    }

    /// Returns true for [`Flag::Continue`].
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }

    /// Returns true for [`Flag::Fail`].
    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Returns true if this flag halts the argument runner.
    ///
    /// Cancel aborts, Retry reprocesses fresh input, Continue redirects.
    /// Fail is a per-argument outcome and does not short-circuit the run.
    #[must_use]
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::Cancel | Self::Retry(_) | Self::Continue { .. })
    }
}

/// The outcome of casting a phrase or processing an argument.
///
/// Fatal errors (unknown types, transport failures) travel separately on
/// the [`Result`](crate::Result) channel; a `Resolved` is always a
/// legitimate outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// A successfully produced value.
    Value(Value),
    /// A control flag, including cast failure.
    Flag(Flag),
}

impl Resolved {
    /// Creates a successful outcome.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Creates a cast failure with an optional payload.
    #[must_use]
    pub fn fail(value: Option<Value>) -> Self {
        Self::Flag(Flag::fail(value))
    }

    /// The single failure predicate: true only for [`Flag::Fail`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Flag(Flag::Fail { .. }))
    }

    /// Returns true if this outcome halts the argument runner.
    #[must_use]
    pub fn is_short_circuit(&self) -> bool {
        match self {
            Self::Value(_) => false,
            Self::Flag(flag) => flag.is_short_circuit(),
        }
    }

    /// The value, if this is a successful outcome.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Flag(_) => None,
        }
    }

    /// Converts into the carried value, mapping any flag to its failure
    /// payload (or [`Value::Null`]).
    #[must_use]
    pub fn into_bag_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Flag(Flag::Fail { value }) => value.unwrap_or(Value::Null),
            Self::Flag(_) => Value::Null,
        }
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Flag> for Resolved {
    fn from(flag: Flag) -> Self {
        Self::Flag(flag)
    }
}

impl From<Option<Value>> for Resolved {
    /// `None` means a cast failure, mirroring "no result" conventions.
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::fail(None),
        }
    }
}
