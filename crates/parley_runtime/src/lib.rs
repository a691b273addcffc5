//! Argument processing, prompting, and running for parley.
//!
//! This crate provides:
//! - [`Argument`] - Per-parameter spec: match mode, caster, defaults,
//!   prompt configuration, plus the processing/defaulting state machine
//! - The prompt engine ([`Argument::collect`]) - multi-turn conversations
//!   with retries, time-outs, cancellation, infinite collection, and
//!   breakout to other commands
//! - [`ArgumentRunner`] - Threads a shared cursor across an argument
//!   sequence, accumulating the typed value bag or short-circuiting
//! - [`PromptRegistry`] - Cross-invocation "(channel, user) is prompting"
//!   bookkeeping
//!
//! # Flow
//!
//! ```text
//! raw message body
//!        │ ContentParser::parse            (parley_parser)
//!        ▼
//! ParsedContent ── ArgumentRunner::run ──► per-argument dispatch
//!        │                                      │
//!        │                          Argument::process ── cast (parley_types)
//!        │                                      │  missing / failed
//!        │                                      ▼
//!        │                          defaults · otherwise · prompt engine
//!        ▼
//! Values bag  —or—  Flag::{Cancel, Retry, Continue}
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod argument;
pub mod options;
pub mod prompt;
pub mod registry;
pub mod runner;

pub use argument::{Argument, MatchMode, Unordered, content_parser_options};
pub use options::{
    ArgumentDefaults, DefaultData, ModifyText, PromptData, PromptOptions, TextSource, ValueSource,
};
pub use registry::{PromptGuard, PromptRegistry};
pub use runner::{
    ArgumentGenerator, ArgumentRunner, FromArguments, RunOutcome, RunnerState, Step, Values,
    from_arguments,
};
