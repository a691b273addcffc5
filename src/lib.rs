//! Parley - Command argument parsing and interactive prompting for chat bots
//!
//! This crate re-exports all layers of the parley engine for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: parley_runtime    — Argument, prompt engine, ArgumentRunner
//! Layer 2: parley_types      — Caster combinators, TypeResolver
//! Layer 1: parley_parser     — Tokenizer, grammar parser, ParsedContent
//! Layer 0: parley_foundation — Core types (Value, Flag, Error, host boundary)
//! ```

pub use parley_foundation as foundation;
pub use parley_parser as parser;
pub use parley_runtime as runtime;
pub use parley_types as types;
