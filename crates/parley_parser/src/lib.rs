//! Tokenizer and grammar parser for chat-bot command input.
//!
//! This crate turns a raw message body like `add "a b" --limit 3 rest` into
//! phrases and flags a command can consume.
//!
//! # Architecture
//!
//! ```text
//! `say "hello there" --loud`
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → [Word, WS, Quote, Word, WS, Word, Quote, WS, FlagWord, End]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ GRAMMAR PARSER  │  → Phrase("say") Phrase("hello there") Flag("--loud")
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PARSED CONTENT  │  → all / phrases / flags / optionFlags views
//! └─────────────────┘
//! ```
//!
//! Concatenating the `raw` of every parsed unit reproduces the original
//! input exactly, for any input and configuration.
//!
//! # Modules
//!
//! - [`tokenizer`] - Convert a raw body to a token stream
//! - [`parser`] - Grammar parsing and the [`ContentParser`] facade
//! - [`content`] - [`StringData`] and [`ParsedContent`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod content;
pub mod parser;
pub mod tokenizer;

pub use content::{ParsedContent, StringData};
pub use parser::{ContentParser, ContentParserOptions};
pub use tokenizer::{Token, TokenKind, Tokenizer};
