//! Core types for the parley argument engine.
//!
//! This crate provides:
//! - [`Value`] - The dynamically-typed result of casting a phrase
//! - [`Flag`] - Control-flow signals (cancel, retry, continue, fail)
//! - [`Error`] - Fatal configuration and transport errors
//! - [`Context`], [`Messenger`], [`CommandProbe`] - The host capability
//!   boundary, keeping the engine free of any chat-SDK dependency

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod error;
pub mod flag;
pub mod message;
pub mod value;

pub use context::Context;
pub use error::{Error, Result};
pub use flag::{Flag, Resolved};
pub use message::{ChannelId, CommandProbe, Message, Messenger, UserId};
pub use value::{TaggedValue, Value};
