//! The host capability boundary.
//!
//! The engine has no compile-time dependency on any particular chat SDK.
//! The host supplies a [`Messenger`] for transport and, optionally, a
//! [`CommandProbe`] so prompts can recognize an attempt to invoke a
//! different command.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Identifies a user on the host platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Identifies a channel on the host platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message on the host platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Host-assigned message id.
    pub id: u64,
    /// The author of the message.
    pub author: UserId,
    /// The channel the message was posted in.
    pub channel: ChannelId,
    /// The raw text body.
    pub content: String,
}

/// Transport capability supplied by the host.
///
/// `next_message` resolves when the given author next posts in the given
/// channel. The prompt engine bounds it with an idle time-out; the host
/// implementation does not need to time out on its own.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends `content` to `channel`, returning the sent message.
    async fn send(&self, channel: ChannelId, content: &str) -> Result<Message>;

    /// Waits for the next message from `author` in `channel`.
    async fn next_message(&self, channel: ChannelId, author: UserId) -> Result<Message>;
}

/// Host command recognition, used only for prompt breakout.
///
/// The probe re-runs the host's command-parse routine as a predicate. It is
/// not assumed to be side-effect-free; the engine simply asks the host once
/// per prompt turn.
pub trait CommandProbe: Send + Sync {
    /// Returns the id of the command `content` appears to invoke, if any.
    fn probe(&self, content: &str) -> Option<String>;
}
