//! Per-invocation context.
//!
//! One [`Context`] exists per command invocation. It carries the author and
//! channel the invocation came from, the host capabilities, and a log of
//! every message the engine sent on its behalf.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::message::{ChannelId, CommandProbe, Message, Messenger, UserId};

/// Per-invocation state and host capabilities.
pub struct Context {
    author: UserId,
    channel: ChannelId,
    messenger: Arc<dyn Messenger>,
    probe: Option<Arc<dyn CommandProbe>>,
    sent: Mutex<Vec<Message>>,
}

impl Context {
    /// Creates a context for an invocation by `author` in `channel`.
    #[must_use]
    pub fn new(author: UserId, channel: ChannelId, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            author,
            channel,
            messenger,
            probe: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Attaches a host command probe, enabling prompt breakout.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn CommandProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// The author of the invocation.
    #[must_use]
    pub fn author(&self) -> UserId {
        self.author
    }

    /// The channel the invocation came from.
    #[must_use]
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Sends `content` to the invocation's channel and records the result.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the host.
    pub async fn send(&self, content: &str) -> Result<Message> {
        let message = self.messenger.send(self.channel, content).await?;
        self.sent.lock().push(message.clone());
        Ok(message)
    }

    /// Waits for the next message from the invocation's author.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the host.
    pub async fn next_message(&self) -> Result<Message> {
        self.messenger.next_message(self.channel, self.author).await
    }

    /// Asks the host whether `content` looks like a command invocation.
    ///
    /// Returns `None` when no probe is attached.
    #[must_use]
    pub fn probe_command(&self, content: &str) -> Option<String> {
        self.probe.as_ref().and_then(|p| p.probe(content))
    }

    /// Messages sent through this context, in send order.
    #[must_use]
    pub fn sent_messages(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }
}
