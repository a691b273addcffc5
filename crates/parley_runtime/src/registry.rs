//! The prompt registry.
//!
//! Tracks which `(channel, user)` pairs are currently inside a prompt
//! conversation. This is the one piece of state shared across concurrent
//! invocations; registration is released by an RAII guard so cleanup runs
//! on every exit path, including unwinds out of user-supplied callables.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use parley_foundation::{ChannelId, UserId};

/// Registry of active prompts, keyed by `(channel, user)`.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    inner: Mutex<HashSet<(ChannelId, UserId)>>,
}

impl PromptRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prompting pair. Returns false if it was already present.
    pub fn add(&self, channel: ChannelId, user: UserId) -> bool {
        self.inner.lock().insert((channel, user))
    }

    /// Removes a prompting pair. Returns false if it was not present.
    pub fn remove(&self, channel: ChannelId, user: UserId) -> bool {
        self.inner.lock().remove(&(channel, user))
    }

    /// Returns true if the pair is currently prompting.
    #[must_use]
    pub fn contains(&self, channel: ChannelId, user: UserId) -> bool {
        self.inner.lock().contains(&(channel, user))
    }

    /// Registers the pair for the lifetime of the returned guard.
    #[must_use]
    pub fn guard(self: &Arc<Self>, channel: ChannelId, user: UserId) -> PromptGuard {
        self.add(channel, user);
        PromptGuard {
            registry: Arc::clone(self),
            channel,
            user,
        }
    }
}

/// Removes its registration when dropped.
pub struct PromptGuard {
    registry: Arc<PromptRegistry>,
    channel: ChannelId,
    user: UserId,
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        self.registry.remove(self.channel, self.user);
    }
}
