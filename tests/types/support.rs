//! Shared test support for casting without a live transport.

use std::sync::Arc;

use async_trait::async_trait;

use parley_foundation::{
    ChannelId, Context, Error, Message, Messenger, Resolved, Result, UserId,
};
use parley_types::{CastContext, Caster, TypeResolver};

/// A messenger for tests that never perform I/O.
pub struct NullMessenger;

#[async_trait]
impl Messenger for NullMessenger {
    async fn send(&self, channel: ChannelId, content: &str) -> Result<Message> {
        Ok(Message {
            id: 0,
            author: UserId(0),
            channel,
            content: content.to_string(),
        })
    }

    async fn next_message(&self, _channel: ChannelId, _author: UserId) -> Result<Message> {
        Err(Error::transport("no transport in type tests"))
    }
}

/// Casts one phrase with a fresh context and the built-in resolver.
pub async fn cast(caster: &Caster, phrase: &str) -> Resolved {
    let context = Context::new(UserId(1), ChannelId(2), Arc::new(NullMessenger));
    let resolver = TypeResolver::new();
    let cx = CastContext {
        context: &context,
        resolver: &resolver,
    };
    caster.cast(cx, phrase).await.expect("no fatal errors")
}
