//! The prompt engine.
//!
//! Drives a multi-turn conversation to obtain (or re-obtain) a value for an
//! argument: send start/retry text, await the author's next message under
//! an idle time-out, and interpret cancel/stop words, breakout, and cast
//! failures until a value is produced or the conversation terminates.

use tokio::time::timeout;
use tracing::debug;

use parley_foundation::{Context, Flag, Resolved, Result, Value};
use parley_types::CastContext;

use crate::argument::{Argument, MatchMode};
use crate::options::{EffectivePrompt, ModifyText, PromptData, TextSource};
use crate::runner::ArgumentRunner;

/// Which turn text is being rendered.
enum TurnText<'a> {
    Start(&'a EffectivePrompt),
    Retry(&'a EffectivePrompt),
    Timeout(&'a EffectivePrompt),
    Ended(&'a EffectivePrompt),
    Cancel(&'a EffectivePrompt),
}

impl<'a> TurnText<'a> {
    fn pieces(&self) -> (Option<&'a TextSource>, Option<&'a ModifyText>) {
        match self {
            Self::Start(o) => (o.start.as_ref(), o.modify_start.as_ref()),
            Self::Retry(o) => (o.retry.as_ref(), o.modify_retry.as_ref()),
            Self::Timeout(o) => (o.timeout.as_ref(), o.modify_timeout.as_ref()),
            Self::Ended(o) => (o.ended.as_ref(), o.modify_ended.as_ref()),
            Self::Cancel(o) => (o.cancel.as_ref(), o.modify_cancel.as_ref()),
        }
    }

    /// Renders the turn text and sends it unless it rendered to nothing.
    async fn send(self, ctx: &Context, data: &PromptData) -> Result<()> {
        let (source, hook) = self.pieces();
        let mut text = source
            .map(|s| s.render(ctx, data))
            .unwrap_or_default();
        if let Some(hook) = hook {
            text = hook(ctx, data, text);
        }
        if !text.is_empty() {
            ctx.send(&text).await?;
        }
        Ok(())
    }
}

impl Argument {
    /// Runs the prompt conversation for this argument.
    ///
    /// Returns the collected value (a [`Value::List`] in infinite mode), or
    /// a control flag: `Cancel` on time-out, cancel word, or exhausted
    /// retries; `Retry` when breakout recognizes another command.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures; the idle time-out is an
    /// expected outcome, not an error.
    pub async fn collect(
        &self,
        runner: &ArgumentRunner,
        ctx: &Context,
        command_input: &str,
        failure: Option<Flag>,
    ) -> Result<Resolved> {
        let options = runner.prompt_options(self).resolve();
        let infinite = options.infinite
            || (self.match_mode() == MatchMode::Separate && command_input.is_empty());

        // Registered for the whole collection; the guard unregisters on
        // every exit path.
        let _guard = runner.registry().guard(ctx.channel(), ctx.author());

        let mut values: Vec<Value> = Vec::new();
        let mut turn: usize = 1;
        let mut data = PromptData {
            retries: 1,
            infinite,
            phrase: command_input.to_string(),
            failure,
        };

        loop {
            data.retries = turn;
            let text = if turn <= 1 {
                TurnText::Start(&options)
            } else {
                TurnText::Retry(&options)
            };
            text.send(ctx, &data).await?;

            let message = match timeout(options.time, ctx.next_message()).await {
                Ok(Ok(message)) => message,
                Ok(Err(error)) => return Err(error),
                Err(_) => {
                    debug!(channel = %ctx.channel(), author = %ctx.author(), "prompt timed out");
                    TurnText::Timeout(&options).send(ctx, &data).await?;
                    return Ok(Resolved::Flag(Flag::Cancel));
                }
            };

            if options.breakout {
                if let Some(command) = ctx.probe_command(&message.content) {
                    debug!(command, "prompt breakout");
                    return Ok(Resolved::Flag(Flag::retry(message)));
                }
            }

            if message.content.eq_ignore_ascii_case(&options.cancel_word) {
                TurnText::Cancel(&options).send(ctx, &data).await?;
                return Ok(Resolved::Flag(Flag::Cancel));
            }

            if infinite && message.content.eq_ignore_ascii_case(&options.stop_word) {
                if values.is_empty() {
                    // Nothing collected yet; an empty completion would be
                    // meaningless, so this counts as a retry turn.
                    turn += 1;
                    data.phrase = message.content.clone();
                    data.failure = None;
                    continue;
                }
                return Ok(Resolved::Value(Value::List(values)));
            }

            let cx = CastContext {
                context: ctx,
                resolver: runner.resolver(),
            };
            let resolved = self.caster().cast(cx, &message.content).await?;

            if resolved.is_failure() {
                if turn <= options.retries {
                    turn += 1;
                    data.phrase = message.content.clone();
                    data.failure = match resolved {
                        Resolved::Flag(flag) => Some(flag),
                        Resolved::Value(_) => None,
                    };
                    continue;
                }
                TurnText::Ended(&options).send(ctx, &data).await?;
                return Ok(Resolved::Flag(Flag::Cancel));
            }

            let value = match resolved {
                Resolved::Value(value) => value,
                Resolved::Flag(flag) => return Ok(Resolved::Flag(flag)),
            };

            if infinite {
                values.push(value);
                if values.len() < options.limit {
                    turn = 1;
                    data.phrase.clear();
                    data.failure = None;
                    continue;
                }
                return Ok(Resolved::Value(Value::List(values)));
            }
            return Ok(Resolved::Value(value));
        }
    }
}
