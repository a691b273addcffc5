//! Prompt and defaulting configuration.
//!
//! Prompt options merge across three layers: handler defaults, then command
//! defaults, then the argument's own prompt, later layers winning field by
//! field. Text fields are either literal or computed at their single call
//! site.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parley_foundation::{Context, Flag, Value};

/// Per-turn information handed to text callables and modify hooks.
#[derive(Clone, Debug)]
pub struct PromptData {
    /// The current turn number, starting at 1.
    pub retries: usize,
    /// Whether the prompt collects infinitely.
    pub infinite: bool,
    /// The input of the previous turn (or the original phrase).
    pub phrase: String,
    /// The failure that led to this turn, if any.
    pub failure: Option<Flag>,
}

/// Information handed to default and otherwise callables.
#[derive(Clone, Debug)]
pub struct DefaultData {
    /// The phrase that was being processed; may be empty.
    pub phrase: String,
    /// The failure that triggered defaulting, if any.
    pub failure: Option<Flag>,
}

/// A message text, either literal or computed per call.
///
/// Rendering to an empty string legitimately means "stay silent".
#[derive(Clone)]
pub enum TextSource {
    /// A fixed text.
    Literal(String),
    /// Lines joined by newlines.
    Lines(Vec<String>),
    /// Computed from the invocation and the current turn.
    Computed(Arc<dyn Fn(&Context, &PromptData) -> String + Send + Sync>),
}

impl TextSource {
    /// Renders the text for one turn.
    #[must_use]
    pub fn render(&self, ctx: &Context, data: &PromptData) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Lines(lines) => lines.join("\n"),
            Self::Computed(f) => f(ctx, data),
        }
    }
}

impl From<&str> for TextSource {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for TextSource {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<Vec<String>> for TextSource {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl fmt::Debug for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Lines(lines) => f.debug_tuple("Lines").field(lines).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A default value, either literal or computed at defaulting time.
#[derive(Clone)]
pub enum ValueSource {
    /// A fixed value.
    Literal(Value),
    /// Computed from the invocation and the failure that led here.
    Computed(Arc<dyn Fn(&Context, &DefaultData) -> Value + Send + Sync>),
}

impl ValueSource {
    /// Resolves the default for one processing step.
    #[must_use]
    pub fn resolve(&self, ctx: &Context, data: &DefaultData) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Computed(f) => f(ctx, data),
        }
    }
}

impl From<Value> for ValueSource {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A hook rewriting a rendered text before it is sent.
pub type ModifyText = Arc<dyn Fn(&Context, &PromptData, String) -> String + Send + Sync>;

/// Prompt configuration. Every field is optional so that layers can merge.
#[derive(Clone, Default)]
pub struct PromptOptions {
    /// Text for the first turn.
    pub start: Option<TextSource>,
    /// Text for retry turns.
    pub retry: Option<TextSource>,
    /// Text sent when the prompt times out.
    pub timeout: Option<TextSource>,
    /// Text sent when retries are exhausted.
    pub ended: Option<TextSource>,
    /// Text sent when the user cancels.
    pub cancel: Option<TextSource>,
    /// Rewrites the rendered start text.
    pub modify_start: Option<ModifyText>,
    /// Rewrites the rendered retry text.
    pub modify_retry: Option<ModifyText>,
    /// Rewrites the rendered timeout text.
    pub modify_timeout: Option<ModifyText>,
    /// Rewrites the rendered ended text.
    pub modify_ended: Option<ModifyText>,
    /// Rewrites the rendered cancel text.
    pub modify_cancel: Option<ModifyText>,
    /// How many failed turns may follow the first one.
    pub retries: Option<usize>,
    /// Idle time-out for awaiting the user's reply.
    pub time: Option<Duration>,
    /// Word that cancels the prompt, case-insensitive.
    pub cancel_word: Option<String>,
    /// Word that ends infinite collection, case-insensitive.
    pub stop_word: Option<String>,
    /// Whether an empty phrase skips prompting and uses the default.
    pub optional: Option<bool>,
    /// Whether to collect values until the stop word or limit.
    pub infinite: Option<bool>,
    /// Maximum number of values collected in infinite mode.
    pub limit: Option<usize>,
    /// Whether input that looks like another command breaks out.
    pub breakout: Option<bool>,
}

impl PromptOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        macro_rules! pick {
            ($field:ident) => {
                other.$field.clone().or_else(|| self.$field.clone())
            };
        }
        Self {
            start: pick!(start),
            retry: pick!(retry),
            timeout: pick!(timeout),
            ended: pick!(ended),
            cancel: pick!(cancel),
            modify_start: pick!(modify_start),
            modify_retry: pick!(modify_retry),
            modify_timeout: pick!(modify_timeout),
            modify_ended: pick!(modify_ended),
            modify_cancel: pick!(modify_cancel),
            retries: pick!(retries),
            time: pick!(time),
            cancel_word: pick!(cancel_word),
            stop_word: pick!(stop_word),
            optional: pick!(optional),
            infinite: pick!(infinite),
            limit: pick!(limit),
            breakout: pick!(breakout),
        }
    }

    /// Sets the start text.
    #[must_use]
    pub fn with_start(mut self, text: impl Into<TextSource>) -> Self {
        self.start = Some(text.into());
        self
    }

    /// Sets the retry text.
    #[must_use]
    pub fn with_retry(mut self, text: impl Into<TextSource>) -> Self {
        self.retry = Some(text.into());
        self
    }

    /// Sets the timeout text.
    #[must_use]
    pub fn with_timeout_text(mut self, text: impl Into<TextSource>) -> Self {
        self.timeout = Some(text.into());
        self
    }

    /// Sets the ended text.
    #[must_use]
    pub fn with_ended(mut self, text: impl Into<TextSource>) -> Self {
        self.ended = Some(text.into());
        self
    }

    /// Sets the cancel text.
    #[must_use]
    pub fn with_cancel(mut self, text: impl Into<TextSource>) -> Self {
        self.cancel = Some(text.into());
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Sets the idle time-out.
    #[must_use]
    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the cancel word.
    #[must_use]
    pub fn with_cancel_word(mut self, word: impl Into<String>) -> Self {
        self.cancel_word = Some(word.into());
        self
    }

    /// Sets the stop word.
    #[must_use]
    pub fn with_stop_word(mut self, word: impl Into<String>) -> Self {
        self.stop_word = Some(word.into());
        self
    }

    /// Marks the argument optional.
    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Enables or disables infinite collection.
    #[must_use]
    pub fn with_infinite(mut self, infinite: bool) -> Self {
        self.infinite = Some(infinite);
        self
    }

    /// Sets the infinite-collection limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enables or disables breakout.
    #[must_use]
    pub fn with_breakout(mut self, breakout: bool) -> Self {
        self.breakout = Some(breakout);
        self
    }

    /// Resolves the merged options against the hard defaults.
    #[must_use]
    pub(crate) fn resolve(&self) -> EffectivePrompt {
        EffectivePrompt {
            start: self.start.clone(),
            retry: self.retry.clone(),
            timeout: self.timeout.clone(),
            ended: self.ended.clone(),
            cancel: self.cancel.clone(),
            modify_start: self.modify_start.clone(),
            modify_retry: self.modify_retry.clone(),
            modify_timeout: self.modify_timeout.clone(),
            modify_ended: self.modify_ended.clone(),
            modify_cancel: self.modify_cancel.clone(),
            retries: self.retries.unwrap_or(1),
            time: self.time.unwrap_or(Duration::from_secs(30)),
            cancel_word: self.cancel_word.clone().unwrap_or_else(|| "cancel".into()),
            stop_word: self.stop_word.clone().unwrap_or_else(|| "stop".into()),
            optional: self.optional.unwrap_or(false),
            infinite: self.infinite.unwrap_or(false),
            limit: self.limit.unwrap_or(usize::MAX),
            breakout: self.breakout.unwrap_or(true),
        }
    }
}

/// Fully-resolved prompt configuration for one collection.
pub(crate) struct EffectivePrompt {
    pub start: Option<TextSource>,
    pub retry: Option<TextSource>,
    pub timeout: Option<TextSource>,
    pub ended: Option<TextSource>,
    pub cancel: Option<TextSource>,
    pub modify_start: Option<ModifyText>,
    pub modify_retry: Option<ModifyText>,
    pub modify_timeout: Option<ModifyText>,
    pub modify_ended: Option<ModifyText>,
    pub modify_cancel: Option<ModifyText>,
    pub retries: usize,
    pub time: Duration,
    pub cancel_word: String,
    pub stop_word: String,
    pub optional: bool,
    pub infinite: bool,
    pub limit: usize,
    pub breakout: bool,
}

impl fmt::Debug for PromptOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptOptions")
            .field("start", &self.start)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("ended", &self.ended)
            .field("cancel", &self.cancel)
            .field("modify_hooks", &self.modify_start.is_some())
            .field("retries", &self.retries)
            .field("time", &self.time)
            .field("cancel_word", &self.cancel_word)
            .field("stop_word", &self.stop_word)
            .field("optional", &self.optional)
            .field("infinite", &self.infinite)
            .field("limit", &self.limit)
            .field("breakout", &self.breakout)
            .finish_non_exhaustive()
    }
}

/// Handler- or command-level argument defaults.
#[derive(Clone, Default)]
pub struct ArgumentDefaults {
    /// Prompt option defaults.
    pub prompt: PromptOptions,
    /// Default otherwise text.
    pub otherwise: Option<TextSource>,
    /// Default otherwise modify hook.
    pub modify_otherwise: Option<ModifyText>,
}

impl fmt::Debug for ArgumentDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDefaults")
            .field("prompt", &self.prompt)
            .field("otherwise", &self.otherwise)
            .field("modify_otherwise", &self.modify_otherwise.is_some())
            .finish()
    }
}
