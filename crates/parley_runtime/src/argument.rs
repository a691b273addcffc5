//! Argument specification and processing.
//!
//! An [`Argument`] describes one parameter of a command: how it claims
//! input (its match mode), how the claimed phrase becomes a typed value
//! (its caster), and what happens when the value is missing or fails to
//! cast (defaults, "otherwise" messaging, or an interactive prompt).
//!
//! Arguments are immutable; build one per parameter at command-load time
//! and reuse it across invocations.

use parley_foundation::{Context, Flag, Resolved, Result, Value};
use parley_parser::ContentParserOptions;
use parley_types::{CastContext, Caster};

use crate::options::{
    DefaultData, ModifyText, PromptData, PromptOptions, TextSource, ValueSource,
};
use crate::runner::ArgumentRunner;

/// How an argument claims input from the parsed content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// The next ordered phrase (or a fixed index, or an unordered scan).
    Phrase,
    /// The remaining phrases from the cursor, joined.
    Rest,
    /// Each remaining phrase processed separately into a list.
    Separate,
    /// Presence of a configured flag word.
    Flag,
    /// The value of a configured option flag.
    Option,
    /// All phrases from the start, joined.
    Text,
    /// Everything from the start, flags included.
    Content,
    /// Everything from the cursor, flags included.
    RestContent,
    /// Never consumes input; always processes an empty phrase.
    None,
}

/// Which phrases an unordered argument may scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Unordered {
    /// Ordered matching (the default).
    #[default]
    No,
    /// Scan every phrase.
    All,
    /// Scan phrases starting at an index.
    From(usize),
    /// Scan exactly these indices.
    Indices(Vec<usize>),
}

/// One command parameter: match mode, caster, and failure policy.
#[derive(Clone)]
pub struct Argument {
    match_mode: MatchMode,
    caster: Caster,
    flags: Vec<String>,
    multiple_flags: bool,
    index: Option<usize>,
    unordered: Unordered,
    limit: usize,
    prompt: Option<PromptOptions>,
    default: Option<ValueSource>,
    otherwise: Option<TextSource>,
    modify_otherwise: Option<ModifyText>,
}

impl Argument {
    /// Creates an argument with the given match mode and the `string`
    /// caster.
    #[must_use]
    pub fn new(match_mode: MatchMode) -> Self {
        Self {
            match_mode,
            caster: Caster::named("string"),
            flags: Vec::new(),
            multiple_flags: false,
            index: None,
            unordered: Unordered::No,
            limit: usize::MAX,
            prompt: None,
            default: None,
            otherwise: None,
            modify_otherwise: None,
        }
    }

    /// Sets the caster.
    #[must_use]
    pub fn with_caster(mut self, caster: impl Into<Caster>) -> Self {
        self.caster = caster.into();
        self
    }

    /// Sets the flag word(s) for `Flag`/`Option` match modes.
    #[must_use]
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Collects every matching flag instead of the first.
    #[must_use]
    pub fn with_multiple_flags(mut self, multiple: bool) -> Self {
        self.multiple_flags = multiple;
        self
    }

    /// Pins the argument to a fixed phrase index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the unordered scanning policy.
    #[must_use]
    pub fn with_unordered(mut self, unordered: Unordered) -> Self {
        self.unordered = unordered;
        self
    }

    /// Bounds how many phrases/values this argument may claim.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Configures an interactive prompt for missing/failed values.
    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptOptions) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Sets a literal default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ValueSource::Literal(value.into()));
        self
    }

    /// Sets a computed default value.
    #[must_use]
    pub fn with_default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &DefaultData) -> Value + Send + Sync + 'static,
    {
        self.default = Some(ValueSource::Computed(std::sync::Arc::new(f)));
        self
    }

    /// Sets the "otherwise" text sent instead of prompting or defaulting.
    #[must_use]
    pub fn with_otherwise(mut self, text: impl Into<TextSource>) -> Self {
        self.otherwise = Some(text.into());
        self
    }

    /// Sets the hook rewriting the rendered otherwise text.
    #[must_use]
    pub fn with_modify_otherwise(mut self, hook: ModifyText) -> Self {
        self.modify_otherwise = Some(hook);
        self
    }

    /// The match mode.
    #[must_use]
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// The caster.
    #[must_use]
    pub fn caster(&self) -> &Caster {
        &self.caster
    }

    /// The configured flag words.
    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Whether every matching flag is collected.
    #[must_use]
    pub fn multiple_flags(&self) -> bool {
        self.multiple_flags
    }

    /// The fixed phrase index, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The unordered scanning policy.
    #[must_use]
    pub fn unordered(&self) -> &Unordered {
        &self.unordered
    }

    /// The claim limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The prompt configuration, if any.
    #[must_use]
    pub fn prompt(&self) -> Option<&PromptOptions> {
        self.prompt.as_ref()
    }

    /// Processes one phrase through casting and the defaulting policy.
    ///
    /// # Errors
    ///
    /// Returns an error for fatal defects (unknown named type) and
    /// transport failures while sending configured messages.
    pub async fn process(
        &self,
        runner: &ArgumentRunner,
        ctx: &Context,
        phrase: &str,
    ) -> Result<Resolved> {
        let optional = runner.prompt_options(self).resolve().optional;

        if phrase.is_empty() && optional {
            if runner.otherwise_of(self).is_some() {
                return self.do_otherwise(runner, ctx, phrase, None).await;
            }
            return Ok(Resolved::Value(self.resolve_default(ctx, phrase, None)));
        }

        let cx = CastContext {
            context: ctx,
            resolver: runner.resolver(),
        };
        let resolved = self.caster.cast(cx, phrase).await?;
        if !resolved.is_failure() {
            return Ok(resolved);
        }
        let Resolved::Flag(failure) = resolved else {
            unreachable!("is_failure implies a flag");
        };

        if runner.otherwise_of(self).is_some() {
            return self.do_otherwise(runner, ctx, phrase, Some(failure)).await;
        }
        if self.prompt.is_some() {
            return self.collect(runner, ctx, phrase, Some(failure)).await;
        }
        if self.default.is_some() {
            return Ok(Resolved::Value(self.resolve_default(
                ctx,
                phrase,
                Some(failure),
            )));
        }
        Ok(Resolved::Flag(failure))
    }

    /// Renders and sends the effective otherwise text, then cancels.
    async fn do_otherwise(
        &self,
        runner: &ArgumentRunner,
        ctx: &Context,
        phrase: &str,
        failure: Option<Flag>,
    ) -> Result<Resolved> {
        let data = PromptData {
            retries: 0,
            infinite: false,
            phrase: phrase.to_string(),
            failure,
        };
        let mut text = runner
            .otherwise_of(self)
            .map(|source| source.render(ctx, &data))
            .unwrap_or_default();
        if let Some(hook) = runner.modify_otherwise_of(self) {
            text = hook(ctx, &data, text);
        }
        if !text.is_empty() {
            ctx.send(&text).await?;
        }
        Ok(Resolved::Flag(Flag::Cancel))
    }

    fn resolve_default(&self, ctx: &Context, phrase: &str, failure: Option<Flag>) -> Value {
        let data = DefaultData {
            phrase: phrase.to_string(),
            failure,
        };
        self.default
            .as_ref()
            .map_or(Value::Null, |source| source.resolve(ctx, &data))
    }

    pub(crate) fn otherwise(&self) -> Option<&TextSource> {
        self.otherwise.as_ref()
    }

    pub(crate) fn modify_otherwise(&self) -> Option<&ModifyText> {
        self.modify_otherwise.as_ref()
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("match_mode", &self.match_mode)
            .field("caster", &self.caster)
            .field("flags", &self.flags)
            .field("multiple_flags", &self.multiple_flags)
            .field("index", &self.index)
            .field("unordered", &self.unordered)
            .field("limit", &self.limit)
            .field("prompt", &self.prompt)
            .field("default", &self.default)
            .field("otherwise", &self.otherwise)
            .finish_non_exhaustive()
    }
}

/// Derives tokenizer configuration from a command's argument list, the way
/// flag grammars are declared at command-load time.
#[must_use]
pub fn content_parser_options(args: &[(String, Argument)]) -> ContentParserOptions {
    let mut options = ContentParserOptions::default();
    for (_, arg) in args {
        match arg.match_mode() {
            MatchMode::Flag => options
                .flag_words
                .extend(arg.flags().iter().cloned()),
            MatchMode::Option => options
                .option_flag_words
                .extend(arg.flags().iter().cloned()),
            _ => {}
        }
    }
    options
}
