//! The argument runner.
//!
//! Threads a shared cursor ([`RunnerState`]) across a sequence of
//! arguments, dispatching each by match mode, accumulating the typed value
//! bag, and short-circuiting on control flags.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use parley_foundation::{Context, Flag, Resolved, Result, Value};
use parley_parser::{ParsedContent, StringData};
use parley_types::{CastContext, TypeResolver};

use crate::argument::{Argument, MatchMode, Unordered};
use crate::options::{ArgumentDefaults, ModifyText, PromptOptions, TextSource};
use crate::registry::PromptRegistry;

/// The accumulated typed values of one run, keyed by argument id.
pub type Values = HashMap<String, Value>;

/// Cursor state shared across the arguments of one `run` call.
///
/// Exclusively owned by that call; never shared across concurrent runs.
#[derive(Clone, Debug, Default)]
pub struct RunnerState {
    /// Absolute phrase indices claimed by unordered arguments.
    pub used_indices: HashSet<usize>,
    /// The next ordered phrase. Monotonic, clamped to the phrase count.
    pub phrase_index: usize,
    /// Cursor into `all`, pointing past consumed phrases; determines the
    /// unconsumed remainder handed to a `Continue` flag.
    pub index: usize,
}

/// One step yielded by an [`ArgumentGenerator`].
#[derive(Debug)]
pub enum Step {
    /// Process this argument next, storing its value under the id.
    Argument(String, Argument),
    /// Short-circuit the run with this flag.
    Flag(Flag),
    /// The sequence is complete.
    Done,
}

/// Lazily yields the argument sequence, possibly depending on the values
/// accumulated so far.
pub trait ArgumentGenerator: Send {
    /// Produces the next step given the bag of values so far.
    fn next(&mut self, values: &Values) -> Step;
}

/// Adapts a static ordered list of `(id, Argument)` pairs.
pub struct FromArguments {
    items: std::vec::IntoIter<(String, Argument)>,
}

impl ArgumentGenerator for FromArguments {
    fn next(&mut self, _values: &Values) -> Step {
        match self.items.next() {
            Some((id, argument)) => Step::Argument(id, argument),
            None => Step::Done,
        }
    }
}

/// Adapts a static ordered argument list into the generator protocol.
#[must_use]
pub fn from_arguments(args: Vec<(String, Argument)>) -> FromArguments {
    FromArguments {
        items: args.into_iter(),
    }
}

/// The terminal outcome of a run: the value bag, or a short-circuit flag.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every argument resolved; the typed value bag.
    Values(Values),
    /// A step short-circuited: `Cancel` aborts the invocation, `Continue`
    /// redirects to another command, `Retry` reprocesses a fresh message.
    Flag(Flag),
}

impl RunOutcome {
    /// The value bag, if the run completed.
    #[must_use]
    pub fn values(&self) -> Option<&Values> {
        match self {
            Self::Values(values) => Some(values),
            Self::Flag(_) => None,
        }
    }

    /// The short-circuit flag, if any.
    #[must_use]
    pub fn flag(&self) -> Option<&Flag> {
        match self {
            Self::Values(_) => None,
            Self::Flag(flag) => Some(flag),
        }
    }
}

/// Drives argument sequences against parsed content.
///
/// One runner is configured per handler (type resolver, prompt registry,
/// handler-level defaults) and may be specialized with command-level
/// defaults; `run` itself is reentrant across invocations.
pub struct ArgumentRunner {
    resolver: Arc<TypeResolver>,
    registry: Arc<PromptRegistry>,
    handler_defaults: ArgumentDefaults,
    command_defaults: ArgumentDefaults,
}

impl ArgumentRunner {
    /// Creates a runner over the given type resolver.
    #[must_use]
    pub fn new(resolver: Arc<TypeResolver>) -> Self {
        Self {
            resolver,
            registry: Arc::new(PromptRegistry::new()),
            handler_defaults: ArgumentDefaults::default(),
            command_defaults: ArgumentDefaults::default(),
        }
    }

    /// Shares a prompt registry across runners.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<PromptRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Sets handler-level argument defaults.
    #[must_use]
    pub fn with_handler_defaults(mut self, defaults: ArgumentDefaults) -> Self {
        self.handler_defaults = defaults;
        self
    }

    /// Sets command-level argument defaults.
    #[must_use]
    pub fn with_command_defaults(mut self, defaults: ArgumentDefaults) -> Self {
        self.command_defaults = defaults;
        self
    }

    /// The type resolver.
    #[must_use]
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// The shared prompt registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<PromptRegistry> {
        &self.registry
    }

    /// The merged prompt options for an argument:
    /// handler < command < argument, later layers winning.
    pub(crate) fn prompt_options(&self, argument: &Argument) -> PromptOptions {
        let merged = self
            .handler_defaults
            .prompt
            .merged(&self.command_defaults.prompt);
        match argument.prompt() {
            Some(prompt) => merged.merged(prompt),
            None => merged,
        }
    }

    /// The effective otherwise text: argument, else command, else handler.
    pub(crate) fn otherwise_of<'a>(&'a self, argument: &'a Argument) -> Option<&'a TextSource> {
        argument
            .otherwise()
            .or(self.command_defaults.otherwise.as_ref())
            .or(self.handler_defaults.otherwise.as_ref())
    }

    /// The effective otherwise modify hook, resolved like the text.
    pub(crate) fn modify_otherwise_of<'a>(
        &'a self,
        argument: &'a Argument,
    ) -> Option<&'a ModifyText> {
        argument
            .modify_otherwise()
            .or(self.command_defaults.modify_otherwise.as_ref())
            .or(self.handler_defaults.modify_otherwise.as_ref())
    }

    /// Runs an argument sequence against parsed content.
    ///
    /// Returns the typed value bag, or the first short-circuit flag; later
    /// generator steps are never invoked after a short-circuit.
    ///
    /// # Errors
    ///
    /// Returns an error for fatal defects (unknown named type) and
    /// transport failures.
    pub async fn run(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        mut generator: impl ArgumentGenerator,
    ) -> Result<RunOutcome> {
        let mut state = RunnerState::default();
        let mut values = Values::new();

        loop {
            match generator.next(&values) {
                Step::Done => return Ok(RunOutcome::Values(values)),
                Step::Flag(flag) => {
                    return Ok(RunOutcome::Flag(Self::augment_rest(parsed, &state, flag)));
                }
                Step::Argument(id, argument) => {
                    trace!(id = %id, mode = ?argument.match_mode(), "running argument");
                    let resolved = self.run_one(ctx, parsed, &mut state, &argument).await?;
                    if resolved.is_short_circuit() {
                        let Resolved::Flag(flag) = resolved else {
                            unreachable!("short circuit implies a flag");
                        };
                        trace!(id = %id, ?flag, "short circuit");
                        return Ok(RunOutcome::Flag(Self::augment_rest(parsed, &state, flag)));
                    }
                    values.insert(id, resolved.into_bag_value());
                }
            }
        }
    }

    async fn run_one(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        state: &mut RunnerState,
        argument: &Argument,
    ) -> Result<Resolved> {
        match argument.match_mode() {
            MatchMode::Phrase => self.run_phrase(ctx, parsed, state, argument).await,
            MatchMode::Rest => self.run_rest(ctx, parsed, state, argument).await,
            MatchMode::Separate => self.run_separate(ctx, parsed, state, argument).await,
            MatchMode::Flag => Ok(Self::run_flag(parsed, argument)),
            MatchMode::Option => self.run_option(ctx, parsed, argument).await,
            MatchMode::Text => self.run_text(ctx, parsed, argument).await,
            MatchMode::Content => self.run_content(ctx, parsed, argument).await,
            MatchMode::RestContent => self.run_rest_content(ctx, parsed, state, argument).await,
            MatchMode::None => argument.process(self, ctx, "").await,
        }
    }

    async fn run_phrase(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        state: &mut RunnerState,
        argument: &Argument,
    ) -> Result<Resolved> {
        if *argument.unordered() != Unordered::No {
            let candidates: Vec<usize> = match argument.unordered() {
                Unordered::All => (0..parsed.phrase_count()).collect(),
                Unordered::From(start) => (*start..parsed.phrase_count()).collect(),
                Unordered::Indices(indices) => indices.clone(),
                Unordered::No => unreachable!(),
            };

            for i in candidates {
                if state.used_indices.contains(&i) {
                    continue;
                }
                let Some(phrase) = parsed.phrase_value(i) else {
                    continue;
                };
                let cx = CastContext {
                    context: ctx,
                    resolver: self.resolver(),
                };
                let resolved = argument.caster().cast(cx, phrase).await?;
                if !resolved.is_failure() {
                    state.used_indices.insert(i);
                    return Ok(resolved);
                }
            }
            // No candidate cast successfully; run the full defaulting
            // machinery on an empty phrase.
            return argument.process(self, ctx, "").await;
        }

        let index = argument.index().unwrap_or(state.phrase_index);
        let phrase = parsed.phrase_value(index).unwrap_or("");
        let resolved = argument.process(self, ctx, phrase).await?;
        if argument.index().is_none() {
            Self::increase_index(parsed, state, 1);
        }
        Ok(resolved)
    }

    async fn run_rest(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        state: &mut RunnerState,
        argument: &Argument,
    ) -> Result<Resolved> {
        let index = argument.index().unwrap_or(state.phrase_index);
        let rest = Self::join_phrase_raws(parsed, index, argument.limit());
        let resolved = argument.process(self, ctx, rest.trim()).await?;
        if argument.index().is_none() {
            Self::increase_index(parsed, state, argument.limit());
        }
        Ok(resolved)
    }

    async fn run_separate(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        state: &mut RunnerState,
        argument: &Argument,
    ) -> Result<Resolved> {
        let index = argument.index().unwrap_or(state.phrase_index);
        let end = index
            .saturating_add(argument.limit())
            .min(parsed.phrase_count());

        if index >= end {
            return argument.process(self, ctx, "").await;
        }

        let mut results = Vec::new();
        for i in index..end {
            let phrase = parsed.phrase_value(i).unwrap_or("");
            let resolved = argument.process(self, ctx, phrase).await?;
            if resolved.is_short_circuit() {
                return Ok(resolved);
            }
            results.push(resolved.into_bag_value());
        }

        if argument.index().is_none() {
            Self::increase_index(parsed, state, argument.limit());
        }
        Ok(Resolved::Value(Value::List(results)))
    }

    fn run_flag(parsed: &ParsedContent, argument: &Argument) -> Resolved {
        let keys: Vec<&str> = argument.flags().iter().map(String::as_str).collect();
        if argument.multiple_flags() {
            Resolved::Value(Value::from(parsed.flag_count(&keys)))
        } else {
            Resolved::Value(Value::Bool(parsed.has_flag(&keys)))
        }
    }

    async fn run_option(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        argument: &Argument,
    ) -> Result<Resolved> {
        let keys: Vec<&str> = argument.flags().iter().map(String::as_str).collect();

        if argument.multiple_flags() {
            let found: Vec<String> = parsed
                .option_flag_values(&keys)
                .into_iter()
                .take(argument.limit())
                .map(str::to_string)
                .collect();
            let mut results = Vec::new();
            for value in &found {
                let resolved = argument.process(self, ctx, value).await?;
                if resolved.is_short_circuit() {
                    return Ok(resolved);
                }
                results.push(resolved.into_bag_value());
            }
            return Ok(Resolved::Value(Value::List(results)));
        }

        let value = parsed.option_flag(&keys).unwrap_or("").to_string();
        argument.process(self, ctx, &value).await
    }

    async fn run_text(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        argument: &Argument,
    ) -> Result<Resolved> {
        let index = argument.index().unwrap_or(0);
        let text = Self::join_phrase_raws(parsed, index, argument.limit());
        argument.process(self, ctx, text.trim()).await
    }

    async fn run_content(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        argument: &Argument,
    ) -> Result<Resolved> {
        let index = argument.index().unwrap_or(0);
        let content = Self::join_all_raws(parsed, index, argument.limit());
        argument.process(self, ctx, content.trim()).await
    }

    async fn run_rest_content(
        &self,
        ctx: &Context,
        parsed: &ParsedContent,
        state: &mut RunnerState,
        argument: &Argument,
    ) -> Result<Resolved> {
        let index = argument.index().unwrap_or(state.index);
        let content = Self::join_all_raws(parsed, index, argument.limit());
        let resolved = argument.process(self, ctx, content.trim()).await?;
        if argument.index().is_none() {
            Self::increase_index(parsed, state, argument.limit());
        }
        Ok(resolved)
    }

    fn join_phrase_raws(parsed: &ParsedContent, index: usize, limit: usize) -> String {
        let end = index.saturating_add(limit).min(parsed.phrase_count());
        (index..end)
            .filter_map(|i| parsed.phrase(i))
            .map(StringData::raw)
            .collect()
    }

    fn join_all_raws(parsed: &ParsedContent, index: usize, limit: usize) -> String {
        let all = parsed.all();
        let end = index.saturating_add(limit).min(all.len());
        all.get(index.min(all.len())..end)
            .unwrap_or(&[])
            .iter()
            .map(StringData::raw)
            .collect()
    }

    /// Advances the ordered cursor by `n` phrases, clamped at the end of
    /// the content; advancing past the end is a no-op, not an error.
    pub fn increase_index(parsed: &ParsedContent, state: &mut RunnerState, n: usize) {
        state.phrase_index = state
            .phrase_index
            .saturating_add(n)
            .min(parsed.phrase_count());

        let all = parsed.all();
        let mut remaining = n;
        while remaining > 0 && state.index < all.len() {
            loop {
                state.index += 1;
                if state.index >= all.len() || all[state.index].is_phrase() {
                    break;
                }
            }
            remaining -= 1;
        }
        state.index = state.index.min(all.len());
    }

    /// Fills a `Continue` flag's rest with the unconsumed remainder.
    fn augment_rest(parsed: &ParsedContent, state: &RunnerState, mut flag: Flag) -> Flag {
        if let Flag::Continue { rest, .. } = &mut flag {
            let all = parsed.all();
            let remainder: String = all[state.index.min(all.len())..]
                .iter()
                .map(StringData::raw)
                .collect();
            *rest = Some(remainder.trim().to_string());
        }
        flag
    }
}
