//! The type-caster algebra.
//!
//! A [`Caster`] attempts to turn one phrase into a typed [`Value`]. Casters
//! compose: unions, products, pipelines, validation, and provenance
//! tagging all preserve the single failure convention — failure is
//! [`Flag::Fail`], tested with [`Resolved::is_failure`].
//!
//! Casters see one phrase at a time, never touch the token stream, and may
//! suspend (user-supplied casters can be async).

use std::fmt;
use std::sync::Arc;

use futures_core::future::BoxFuture;

use parley_foundation::{Context, Error, Resolved, Result, Value};

use crate::resolver::TypeResolver;

/// Everything a caster may consult while casting.
#[derive(Clone, Copy)]
pub struct CastContext<'a> {
    /// The invocation the phrase came from.
    pub context: &'a Context,
    /// Named type lookup.
    pub resolver: &'a TypeResolver,
}

/// A user-supplied caster function, possibly asynchronous.
pub trait CastFn: Send + Sync {
    /// Attempts to cast `phrase`.
    fn call<'a>(&'a self, cx: CastContext<'a>, phrase: &'a str) -> BoxFuture<'a, Result<Resolved>>;
}

/// A validation predicate for [`Caster::validate`].
pub type Predicate = Arc<dyn for<'a> Fn(CastContext<'a>, &'a str, &Value) -> bool + Send + Sync>;

/// A composable phrase-to-value caster.
#[derive(Clone)]
pub enum Caster {
    /// Case-insensitive synonym groups; the first entry of the matching
    /// group is canonical.
    Literals(Vec<Vec<String>>),
    /// A regular expression; produces the matched text, or every match
    /// when `all` is set.
    Pattern {
        /// The expression to match against the phrase.
        regex: regex::Regex,
        /// Whether to collect all matches instead of the first.
        all: bool,
    },
    /// A type resolved by name at cast time.
    Named(String),
    /// An arbitrary caster function.
    Function(Arc<dyn CastFn>),
    /// First success wins.
    Union(Vec<Caster>),
    /// All must succeed, producing their results in order.
    Product(Vec<Caster>),
    /// Success only if the inner caster succeeds and the predicate holds.
    Validate {
        /// The caster whose result is validated.
        inner: Box<Caster>,
        /// Predicate over (context, phrase, value).
        predicate: Predicate,
    },
    /// Bounds the numeric value, or the length of a non-numeric result.
    Range {
        /// The caster whose result is bounded.
        inner: Box<Caster>,
        /// Inclusive lower bound.
        min: f64,
        /// Upper bound; inclusive only when `inclusive` is set.
        max: f64,
        /// Whether `max` itself is accepted.
        inclusive: bool,
    },
    /// Pipes each result as the input phrase of the next caster; stops at
    /// the first failure.
    Compose(Vec<Caster>),
    /// Like [`Caster::Compose`] but keeps piping through failures, letting
    /// a later stage recover.
    ComposeWithFailure(Vec<Caster>),
    /// Wraps success or failure with the input phrase.
    WithInput(Box<Caster>),
    /// Wraps success or failure with a tag.
    Tagged {
        /// The caster whose result is tagged.
        inner: Box<Caster>,
        /// The tag to attach.
        tag: String,
    },
    /// Wraps success or failure with both a tag and the input phrase.
    TaggedWithInput {
        /// The caster whose result is tagged.
        inner: Box<Caster>,
        /// The tag to attach.
        tag: String,
    },
    /// A union of tagged alternatives, so the caller learns which matched.
    TaggedUnion(Vec<(String, Caster)>),
}

impl Caster {
    /// A caster matching any of `words` case-insensitively, producing the
    /// matched word in its configured casing.
    #[must_use]
    pub fn words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Literals(words.into_iter().map(|w| vec![w.into()]).collect())
    }

    /// A caster over synonym groups; produces the matching group's first
    /// (canonical) entry.
    #[must_use]
    pub fn literals<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Literals(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// A caster producing the first regex match of the phrase.
    #[must_use]
    pub fn pattern(regex: regex::Regex) -> Self {
        Self::Pattern { regex, all: false }
    }

    /// A caster producing every regex match of the phrase.
    #[must_use]
    pub fn pattern_all(regex: regex::Regex) -> Self {
        Self::Pattern { regex, all: true }
    }

    /// A caster resolved by name through the [`TypeResolver`].
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps a synchronous caster function. Returning `None` signals
    /// failure.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Context, &str) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        struct SyncFn<F>(F);
        impl<F> CastFn for SyncFn<F>
        where
            F: Fn(&Context, &str) -> Result<Option<Value>> + Send + Sync,
        {
            fn call<'a>(
                &'a self,
                cx: CastContext<'a>,
                phrase: &'a str,
            ) -> BoxFuture<'a, Result<Resolved>> {
                let result = (self.0)(cx.context, phrase).map(Resolved::from);
                Box::pin(std::future::ready(result))
            }
        }
        Self::Function(Arc::new(SyncFn(f)))
    }

    /// Wraps an arbitrary, possibly asynchronous caster.
    #[must_use]
    pub fn from_cast_fn(f: impl CastFn + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// First success wins.
    #[must_use]
    pub fn union(casters: impl IntoIterator<Item = Caster>) -> Self {
        Self::Union(casters.into_iter().collect())
    }

    /// All must succeed; results are collected in order.
    #[must_use]
    pub fn product(casters: impl IntoIterator<Item = Caster>) -> Self {
        Self::Product(casters.into_iter().collect())
    }

    /// Success only when `predicate` also holds.
    #[must_use]
    pub fn validate<F>(self, predicate: F) -> Self
    where
        F: for<'a> Fn(CastContext<'a>, &'a str, &Value) -> bool + Send + Sync + 'static,
    {
        Self::Validate {
            inner: Box::new(self),
            predicate: Arc::new(predicate),
        }
    }

    /// Bounds the result between `min` and `max`.
    #[must_use]
    pub fn range(self, min: f64, max: f64, inclusive: bool) -> Self {
        Self::Range {
            inner: Box::new(self),
            min,
            max,
            inclusive,
        }
    }

    /// Pipes casters left to right, stopping at the first failure.
    #[must_use]
    pub fn compose(casters: impl IntoIterator<Item = Caster>) -> Self {
        Self::Compose(casters.into_iter().collect())
    }

    /// Pipes casters left to right, continuing through failures.
    #[must_use]
    pub fn compose_with_failure(casters: impl IntoIterator<Item = Caster>) -> Self {
        Self::ComposeWithFailure(casters.into_iter().collect())
    }

    /// Attaches the input phrase to the result.
    #[must_use]
    pub fn with_input(self) -> Self {
        Self::WithInput(Box::new(self))
    }

    /// Attaches `tag` to the result.
    #[must_use]
    pub fn tagged(self, tag: impl Into<String>) -> Self {
        Self::Tagged {
            inner: Box::new(self),
            tag: tag.into(),
        }
    }

    /// Attaches both `tag` and the input phrase to the result.
    #[must_use]
    pub fn tagged_with_input(self, tag: impl Into<String>) -> Self {
        Self::TaggedWithInput {
            inner: Box::new(self),
            tag: tag.into(),
        }
    }

    /// A union of tagged alternatives.
    #[must_use]
    pub fn tagged_union<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Caster)>,
        S: Into<String>,
    {
        Self::TaggedUnion(pairs.into_iter().map(|(tag, c)| (tag.into(), c)).collect())
    }

    /// Attempts to cast `phrase` into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal defects: an unregistered named type,
    /// or an error raised by a user-supplied caster.
    pub fn cast<'a>(
        &'a self,
        cx: CastContext<'a>,
        phrase: &'a str,
    ) -> BoxFuture<'a, Result<Resolved>> {
        Box::pin(async move {
            match self {
                Self::Literals(groups) => Ok(cast_literals(groups, phrase)),
                Self::Pattern { regex, all } => Ok(cast_pattern(regex, *all, phrase)),
                Self::Named(name) => {
                    let caster = cx
                        .resolver
                        .lookup(name)
                        .ok_or_else(|| Error::unknown_type(name.clone()))?;
                    caster.cast(cx, phrase).await
                }
                Self::Function(f) => f.call(cx, phrase).await,
                Self::Union(casters) => {
                    let mut last = Resolved::fail(None);
                    for caster in casters {
                        let resolved = caster.cast(cx, phrase).await?;
                        if !resolved.is_failure() {
                            return Ok(resolved);
                        }
                        last = resolved;
                    }
                    Ok(last)
                }
                Self::Product(casters) => {
                    let mut values = Vec::with_capacity(casters.len());
                    for caster in casters {
                        match caster.cast(cx, phrase).await? {
                            Resolved::Value(value) => values.push(value),
                            flag => return Ok(flag),
                        }
                    }
                    Ok(Resolved::Value(Value::List(values)))
                }
                Self::Validate { inner, predicate } => {
                    match inner.cast(cx, phrase).await? {
                        Resolved::Value(value) if predicate(cx, phrase, &value) => {
                            Ok(Resolved::Value(value))
                        }
                        Resolved::Value(_) => Ok(Resolved::fail(Some(Value::from(phrase)))),
                        flag => Ok(flag),
                    }
                }
                Self::Range {
                    inner,
                    min,
                    max,
                    inclusive,
                } => match inner.cast(cx, phrase).await? {
                    Resolved::Value(value) => {
                        let measure = value
                            .as_number()
                            .or_else(|| value.len().map(|n| n as f64));
                        let in_range = measure.is_some_and(|x| {
                            x >= *min && if *inclusive { x <= *max } else { x < *max }
                        });
                        if in_range {
                            Ok(Resolved::Value(value))
                        } else {
                            Ok(Resolved::fail(Some(Value::from(phrase))))
                        }
                    }
                    flag => Ok(flag),
                },
                Self::Compose(casters) => {
                    let mut input = phrase.to_string();
                    let mut last = Resolved::Value(Value::from(phrase));
                    for caster in casters {
                        match caster.cast(cx, &input).await? {
                            Resolved::Value(value) => {
                                input = value.to_string();
                                last = Resolved::Value(value);
                            }
                            flag => return Ok(flag),
                        }
                    }
                    Ok(last)
                }
                Self::ComposeWithFailure(casters) => {
                    let mut input = phrase.to_string();
                    let mut last = Resolved::Value(Value::from(phrase));
                    for caster in casters {
                        match caster.cast(cx, &input).await? {
                            Resolved::Value(value) => {
                                input = value.to_string();
                                last = Resolved::Value(value);
                            }
                            Resolved::Flag(parley_foundation::Flag::Fail { value }) => {
                                input = value
                                    .as_ref()
                                    .map(ToString::to_string)
                                    .unwrap_or_default();
                                last = Resolved::fail(value);
                            }
                            flag => return Ok(flag),
                        }
                    }
                    Ok(last)
                }
                Self::WithInput(inner) => {
                    Ok(wrap(inner.cast(cx, phrase).await?, None, Some(phrase)))
                }
                Self::Tagged { inner, tag } => {
                    Ok(wrap(inner.cast(cx, phrase).await?, Some(tag.as_str()), None))
                }
                Self::TaggedWithInput { inner, tag } => Ok(wrap(
                    inner.cast(cx, phrase).await?,
                    Some(tag.as_str()),
                    Some(phrase),
                )),
                Self::TaggedUnion(pairs) => {
                    let mut last = Resolved::fail(None);
                    for (tag, caster) in pairs {
                        let resolved =
                            wrap(caster.cast(cx, phrase).await?, Some(tag.as_str()), None);
                        if !resolved.is_failure() {
                            return Ok(resolved);
                        }
                        last = resolved;
                    }
                    Ok(last)
                }
            }
        })
    }
}

fn cast_literals(groups: &[Vec<String>], phrase: &str) -> Resolved {
    for group in groups {
        if group.iter().any(|entry| entry.eq_ignore_ascii_case(phrase)) {
            if let Some(canonical) = group.first() {
                return Resolved::value(canonical.as_str());
            }
        }
    }
    Resolved::fail(Some(Value::from(phrase)))
}

fn cast_pattern(regex: &regex::Regex, all: bool, phrase: &str) -> Resolved {
    if all {
        let matches: Vec<Value> = regex
            .find_iter(phrase)
            .map(|m| Value::from(m.as_str()))
            .collect();
        if matches.is_empty() {
            Resolved::fail(Some(Value::from(phrase)))
        } else {
            Resolved::Value(Value::List(matches))
        }
    } else {
        match regex.find(phrase) {
            Some(m) => Resolved::value(m.as_str()),
            None => Resolved::fail(Some(Value::from(phrase))),
        }
    }
}

/// Wraps an outcome with provenance, on success and on failure alike.
fn wrap(resolved: Resolved, tag: Option<&str>, input: Option<&str>) -> Resolved {
    let tag = tag.map(str::to_string);
    let input = input.map(str::to_string);
    match resolved {
        Resolved::Value(value) => Resolved::Value(Value::tagged(tag, input, value)),
        Resolved::Flag(parley_foundation::Flag::Fail { value }) => Resolved::fail(Some(
            Value::tagged(tag, input, value.unwrap_or(Value::Null)),
        )),
        flag => flag,
    }
}

impl From<&str> for Caster {
    /// A bare string is a named type, resolved at cast time.
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<regex::Regex> for Caster {
    fn from(regex: regex::Regex) -> Self {
        Self::pattern(regex)
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literals(groups) => f.debug_tuple("Literals").field(groups).finish(),
            Self::Pattern { regex, all } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("all", all)
                .finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Union(casters) => f.debug_tuple("Union").field(casters).finish(),
            Self::Product(casters) => f.debug_tuple("Product").field(casters).finish(),
            Self::Validate { inner, .. } => {
                f.debug_struct("Validate").field("inner", inner).finish()
            }
            Self::Range {
                inner,
                min,
                max,
                inclusive,
            } => f
                .debug_struct("Range")
                .field("inner", inner)
                .field("min", min)
                .field("max", max)
                .field("inclusive", inclusive)
                .finish(),
            Self::Compose(casters) => f.debug_tuple("Compose").field(casters).finish(),
            Self::ComposeWithFailure(casters) => {
                f.debug_tuple("ComposeWithFailure").field(casters).finish()
            }
            Self::WithInput(inner) => f.debug_tuple("WithInput").field(inner).finish(),
            Self::Tagged { inner, tag } => f
                .debug_struct("Tagged")
                .field("inner", inner)
                .field("tag", tag)
                .finish(),
            Self::TaggedWithInput { inner, tag } => f
                .debug_struct("TaggedWithInput")
                .field("inner", inner)
                .field("tag", tag)
                .finish(),
            Self::TaggedUnion(pairs) => f.debug_tuple("TaggedUnion").field(pairs).finish(),
        }
    }
}
