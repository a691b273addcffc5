//! Parsed content representation.
//!
//! [`StringData`] is one parsed unit (a phrase, flag, or option flag);
//! [`ParsedContent`] owns all units in insertion order together with three
//! derived views. Both are immutable once produced by a parse.

/// One parsed unit of a message body.
///
/// `raw` always covers the exact original slice, including surrounding
/// whitespace, quote characters, and separators, so that concatenating every
/// `raw` in order reproduces the input losslessly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StringData {
    /// A positional unit of input.
    Phrase {
        /// The usable text, with quote characters stripped.
        value: String,
        /// The exact original slice.
        raw: String,
    },
    /// A configured bare keyword, e.g. `--verbose`.
    Flag {
        /// The matched flag word, original casing.
        key: String,
        /// The exact original slice.
        raw: String,
    },
    /// A configured keyword that takes a value, e.g. `--limit 3`.
    OptionFlag {
        /// The matched option-flag word, original casing.
        key: String,
        /// The value phrase; empty when none followed.
        value: String,
        /// The exact original slice.
        raw: String,
    },
}

impl StringData {
    /// The exact original slice this unit covers.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Phrase { raw, .. } | Self::Flag { raw, .. } | Self::OptionFlag { raw, .. } => raw,
        }
    }

    /// The usable value of a phrase or option flag, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Phrase { value, .. } | Self::OptionFlag { value, .. } => Some(value),
            Self::Flag { .. } => None,
        }
    }

    /// Returns true for [`StringData::Phrase`].
    #[must_use]
    pub fn is_phrase(&self) -> bool {
        matches!(self, Self::Phrase { .. })
    }
}

/// The result of parsing one message body.
///
/// Owns every [`StringData`] in insertion order (`all`) plus index views for
/// each variant. Read-only after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedContent {
    all: Vec<StringData>,
    phrases: Vec<usize>,
    flags: Vec<usize>,
    option_flags: Vec<usize>,
}

impl ParsedContent {
    /// Appends a unit, maintaining the derived views.
    pub(crate) fn push(&mut self, data: StringData) {
        let index = self.all.len();
        match &data {
            StringData::Phrase { .. } => self.phrases.push(index),
            StringData::Flag { .. } => self.flags.push(index),
            StringData::OptionFlag { .. } => self.option_flags.push(index),
        }
        self.all.push(data);
    }

    /// Every parsed unit, in insertion order.
    #[must_use]
    pub fn all(&self) -> &[StringData] {
        &self.all
    }

    /// The number of phrases.
    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// The `index`-th phrase, if present.
    #[must_use]
    pub fn phrase(&self, index: usize) -> Option<&StringData> {
        self.phrases.get(index).map(|&i| &self.all[i])
    }

    /// The value of the `index`-th phrase, if present.
    #[must_use]
    pub fn phrase_value(&self, index: usize) -> Option<&str> {
        self.phrase(index).and_then(StringData::value)
    }

    /// Iterates over phrases in order.
    pub fn phrases(&self) -> impl Iterator<Item = &StringData> {
        self.phrases.iter().map(|&i| &self.all[i])
    }

    /// Iterates over flags in order.
    pub fn flags(&self) -> impl Iterator<Item = &StringData> {
        self.flags.iter().map(|&i| &self.all[i])
    }

    /// Iterates over option flags in order.
    pub fn option_flags(&self) -> impl Iterator<Item = &StringData> {
        self.option_flags.iter().map(|&i| &self.all[i])
    }

    /// Returns true if any flag matches one of `keys`, case-insensitively.
    #[must_use]
    pub fn has_flag(&self, keys: &[&str]) -> bool {
        self.flag_count(keys) > 0
    }

    /// Counts flags matching any of `keys`, case-insensitively.
    #[must_use]
    pub fn flag_count(&self, keys: &[&str]) -> usize {
        self.flags()
            .filter(|data| match data {
                StringData::Flag { key, .. } => {
                    keys.iter().any(|k| k.eq_ignore_ascii_case(key))
                }
                _ => false,
            })
            .count()
    }

    /// The value of the first option flag matching any of `keys`.
    #[must_use]
    pub fn option_flag(&self, keys: &[&str]) -> Option<&str> {
        self.option_flag_values(keys).into_iter().next()
    }

    /// Values of every option flag matching any of `keys`, in order.
    #[must_use]
    pub fn option_flag_values(&self, keys: &[&str]) -> Vec<&str> {
        self.option_flags()
            .filter_map(|data| match data {
                StringData::OptionFlag { key, value, .. }
                    if keys.iter().any(|k| k.eq_ignore_ascii_case(key)) =>
                {
                    Some(value.as_str())
                }
                _ => None,
            })
            .collect()
    }
}
