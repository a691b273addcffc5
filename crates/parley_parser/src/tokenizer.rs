//! Input tokenization.
//!
//! Converts a raw message body into a stream of tokens under a configured
//! grammar dialect: straight quotes, curly quotes, flag words, and an
//! optional separator.

use crate::parser::ContentParserOptions;

/// The kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of non-whitespace text.
    Word,
    /// A run of whitespace.
    Whitespace,
    /// A straight double quote.
    Quote,
    /// A curly opening quote.
    OpenQuote,
    /// A curly closing quote.
    EndQuote,
    /// A configured flag word.
    FlagWord,
    /// A configured option-flag word.
    OptionFlagWord,
    /// The configured separator.
    Separator,
    /// End of input.
    End,
}

/// A token from a message body.
///
/// `raw` is the exact slice of the input the token covers, original casing
/// and all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The classified kind.
    pub kind: TokenKind,
    /// The exact input slice.
    pub raw: String,
}

impl Token {
    fn new(kind: TokenKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

/// Which quote dialect the scanner is currently inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuoteState {
    Default,
    Straight,
    Curly,
}

/// A cursor-based longest-match scanner.
///
/// All mutable state is private to the one tokenizing call; the tokenizer
/// is a pure function of its input and configuration.
pub struct Tokenizer<'a> {
    content: &'a str,
    flag_words: &'a [String],
    option_flag_words: &'a [String],
    quoted: bool,
    separator: Option<&'a str>,
    position: usize,
    state: QuoteState,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `content`.
    ///
    /// The flag word lists in `options` must already be sorted by descending
    /// length so the longest matching word wins; [`super::ContentParser`]
    /// normalizes its configuration that way at construction.
    #[must_use]
    pub fn new(content: &'a str, options: &'a ContentParserOptions) -> Self {
        Self {
            content,
            flag_words: &options.flag_words,
            option_flag_words: &options.option_flag_words,
            quoted: options.quoted && options.separator.is_none(),
            separator: options.separator.as_deref(),
            position: 0,
            state: QuoteState::Default,
            tokens: Vec::new(),
        }
    }

    /// Consumes the scanner and produces the token stream.
    ///
    /// The stream always ends with an [`TokenKind::End`] token. Unmatched
    /// quotes are tolerated; content after an unterminated quote is still
    /// captured to the end of input.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.position < self.content.len() {
            self.run_one();
        }
        self.tokens.push(Token::new(TokenKind::End, ""));
        self.tokens
    }

    /// Tries each matcher in priority order; exactly one consumes input.
    fn run_one(&mut self) {
        let matched = self.run_whitespace()
            || self.run_flag_words()
            || self.run_option_flag_words()
            || self.run_quote()
            || self.run_open_quote()
            || self.run_end_quote()
            || self.run_separator()
            || self.run_word();
        debug_assert!(matched, "tokenizer matchers must be total");
    }

    fn rest(&self) -> &'a str {
        &self.content[self.position..]
    }

    /// Case-insensitive prefix match, returning the byte length consumed.
    fn match_ahead_ci(&self, word: &str) -> Option<usize> {
        let mut len = 0;
        let mut rest = self.rest().chars();
        for expected in word.chars() {
            let actual = rest.next()?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
            len += actual.len_utf8();
        }
        Some(len)
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let raw = &self.content[self.position..self.position + len];
        self.tokens.push(Token::new(kind, raw));
        self.position += len;
    }

    fn run_whitespace(&mut self) -> bool {
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        if len == 0 {
            return false;
        }
        self.push(TokenKind::Whitespace, len);
        true
    }

    fn run_flag_words(&mut self) -> bool {
        self.run_words(TokenKind::FlagWord)
    }

    fn run_option_flag_words(&mut self) -> bool {
        self.run_words(TokenKind::OptionFlagWord)
    }

    fn run_words(&mut self, kind: TokenKind) -> bool {
        // Flag words only match outside quotes to avoid false positives
        // inside quoted text.
        if self.state != QuoteState::Default {
            return false;
        }
        let words = match kind {
            TokenKind::FlagWord => self.flag_words,
            _ => self.option_flag_words,
        };
        for word in words {
            if let Some(len) = self.match_ahead_ci(word) {
                self.push(kind, len);
                return true;
            }
        }
        false
    }

    fn run_quote(&mut self) -> bool {
        if !self.quoted || !self.rest().starts_with('"') {
            return false;
        }
        match self.state {
            QuoteState::Straight => self.state = QuoteState::Default,
            QuoteState::Default => self.state = QuoteState::Straight,
            QuoteState::Curly => {}
        }
        self.push(TokenKind::Quote, '"'.len_utf8());
        true
    }

    fn run_open_quote(&mut self) -> bool {
        if !self.quoted || !self.rest().starts_with('\u{201C}') {
            return false;
        }
        if self.state == QuoteState::Default {
            self.state = QuoteState::Curly;
        }
        self.push(TokenKind::OpenQuote, '\u{201C}'.len_utf8());
        true
    }

    fn run_end_quote(&mut self) -> bool {
        if !self.quoted || !self.rest().starts_with('\u{201D}') {
            return false;
        }
        if self.state == QuoteState::Curly {
            self.state = QuoteState::Default;
        }
        self.push(TokenKind::EndQuote, '\u{201D}'.len_utf8());
        true
    }

    fn run_separator(&mut self) -> bool {
        let Some(separator) = self.separator else {
            return false;
        };
        match self.match_ahead_ci(separator) {
            Some(len) => {
                self.push(TokenKind::Separator, len);
                true
            }
            None => false,
        }
    }

    fn run_word(&mut self) -> bool {
        let len: usize = self
            .rest()
            .chars()
            .take_while(|&c| {
                !c.is_whitespace()
                    && !(self.state == QuoteState::Straight && c == '"')
                    && !(self.state == QuoteState::Curly && c == '\u{201D}')
            })
            .map(char::len_utf8)
            .sum();
        if len == 0 {
            return false;
        }
        let word = &self.content[self.position..self.position + len];
        // With a separator configured a word breaks at the separator, even
        // mid-word.
        if let Some(separator) = self.separator {
            if let Some(index) = word.find(separator) {
                if index > 0 {
                    self.push(TokenKind::Word, index);
                    return true;
                }
            }
        }
        self.push(TokenKind::Word, len);
        true
    }
}
