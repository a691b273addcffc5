//! Grammar parsing.
//!
//! Turns a token stream into [`ParsedContent`] under one of two grammars,
//! selected by whether a separator is configured. Every production folds
//! surrounding whitespace and separators back into `raw`, so the parse is
//! lossless.
//!
//! A token the grammar cannot place is a configuration defect in the
//! tokenizer/parser pair, reported as [`Error::Grammar`] and never shown to
//! the end user.

use parley_foundation::{Error, Result};

use crate::content::{ParsedContent, StringData};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Configuration for [`ContentParser`].
#[derive(Clone, Debug)]
pub struct ContentParserOptions {
    /// Bare keywords recognized as flags.
    pub flag_words: Vec<String>,
    /// Keywords recognized as option flags (they take a value phrase).
    pub option_flag_words: Vec<String>,
    /// Whether quote characters delimit phrases. Ignored when a separator
    /// is configured.
    pub quoted: bool,
    /// A phrase separator; configuring one disables quoting.
    pub separator: Option<String>,
}

impl Default for ContentParserOptions {
    fn default() -> Self {
        Self {
            flag_words: Vec::new(),
            option_flag_words: Vec::new(),
            quoted: true,
            separator: None,
        }
    }
}

impl ContentParserOptions {
    /// Sorts a word list by descending length so the longest word wins
    /// during tokenization.
    #[must_use]
    pub fn sort_words(mut words: Vec<String>) -> Vec<String> {
        words.sort_by(|a, b| b.len().cmp(&a.len()));
        words
    }
}

/// Parses raw message bodies into [`ParsedContent`].
///
/// Construct one per command from its grammar configuration; `parse` is a
/// pure, synchronous function and the parser can be reused across
/// invocations.
#[derive(Clone, Debug)]
pub struct ContentParser {
    options: ContentParserOptions,
}

impl ContentParser {
    /// Creates a parser, normalizing the configuration: flag word lists are
    /// sorted by descending length, and a separator disables quoting.
    #[must_use]
    pub fn new(mut options: ContentParserOptions) -> Self {
        options.flag_words = ContentParserOptions::sort_words(options.flag_words);
        options.option_flag_words = ContentParserOptions::sort_words(options.option_flag_words);
        options.quoted = options.quoted && options.separator.is_none();
        Self { options }
    }

    /// The normalized configuration.
    #[must_use]
    pub fn options(&self) -> &ContentParserOptions {
        &self.options
    }

    /// Parses `content` into phrases and flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grammar`] if the token stream does not match the
    /// grammar; this indicates a configuration defect, not bad user input.
    pub fn parse(&self, content: &str) -> Result<ParsedContent> {
        let tokens = Tokenizer::new(content, &self.options).tokenize();
        Parser::new(tokens, self.options.separator.is_some()).parse()
    }
}

impl Default for ContentParser {
    fn default() -> Self {
        Self::new(ContentParserOptions::default())
    }
}

/// A recursive-descent parser over one token stream.
struct Parser {
    tokens: Vec<Token>,
    position: usize,
    separated: bool,
    results: ParsedContent,
}

impl Parser {
    fn new(tokens: Vec<Token>, separated: bool) -> Self {
        Self {
            tokens,
            position: 0,
            separated,
            results: ParsedContent::default(),
        }
    }

    fn parse(mut self) -> Result<ParsedContent> {
        while !self.check(&[TokenKind::End]) {
            self.run_argument()?;
        }
        self.expect(&[TokenKind::End])?;
        Ok(self.results)
    }

    fn peek(&self) -> &Token {
        // The stream always ends with End; position never passes it.
        &self.tokens[self.position]
    }

    fn check(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position + offset)
            .is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token> {
        if self.check(kinds) {
            Ok(self.advance())
        } else {
            Err(Error::grammar(
                self.position,
                format!("{kinds:?}"),
                format!("{:?}", self.peek().kind),
            ))
        }
    }

    /// One argument production: optional leading whitespace, a flag or
    /// phrase body, optional trailing whitespace and separator, all folded
    /// into `raw`.
    fn run_argument(&mut self) -> Result<()> {
        let leading = self.take_whitespace();

        // A whitespace-only tail still needs a home in `raw` for lossless
        // reconstruction.
        if self.check(&[TokenKind::End]) && !leading.is_empty() {
            self.results.push(StringData::Phrase {
                value: String::new(),
                raw: leading,
            });
            return Ok(());
        }

        let mut data = if self.check(&[TokenKind::FlagWord, TokenKind::OptionFlagWord]) {
            self.parse_flag()?
        } else if self.separated && self.check(&[TokenKind::Separator]) {
            // An empty phrase between two separators.
            StringData::Phrase {
                value: String::new(),
                raw: String::new(),
            }
        } else {
            self.parse_phrase()?
        };

        let trailing = self.take_whitespace();
        let separator = if self.check(&[TokenKind::Separator]) {
            self.advance().raw
        } else {
            String::new()
        };

        match &mut data {
            StringData::Phrase { raw, .. }
            | StringData::Flag { raw, .. }
            | StringData::OptionFlag { raw, .. } => {
                *raw = format!("{leading}{raw}{trailing}{separator}");
            }
        }
        self.results.push(data);
        Ok(())
    }

    fn take_whitespace(&mut self) -> String {
        if self.check(&[TokenKind::Whitespace]) {
            self.advance().raw
        } else {
            String::new()
        }
    }

    fn parse_flag(&mut self) -> Result<StringData> {
        if self.check(&[TokenKind::FlagWord]) {
            let token = self.advance();
            return Ok(StringData::Flag {
                key: token.raw.clone(),
                raw: token.raw,
            });
        }

        let token = self.expect(&[TokenKind::OptionFlagWord])?;
        let key = token.raw.clone();
        let mut raw = token.raw;
        let mut value = String::new();

        // An option flag may be separated from its value by whitespace; an
        // option flag with no following phrase keeps an empty value.
        if self.check(&[TokenKind::Whitespace]) && self.phrase_follows_at(1) {
            raw.push_str(&self.advance().raw);
        }
        if self.phrase_follows_at(0) {
            if let StringData::Phrase {
                value: phrase_value,
                raw: phrase_raw,
            } = self.parse_phrase()?
            {
                value = phrase_value;
                raw.push_str(&phrase_raw);
            }
        }

        Ok(StringData::OptionFlag { key, value, raw })
    }

    fn phrase_follows_at(&self, offset: usize) -> bool {
        [
            TokenKind::Word,
            TokenKind::Quote,
            TokenKind::OpenQuote,
            TokenKind::EndQuote,
        ]
        .iter()
        .any(|&kind| self.check_at(offset, kind))
    }

    fn parse_phrase(&mut self) -> Result<StringData> {
        if self.separated {
            return self.parse_separated_phrase();
        }

        if self.check(&[TokenKind::Quote]) {
            let open = self.advance();
            let mut value = String::new();
            let mut raw = open.raw;
            while self.check(&[TokenKind::Word, TokenKind::Whitespace]) {
                let token = self.advance();
                value.push_str(&token.raw);
                raw.push_str(&token.raw);
            }
            if self.check(&[TokenKind::Quote]) {
                raw.push_str(&self.advance().raw);
            }
            return Ok(StringData::Phrase { value, raw });
        }

        if self.check(&[TokenKind::OpenQuote]) {
            let open = self.advance();
            let mut value = String::new();
            let mut raw = open.raw;
            while self.check(&[
                TokenKind::Word,
                TokenKind::Whitespace,
                TokenKind::Quote,
                TokenKind::OpenQuote,
            ]) {
                let token = self.advance();
                value.push_str(&token.raw);
                raw.push_str(&token.raw);
            }
            if self.check(&[TokenKind::EndQuote]) {
                raw.push_str(&self.advance().raw);
            }
            return Ok(StringData::Phrase { value, raw });
        }

        if self.check(&[TokenKind::EndQuote]) {
            let token = self.advance();
            return Ok(StringData::Phrase {
                value: token.raw.clone(),
                raw: token.raw,
            });
        }

        let token = self.expect(&[TokenKind::Word])?;
        Ok(StringData::Phrase {
            value: token.raw.clone(),
            raw: token.raw,
        })
    }

    /// Separator grammar: words joined with their interior whitespace until
    /// a separator; `value` and `raw` cover the same slice.
    fn parse_separated_phrase(&mut self) -> Result<StringData> {
        let first = self.expect(&[TokenKind::Word])?;
        let mut value = first.raw;
        while self.check(&[TokenKind::Whitespace]) && self.check_at(1, TokenKind::Word) {
            value.push_str(&self.advance().raw);
            value.push_str(&self.advance().raw);
        }
        Ok(StringData::Phrase {
            value: value.clone(),
            raw: value,
        })
    }
}
