//! Round-trip property tests.
//!
//! Concatenating every `StringData.raw` in order must reproduce the
//! original input exactly, for any input and configuration.

use proptest::prelude::*;

use parley_parser::{ContentParser, ContentParserOptions, StringData};

fn reassemble(parser: &ContentParser, input: &str) -> String {
    parser
        .parse(input)
        .expect("grammar is total")
        .all()
        .iter()
        .map(StringData::raw)
        .collect()
}

/// Strategy over message-like inputs: words, quotes, flags, separators,
/// odd whitespace.
fn message_body() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9]{1,8}".prop_map(|w| w),
            Just("\"".to_string()),
            Just("\u{201C}".to_string()),
            Just("\u{201D}".to_string()),
            Just("--all".to_string()),
            Just("--limit".to_string()),
            Just(",".to_string()),
            Just(" ".to_string()),
            Just("  \t".to_string()),
        ],
        0..12,
    )
    .prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn quoted_config_round_trips(input in message_body()) {
        let parser = ContentParser::default();
        prop_assert_eq!(reassemble(&parser, &input), input);
    }

    #[test]
    fn flag_config_round_trips(input in message_body()) {
        let parser = ContentParser::new(ContentParserOptions {
            flag_words: vec!["--all".to_string()],
            option_flag_words: vec!["--limit".to_string()],
            ..ContentParserOptions::default()
        });
        prop_assert_eq!(reassemble(&parser, &input), input);
    }

    #[test]
    fn separator_config_round_trips(input in message_body()) {
        let parser = ContentParser::new(ContentParserOptions {
            separator: Some(",".to_string()),
            ..ContentParserOptions::default()
        });
        prop_assert_eq!(reassemble(&parser, &input), input);
    }

    #[test]
    fn arbitrary_text_round_trips(input in "\\PC{0,40}") {
        let parser = ContentParser::default();
        prop_assert_eq!(reassemble(&parser, &input), input);
    }
}
