//! Argument runner tests.
//!
//! Tests for match-mode dispatch, cursor state, and short-circuiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parley_foundation::{Flag, Value};
use parley_parser::{ContentParser, ContentParserOptions};
use parley_runtime::{
    Argument, ArgumentGenerator, ArgumentRunner, MatchMode, RunOutcome, RunnerState, Step,
    Unordered, Values, content_parser_options, from_arguments,
};
use parley_types::Caster;

use crate::support::{context, runner, ScriptedMessenger};

#[tokio::test]
async fn end_to_end_value_bag() {
    let args = vec![
        (
            "amount".to_string(),
            Argument::new(MatchMode::Phrase).with_caster(Caster::named("integer")),
        ),
        ("reason".to_string(), Argument::new(MatchMode::Rest)),
    ];
    let parsed = ContentParser::default().parse("50 because reasons").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    let values = outcome.values().expect("run completes");
    assert_eq!(values["amount"], Value::Int(50));
    assert_eq!(values["reason"], Value::from("because reasons"));
}

#[tokio::test]
async fn unordered_arguments_bind_by_castability() {
    let args = vec![
        (
            "amount".to_string(),
            Argument::new(MatchMode::Phrase)
                .with_caster(Caster::named("integer"))
                .with_unordered(Unordered::All),
        ),
        (
            "word".to_string(),
            Argument::new(MatchMode::Phrase).with_unordered(Unordered::All),
        ),
    ];
    let parsed = ContentParser::default().parse("abc 42").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    let values = outcome.values().unwrap();
    // The integer argument skips "abc" (index 0) and claims "42" (index 1);
    // the string argument then claims the remaining "abc".
    assert_eq!(values["amount"], Value::Int(42));
    assert_eq!(values["word"], Value::from("abc"));
}

/// Yields one cancelling argument, then panics if asked again.
struct CountingGenerator {
    calls: Arc<AtomicUsize>,
    yielded: bool,
}

impl ArgumentGenerator for CountingGenerator {
    fn next(&mut self, _values: &Values) -> Step {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.yielded {
            return Step::Done;
        }
        self.yielded = true;
        Step::Argument(
            "first".to_string(),
            Argument::new(MatchMode::Phrase)
                .with_caster(Caster::named("integer"))
                .with_otherwise("that is not a number"),
        )
    }
}

#[tokio::test]
async fn short_circuit_halts_the_run_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = CountingGenerator {
        calls: Arc::clone(&calls),
        yielded: false,
    };
    let parsed = ContentParser::default().parse("abc").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner().run(&ctx, &parsed, generator).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Flag(Flag::Cancel)));
    // The generator is never pumped again after the short-circuit.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(messenger.sent(), vec!["that is not a number".to_string()]);
}

#[tokio::test]
async fn flag_and_option_modes() {
    let args = vec![
        ("target".to_string(), Argument::new(MatchMode::Phrase)),
        (
            "days".to_string(),
            Argument::new(MatchMode::Option)
                .with_flags(["--days"])
                .with_caster(Caster::named("integer"))
                .with_default(3),
        ),
        (
            "silent".to_string(),
            Argument::new(MatchMode::Flag).with_flags(["--silent"]),
        ),
    ];
    let parser = ContentParser::new(content_parser_options(&args));
    let parsed = parser.parse("spammer --days 7 --silent").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    let values = outcome.values().unwrap();
    assert_eq!(values["target"], Value::from("spammer"));
    assert_eq!(values["days"], Value::Int(7));
    assert_eq!(values["silent"], Value::Bool(true));
}

#[tokio::test]
async fn absent_flag_is_false_and_absent_option_defaults() {
    let args = vec![
        (
            "days".to_string(),
            Argument::new(MatchMode::Option)
                .with_flags(["--days"])
                .with_caster(Caster::named("integer"))
                .with_default(3),
        ),
        (
            "silent".to_string(),
            Argument::new(MatchMode::Flag).with_flags(["--silent"]),
        ),
    ];
    let parser = ContentParser::new(content_parser_options(&args));
    let parsed = parser.parse("spammer").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    let values = outcome.values().unwrap();
    assert_eq!(values["days"], Value::Int(3));
    assert_eq!(values["silent"], Value::Bool(false));
}

#[tokio::test]
async fn multiple_option_flags_collect_into_a_list() {
    let args = vec![(
        "users".to_string(),
        Argument::new(MatchMode::Option)
            .with_flags(["--user"])
            .with_multiple_flags(true),
    )];
    let parser = ContentParser::new(content_parser_options(&args));
    let parsed = parser.parse("--user alice --user bob").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["users"],
        Value::List(vec![Value::from("alice"), Value::from("bob")])
    );
}

#[tokio::test]
async fn separate_mode_processes_each_phrase() {
    let args = vec![(
        "numbers".to_string(),
        Argument::new(MatchMode::Separate).with_caster(Caster::named("integer")),
    )];
    let parsed = ContentParser::default().parse("1 2 3").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["numbers"],
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[tokio::test]
async fn text_and_content_modes_see_the_whole_message() {
    let args = vec![
        ("first".to_string(), Argument::new(MatchMode::Phrase)),
        ("text".to_string(), Argument::new(MatchMode::Text)),
        ("content".to_string(), Argument::new(MatchMode::Content)),
        ("rest".to_string(), Argument::new(MatchMode::RestContent)),
    ];
    let parser = ContentParser::new(ContentParserOptions {
        flag_words: vec!["--x".to_string()],
        ..ContentParserOptions::default()
    });
    let parsed = parser.parse("a --x b").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    let values = outcome.values().unwrap();
    assert_eq!(values["first"], Value::from("a"));
    // Text sees phrase raws only, from the start; content includes flags.
    assert_eq!(values["text"], Value::from("a b"));
    assert_eq!(values["content"], Value::from("a --x b"));
    // Rest-content starts at the next unconsumed phrase.
    assert_eq!(values["rest"], Value::from("b"));
}

struct ContinueGenerator {
    step: usize,
}

impl ArgumentGenerator for ContinueGenerator {
    fn next(&mut self, _values: &Values) -> Step {
        self.step += 1;
        match self.step {
            1 => Step::Argument("first".to_string(), Argument::new(MatchMode::Phrase)),
            2 => Step::Flag(Flag::continue_to("other")),
            _ => Step::Done,
        }
    }
}

#[tokio::test]
async fn continue_flag_carries_the_unconsumed_remainder() {
    let parsed = ContentParser::default().parse("a b c").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, ContinueGenerator { step: 0 })
        .await
        .unwrap();

    let RunOutcome::Flag(Flag::Continue { command, rest, .. }) = outcome else {
        panic!("expected continue");
    };
    assert_eq!(command, "other");
    assert_eq!(rest.as_deref(), Some("b c"));
}

#[test]
fn increase_index_clamps_at_the_end() {
    let parsed = ContentParser::default().parse("a b").unwrap();
    let mut state = RunnerState::default();

    ArgumentRunner::increase_index(&parsed, &mut state, 10);
    assert_eq!(state.phrase_index, 2);

    // Advancing past the end is a no-op, not an error.
    let before = state.clone();
    ArgumentRunner::increase_index(&parsed, &mut state, 1);
    assert_eq!(state.phrase_index, before.phrase_index);
    assert_eq!(state.index, before.index);
}

#[tokio::test]
async fn failed_cast_without_fallbacks_lands_in_the_bag_as_null() {
    let args = vec![(
        "amount".to_string(),
        Argument::new(MatchMode::Phrase).with_caster(Caster::named("integer")),
    )];
    let parsed = ContentParser::default().parse("abc").unwrap();
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    assert_eq!(outcome.values().unwrap()["amount"], Value::Null);
}
