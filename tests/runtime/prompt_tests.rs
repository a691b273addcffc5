//! Prompt engine tests.
//!
//! Drives full prompt conversations against the scripted transport.

use parley_foundation::{Flag, Value};
use parley_parser::ContentParser;
use parley_runtime::{Argument, MatchMode, PromptOptions, RunOutcome, from_arguments};
use parley_types::Caster;

use crate::support::{context, context_with_probe, runner, ScriptedMessenger};

fn number_arg(prompt: PromptOptions) -> Vec<(String, Argument)> {
    vec![(
        "amount".to_string(),
        Argument::new(MatchMode::Phrase)
            .with_caster(Caster::named("integer"))
            .with_prompt(prompt),
    )]
}

fn texts() -> PromptOptions {
    PromptOptions::new()
        .with_start("how many?")
        .with_retry("numbers only, try again")
        .with_timeout_text("too slow")
        .with_ended("giving up")
        .with_cancel("cancelled")
}

#[tokio::test]
async fn prompt_returns_value_on_first_valid_reply() {
    let messenger = ScriptedMessenger::new(["7"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(number_arg(texts())))
        .await
        .unwrap();

    assert_eq!(outcome.values().unwrap()["amount"], Value::Int(7));
    assert_eq!(messenger.sent(), vec!["how many?".to_string()]);
}

#[tokio::test]
async fn prompt_retry_budget_allows_retries_plus_one_turns() {
    // retries = 2 and an always-failing reply script: three total turns,
    // then the "ended" text and a cancel.
    let messenger = ScriptedMessenger::new(["a", "b", "c"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(texts().with_retries(2))),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Flag(Flag::Cancel)));
    assert_eq!(
        messenger.sent(),
        vec![
            "how many?".to_string(),
            "numbers only, try again".to_string(),
            "numbers only, try again".to_string(),
            "giving up".to_string(),
        ]
    );
}

#[tokio::test]
async fn prompt_succeeds_on_a_retry_turn() {
    let messenger = ScriptedMessenger::new(["x", "42"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(texts().with_retries(2))),
        )
        .await
        .unwrap();

    assert_eq!(outcome.values().unwrap()["amount"], Value::Int(42));
}

#[tokio::test]
async fn cancel_word_cancels_case_insensitively() {
    let messenger = ScriptedMessenger::new(["CANCEL"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(number_arg(texts())))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Flag(Flag::Cancel)));
    assert_eq!(
        messenger.sent(),
        vec!["how many?".to_string(), "cancelled".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_sends_timeout_text_and_cancels() {
    let messenger = ScriptedMessenger::new(Vec::<String>::new());
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(number_arg(texts())))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Flag(Flag::Cancel)));
    assert_eq!(
        messenger.sent(),
        vec!["how many?".to_string(), "too slow".to_string()]
    );
}

#[tokio::test]
async fn infinite_collection_ends_at_stop_word() {
    let messenger = ScriptedMessenger::new(["1", "2", "stop"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(texts().with_infinite(true))),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["amount"],
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[tokio::test]
async fn stop_word_with_nothing_collected_counts_as_a_retry() {
    let messenger = ScriptedMessenger::new(["stop", "3", "stop"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(texts().with_infinite(true).with_retries(5))),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["amount"],
        Value::List(vec![Value::Int(3)])
    );
}

#[tokio::test]
async fn infinite_collection_respects_the_limit() {
    let messenger = ScriptedMessenger::new(["1", "2"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(texts().with_infinite(true).with_limit(2))),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["amount"],
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[tokio::test]
async fn breakout_hands_off_commandlike_input() {
    let messenger = ScriptedMessenger::new(["!help me"]);
    let ctx = context_with_probe(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(number_arg(texts())))
        .await
        .unwrap();

    let RunOutcome::Flag(Flag::Retry(message)) = outcome else {
        panic!("expected retry hand-off");
    };
    assert_eq!(message.content, "!help me");
}

#[tokio::test]
async fn breakout_disabled_treats_commandlike_input_as_a_value() {
    let messenger = ScriptedMessenger::new(["!help me", "5"]);
    let ctx = context_with_probe(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(
                texts().with_breakout(false).with_retries(2),
            )),
        )
        .await
        .unwrap();

    // "!help me" is not an integer, so it burns a retry; "5" then lands.
    assert_eq!(outcome.values().unwrap()["amount"], Value::Int(5));
}

#[tokio::test]
async fn empty_prompt_texts_stay_silent() {
    let messenger = ScriptedMessenger::new(["9"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let outcome = runner()
        .run(
            &ctx,
            &parsed,
            from_arguments(number_arg(PromptOptions::new())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.values().unwrap()["amount"], Value::Int(9));
    assert!(messenger.sent().is_empty());
}

#[tokio::test]
async fn separate_match_with_no_input_collects_infinitely() {
    let messenger = ScriptedMessenger::new(["4", "5", "stop"]);
    let ctx = context(&messenger);
    let parsed = ContentParser::default().parse("").unwrap();

    let args = vec![(
        "numbers".to_string(),
        Argument::new(MatchMode::Separate)
            .with_caster(Caster::named("integer"))
            .with_prompt(texts()),
    )];
    let outcome = runner()
        .run(&ctx, &parsed, from_arguments(args))
        .await
        .unwrap();

    assert_eq!(
        outcome.values().unwrap()["numbers"],
        Value::List(vec![Value::Int(4), Value::Int(5)])
    );
}
