//! Combinator law tests.
//!
//! Exercises the algebraic behavior of the caster combinators end to end
//! against the built-in types.

use parley_foundation::{Flag, Resolved, Value};
use parley_types::Caster;

use crate::support::cast;

#[tokio::test]
async fn union_is_first_success() {
    let a_then_b = Caster::union([Caster::named("integer"), Caster::named("lowercase")]);

    // a succeeds: union result equals a's result.
    assert_eq!(cast(&a_then_b, "7").await, Resolved::value(7));
    // a fails: union result equals b's result.
    assert_eq!(cast(&a_then_b, "WORD").await, Resolved::value("word"));
}

#[tokio::test]
async fn union_of_failures_fails() {
    let caster = Caster::union([Caster::named("integer"), Caster::named("number")]);
    assert!(cast(&caster, "word").await.is_failure());
}

#[tokio::test]
async fn product_is_all_results_or_first_failure() {
    let caster = Caster::product([Caster::named("integer"), Caster::named("string")]);

    assert_eq!(
        cast(&caster, "3").await,
        Resolved::Value(Value::List(vec![Value::Int(3), Value::from("3")]))
    );
    assert!(cast(&caster, "three").await.is_failure());
}

#[tokio::test]
async fn compose_is_right_after_left() {
    // compose(a, b)(p) == b(a(p)) when a succeeds.
    let double = Caster::from_fn(|_, phrase| {
        Ok(phrase
            .parse::<i64>()
            .ok()
            .map(|n| Value::from((n * 2).to_string())))
    });
    let caster = Caster::compose([double.clone(), Caster::named("integer")]);
    assert_eq!(cast(&caster, "21").await, Resolved::value(42));

    // a fails: the failure propagates unchanged.
    let caster = Caster::compose([double, Caster::named("integer")]);
    assert!(cast(&caster, "x").await.is_failure());
}

#[tokio::test]
async fn range_law_on_numbers() {
    let caster = Caster::named("number").range(1.0, 10.0, false);
    assert_eq!(cast(&caster, "5").await, Resolved::value(5.0));
    assert!(cast(&caster, "0").await.is_failure());
    assert!(cast(&caster, "11").await.is_failure());
    assert!(cast(&caster, "10").await.is_failure());

    let inclusive = Caster::named("number").range(1.0, 10.0, true);
    assert_eq!(cast(&inclusive, "10").await, Resolved::value(10.0));
}

#[tokio::test]
async fn validate_rejects_on_predicate() {
    let even = Caster::named("integer")
        .validate(|_, _, value| value.as_int().is_some_and(|n| n % 2 == 0));
    assert_eq!(cast(&even, "4").await, Resolved::value(4));
    assert!(cast(&even, "5").await.is_failure());
}

#[tokio::test]
async fn literals_synonym_groups_are_canonicalized() {
    let caster = Caster::literals([
        vec!["delete", "del", "remove"],
        vec!["create", "new"],
    ]);
    assert_eq!(cast(&caster, "REMOVE").await, Resolved::value("delete"));
    assert_eq!(cast(&caster, "new").await, Resolved::value("create"));
    assert!(cast(&caster, "update").await.is_failure());
}

#[tokio::test]
async fn tagged_union_discriminates() {
    let caster = Caster::tagged_union([
        ("number", Caster::named("integer")),
        ("text", Caster::named("string")),
    ]);

    let resolved = cast(&caster, "42").await;
    let tagged = resolved.as_value().unwrap().as_tagged().unwrap();
    assert_eq!(tagged.tag.as_deref(), Some("number"));
    assert_eq!(tagged.value, Value::Int(42));
}

#[tokio::test]
async fn with_input_preserves_original_phrase() {
    let caster = Caster::named("lowercase").with_input();
    let resolved = cast(&caster, "MiXeD").await;
    let tagged = resolved.as_value().unwrap().as_tagged().unwrap();
    assert_eq!(tagged.input.as_deref(), Some("MiXeD"));
    assert_eq!(tagged.value, Value::from("mixed"));
}

#[tokio::test]
async fn literal_failure_payload_carries_phrase() {
    let resolved = cast(&Caster::words(["yes", "no"]), "maybe").await;
    let Resolved::Flag(Flag::Fail { value }) = resolved else {
        panic!("expected failure");
    };
    assert_eq!(value, Some(Value::from("maybe")));
}
