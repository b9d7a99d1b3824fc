//! Async Pipeline Tests
//!
//! - asynchronous steps run one at a time, in attachment order
//! - a synchronous parse that reaches one fails with configuration_error
//! - cancellation abandons the parse at the next asynchronous step
//! - promise and function schemas validate lazily

use std::sync::{Arc, Mutex};
use std::time::Duration;

use schemakit::prelude::*;
use schemakit::value::{FunctionError, Promise, Rejection};
use serde_json::json;

fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn test_async_refinements_run_in_order() {
    let log = recorder();
    let (first_log, second_log) = (log.clone(), log.clone());

    let schema = string()
        .refine_async(
            move |_| {
                let log = first_log.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    log.lock().unwrap().push("first");
                    true
                }
            },
            "first",
        )
        .refine_async(
            move |_| {
                let log = second_log.clone();
                async move {
                    log.lock().unwrap().push("second");
                    true
                }
            },
            "second",
        );

    assert!(schema.safe_parse_async("x").await.is_success());
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_refinement_issues_accumulate() {
    let schema = string()
        .refine_async(|_| async { false }, "first failed")
        .refine(|_| false, "second failed");

    let result = schema.safe_parse_async("x").await;
    let messages: Vec<&str> = result.issues().iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["first failed", "second failed"]);
}

#[tokio::test]
async fn test_async_transform_output() {
    let schema = string().transform_async(|v| async move {
        let text = v.as_str().unwrap_or_default().to_string();
        Ok(Value::from(text.len()))
    });
    assert_eq!(schema.parse_async("four").await.unwrap(), Value::from(4));
}

#[tokio::test]
async fn test_transform_skipped_after_failed_refinement() {
    let log = recorder();
    let seen = log.clone();
    let schema = number()
        .refine(|v| v.as_f64().map_or(false, |n| n > 0.0), "must be positive")
        .transform_async(move |v| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push("transform");
                Ok(v)
            }
        });

    let result = schema.safe_parse_async(-1).await;
    assert_eq!(result.issues().len(), 1);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_async_field_errors_collected_across_siblings() {
    let taken = |v: Value| async move { v.as_str() != Some("taken") };
    let schema: Schema = object([
        ("login", string().refine_async(taken, "login taken")),
        ("email", Schema::from(string().email())),
    ])
    .into();

    let result = schema
        .safe_parse_async(json!({ "login": "taken", "email": "nope" }))
        .await;
    let paths: Vec<String> = result.issues().iter().map(|i| i.path_string()).collect();
    assert_eq!(paths, vec!["login", "email"]);
}

// =============================================================================
// Synchronous Entry Points
// =============================================================================

#[test]
fn test_sync_parse_of_async_schema_is_configuration_error() {
    let schema = string()
        .refine_async(|_| async { true }, "one")
        .refine_async(|_| async { true }, "two");

    let result = schema.safe_parse("x");
    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].code(), IssueCode::ConfigurationError);

    let err = schema.parse("x").unwrap_err();
    assert_eq!(err.issues()[0].code(), IssueCode::ConfigurationError);
}

#[test]
fn test_sync_parse_skips_unreached_async_steps() {
    let schema = union([
        Schema::from(number()),
        string().refine_async(|_| async { true }, "unused"),
    ]);
    assert!(schema.safe_parse(5).is_success());
}

#[tokio::test]
async fn test_sync_only_schema_parses_the_same_async() {
    let schema: Schema = array(number().int()).min(1).into();
    let input = json!([1, 2.5]);
    assert_eq!(
        schema.safe_parse(input.clone()).to_json(),
        schema.safe_parse_async(input).await.to_json()
    );
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_before_parse() {
    let signal = CancelSignal::new();
    signal.cancel();
    let schema = string().refine_async(|_| async { true }, "unused");
    let outcome = schema.parse_async_with("x", &signal).await;
    assert!(matches!(outcome, Err(ParseError::Cancelled)));
}

#[tokio::test]
async fn test_cancel_in_flight_step() {
    let signal = CancelSignal::new();
    let schema = string().refine_async(
        |_| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            true
        },
        "slow",
    );

    let trigger = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        schema.safe_parse_async_with("x", &signal),
    )
    .await
    .expect("cancellation should end the parse");
    assert!(matches!(outcome, Err(ParseError::Cancelled)));
}

#[tokio::test]
async fn test_uncancelled_signal_is_inert() {
    let signal = CancelSignal::new();
    let schema = string().refine_async(|v| async move { v.as_str() == Some("ok") }, "not ok");

    let result = schema.safe_parse_async_with("ok", &signal).await.unwrap();
    assert!(result.is_success());

    let failed = schema.parse_async_with("no", &signal).await.unwrap_err();
    assert_eq!(failed.issues().unwrap()[0].message, "not ok");
}

#[tokio::test]
async fn test_cancel_does_not_affect_sync_only_schema() {
    let signal = CancelSignal::new();
    signal.cancel();
    let schema: Schema = number().into();
    let outcome = schema.safe_parse_async_with(3, &signal).await;
    assert!(outcome.unwrap().is_success());
}

// =============================================================================
// Promise and Function Schemas
// =============================================================================

#[test]
fn test_promise_schema_never_awaits_at_parse_time() {
    let schema = promise(number());
    let output = schema.parse(Value::Promise(Promise::resolve("nope"))).unwrap();
    assert!(matches!(output, Value::Promise(_)));

    let result = schema.safe_parse(42);
    assert_eq!(result.issues()[0].code(), IssueCode::InvalidType);
}

#[tokio::test]
async fn test_promise_output_validates_settled_value() {
    let schema = promise(number());

    let ok = match schema.parse(Value::Promise(Promise::resolve(7))).unwrap() {
        Value::Promise(p) => p,
        other => panic!("expected promise, got {:?}", other),
    };
    assert_eq!(ok.settle().await.unwrap(), Value::from(7));

    let bad = match schema.parse(Value::Promise(Promise::resolve("x"))).unwrap() {
        Value::Promise(p) => p,
        other => panic!("expected promise, got {:?}", other),
    };
    match bad.settle().await {
        Err(Rejection::Invalid(err)) => {
            assert_eq!(err.issues()[0].code(), IssueCode::InvalidType)
        }
        other => panic!("expected invalid rejection, got {:?}", other),
    }

    let rejected = match schema.parse(Value::Promise(Promise::reject("boom"))).unwrap() {
        Value::Promise(p) => p,
        other => panic!("expected promise, got {:?}", other),
    };
    assert!(matches!(rejected.settle().await, Err(Rejection::Reason(_))));
}

#[test]
fn test_implemented_function_validates_calls() {
    let length = function()
        .args([string()])
        .returns(number().int())
        .implement(|args| {
            let text = args[0].as_str().unwrap_or_default();
            Ok(Value::from(text.chars().count()))
        });

    assert_eq!(length.call(&[Value::from("abc")]).unwrap(), Value::from(3));

    match length.call(&[Value::from(1)]) {
        Err(FunctionError::InvalidArguments(err)) => {
            assert_eq!(err.issues()[0].code(), IssueCode::InvalidArguments)
        }
        other => panic!("expected invalid arguments, got {:?}", other),
    }
}

#[test]
fn test_function_schema_wraps_parsed_callable() {
    let schema: Schema = function().returns(string()).into();
    let raw = schemakit::value::FunctionValue::new(|_| Ok(Value::from(1)));

    let wrapped = match schema.parse(Value::Function(raw)).unwrap() {
        Value::Function(f) => f,
        other => panic!("expected function, got {:?}", other),
    };
    assert!(matches!(
        wrapped.call(&[]),
        Err(FunctionError::InvalidReturnType(_))
    ));
}
