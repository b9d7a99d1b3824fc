//! Combinator Tests
//!
//! Behavior of individual schema kinds and derivations as seen through
//! the public parse API.

use chrono::{TimeZone, Utc};
use schemakit::issue::StringValidation;
use schemakit::prelude::*;
use schemakit::value::Symbol;
use serde_json::json;

fn issue_codes(result: &ParseResult) -> Vec<IssueCode> {
    result.issues().iter().map(Issue::code).collect()
}

fn paths(result: &ParseResult) -> Vec<String> {
    result.issues().iter().map(Issue::path_string).collect()
}

// =============================================================================
// Objects
// =============================================================================

fn point() -> schemakit::schema::ObjectSchema {
    object([("x", Schema::from(number())), ("y", Schema::from(number()))])
}

#[test]
fn test_unknown_keys_pass_through_by_default() {
    let schema: Schema = point().into();
    let output = schema.parse(json!({ "x": 1, "y": 2, "z": 3 })).unwrap();
    assert_eq!(output.get("z"), Some(&Value::from(3)));
}

#[test]
fn test_output_keys_are_sorted() {
    let schema: Schema = object([
        ("zeta", Schema::from(number())),
        ("alpha", Schema::from(number())),
    ])
    .into();
    let output = schema
        .parse(json!({ "zeta": 1, "mid": true, "alpha": 2 }))
        .unwrap();
    match output {
        Value::Object(fields) => {
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_strip_drops_unknown_keys() {
    let schema: Schema = point().strip().into();
    let output = schema.parse(json!({ "x": 1, "y": 2, "z": 3 })).unwrap();
    assert_eq!(output.get("z"), None);
    assert_eq!(output.get("x"), Some(&Value::from(1)));
}

#[test]
fn test_strict_reports_unknown_keys_once() {
    let schema: Schema = point().strict().into();
    let result = schema.safe_parse(json!({ "x": 1, "y": 2, "z": 3, "w": 4 }));
    assert_eq!(result.issues().len(), 1);
    match &result.issues()[0].kind {
        IssueKind::UnrecognizedKeys { keys } => assert_eq!(keys, &vec!["w", "z"]),
        other => panic!("expected unrecognized_keys, got {:?}", other),
    }
}

#[test]
fn test_strict_object_builder() {
    let schema: Schema = strict_object([("id", Schema::from(string()))]).into();
    assert_eq!(
        issue_codes(&schema.safe_parse(json!({ "id": "a", "extra": 1 }))),
        vec![IssueCode::UnrecognizedKeys]
    );
}

#[test]
fn test_catchall_validates_unknown_keys() {
    let schema: Schema = point().catchall(string()).into();
    let result = schema.safe_parse(json!({ "x": 1, "y": 2, "label": "origin", "size": 3 }));
    assert_eq!(paths(&result), vec!["size"]);
}

#[test]
fn test_missing_and_optional_fields() {
    let schema: Schema = object([
        ("id", Schema::from(string())),
        ("note", string().optional()),
    ])
    .into();

    let output = schema.parse(json!({ "id": "a" })).unwrap();
    assert_eq!(output.get("note"), None);

    let result = schema.safe_parse(json!({}));
    assert_eq!(paths(&result), vec!["id"]);
    assert_eq!(result.issues()[0].message, "Required");
}

#[test]
fn test_merge_and_keyof() {
    let merged = point().merge(&object([("z", Schema::from(number()))]));
    assert_eq!(merged.keys(), vec!["x", "y", "z"]);

    let keys: Schema = merged.keyof().into();
    assert!(keys.safe_parse("z").is_success());
    assert_eq!(
        issue_codes(&keys.safe_parse("w")),
        vec![IssueCode::InvalidEnumValue]
    );
}

#[test]
fn test_required_undoes_partial() {
    let schema: Schema = point().partial().required().into();
    assert_eq!(paths(&schema.safe_parse(json!({ "x": 1 }))), vec!["y"]);
}

#[test]
fn test_flatten_groups_by_field() {
    let schema: Schema = object([
        ("name", Schema::from(string().min(2))),
        ("tags", Schema::from(array(string()))),
    ])
    .refine(|_| false, "form rejected")
    .into();

    let err = schema.parse(json!({ "name": "a", "tags": [1, 2] })).unwrap_err();
    let flat = err.flatten();
    assert_eq!(flat.field_errors["tags"].len(), 2);
    assert_eq!(flat.field_errors["name"].len(), 1);
    assert!(flat.form_errors.is_empty());
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn test_array_size_and_messages() {
    let schema: Schema = array(number()).nonempty().message("need one").into();
    let result = schema.safe_parse(json!([]));
    assert_eq!(issue_codes(&result), vec![IssueCode::TooSmall]);
    assert_eq!(result.issues()[0].message, "need one");

    let exact: Schema = array(number()).length(2).into();
    assert!(exact.safe_parse(json!([1, 2])).is_success());
    assert_eq!(issue_codes(&exact.safe_parse(json!([1, 2, 3]))), vec![IssueCode::TooBig]);
}

#[test]
fn test_tuple_positions_and_rest() {
    let pair: Schema = tuple([Schema::from(string()), Schema::from(number())]).into();
    assert!(pair.safe_parse(json!(["a", 1])).is_success());
    assert_eq!(issue_codes(&pair.safe_parse(json!(["a"]))), vec![IssueCode::TooSmall]);
    assert_eq!(issue_codes(&pair.safe_parse(json!(["a", 1, 2]))), vec![IssueCode::TooBig]);
    assert_eq!(paths(&pair.safe_parse(json!([1, "a"]))), vec!["[0]", "[1]"]);

    let variadic: Schema = tuple([Schema::from(string())]).rest(boolean()).into();
    assert!(variadic.safe_parse(json!(["a", true, false])).is_success());
    assert_eq!(paths(&variadic.safe_parse(json!(["a", true, 3]))), vec!["[2]"]);
}

#[test]
fn test_record_keys_and_values() {
    let schema = record(string().min(2), number());
    let result = schema.safe_parse(json!({ "a": 1, "bb": "x", "cc": 3 }));
    assert_eq!(paths(&result), vec!["a", "bb"]);
}

#[test]
fn test_map_entries() {
    let schema = map(string(), number());
    assert!(schema.safe_parse(Value::map([("a", 1)])).is_success());

    let result = schema.safe_parse(Value::map([
        (Value::from("a"), Value::from(1)),
        (Value::from(2), Value::from("x")),
    ]));
    assert_eq!(paths(&result), vec!["[1].key", "[1].value"]);

    assert_eq!(
        issue_codes(&schema.safe_parse(json!({ "a": 1 }))),
        vec![IssueCode::InvalidType]
    );
}

#[test]
fn test_set_members_and_size() {
    let schema: Schema = set(number()).min(2).into();
    assert!(schema.safe_parse(Value::set([1, 2])).is_success());
    assert_eq!(issue_codes(&schema.safe_parse(Value::set([1]))), vec![IssueCode::TooSmall]);
    assert_eq!(
        paths(&schema.safe_parse(Value::set([Value::from(1), Value::from("x")]))),
        vec!["[1]"]
    );
}

// =============================================================================
// Intersections
// =============================================================================

#[test]
fn test_intersection_merges_objects() {
    let schema = intersection(
        object([("a", Schema::from(string()))]),
        object([("b", Schema::from(number()))]),
    );
    let output = schema.parse(json!({ "a": "x", "b": 1 })).unwrap();
    assert_eq!(output.get("a"), Some(&Value::from("x")));
    assert_eq!(output.get("b"), Some(&Value::from(1)));
}

#[test]
fn test_intersection_conflict() {
    let schema = string()
        .transform(|_| Value::from("left"))
        .and(string().transform(|_| Value::from("right")));
    assert_eq!(
        issue_codes(&schema.safe_parse("x")),
        vec![IssueCode::InvalidIntersectionTypes]
    );
}

#[test]
fn test_intersection_reports_both_sides() {
    let schema = intersection(
        object([("a", Schema::from(string()))]),
        object([("b", Schema::from(number()))]),
    );
    assert_eq!(paths(&schema.safe_parse(json!({}))), vec!["a", "b"]);
}

// =============================================================================
// Literals and Enums
// =============================================================================

#[test]
fn test_literal() {
    let schema = literal(42);
    assert!(schema.safe_parse(42).is_success());
    assert_eq!(issue_codes(&schema.safe_parse(43)), vec![IssueCode::InvalidLiteral]);
}

#[test]
fn test_enum_derivations() {
    let colors = enum_of(["red", "green", "blue"]);
    let warm: Schema = colors.extract(&["red"]).into();
    let cool: Schema = colors.exclude(&["red"]).into();

    assert!(warm.safe_parse("red").is_success());
    assert!(!warm.safe_parse("blue").is_success());
    assert!(cool.safe_parse("blue").is_success());
    assert!(!cool.safe_parse("red").is_success());
    assert_eq!(colors.options(), &["red", "green", "blue"]);
}

#[test]
fn test_native_enum() {
    let direction: Schema = native_enum([("Up", 1), ("Down", 2)]).into();
    assert!(direction.safe_parse(1).is_success());
    assert_eq!(
        issue_codes(&direction.safe_parse(3)),
        vec![IssueCode::InvalidEnumValue]
    );
    assert_eq!(
        issue_codes(&direction.safe_parse(true)),
        vec![IssueCode::InvalidType]
    );
}

// =============================================================================
// Strings
// =============================================================================

#[test]
fn test_string_transforms_feed_later_checks() {
    let schema: Schema = string().trim().to_lowercase().starts_with("he").into();
    assert_eq!(schema.parse("  HeLLo ").unwrap(), Value::from("hello"));
}

#[test]
fn test_string_formats() {
    let email: Schema = string().email().into();
    assert!(email.safe_parse("ada@example.com").is_success());
    match &email.safe_parse("ada").issues()[0].kind {
        IssueKind::InvalidString { validation } => {
            assert_eq!(validation, &StringValidation::Email)
        }
        other => panic!("expected invalid_string, got {:?}", other),
    }

    let uuid: Schema = string().uuid().into();
    assert!(uuid
        .safe_parse("123e4567-e89b-12d3-a456-426614174000")
        .is_success());
    assert!(!uuid.safe_parse("123e4567").is_success());

    let ip: Schema = string().ip().into();
    assert!(ip.safe_parse("192.168.0.1").is_success());
    assert!(ip.safe_parse("::1").is_success());
    assert!(!ip.safe_parse("300.1.1.1").is_success());

    let url: Schema = string().url().into();
    assert!(url.safe_parse("https://example.com/a?b=c").is_success());
    assert!(!url.safe_parse("not a url").is_success());

    let datetime: Schema = string().datetime().into();
    assert!(datetime.safe_parse("2024-01-01T00:00:00Z").is_success());
    assert!(!datetime.safe_parse("2024-01-01").is_success());
}

#[test]
fn test_oversized_precision_builds_and_rejects() {
    let datetime: Schema = string()
        .datetime_with(schemakit::schema::DatetimeOptions {
            precision: Some(1_000_000),
            ..Default::default()
        })
        .into();
    let result = datetime.safe_parse("2024-01-01T00:00:00.123Z");
    assert_eq!(issue_codes(&result), vec![IssueCode::InvalidString]);

    let time: Schema = string().time_with(Some(u32::MAX)).into();
    assert!(!time.safe_parse("12:00:00.1").is_success());
    let millis: Schema = string().time_with(Some(3)).into();
    assert!(millis.safe_parse("12:00:00.125").is_success());
}

#[test]
fn test_custom_check_message() {
    let schema: Schema = string().min(3).message("too short").into();
    assert_eq!(schema.safe_parse("ab").issues()[0].message, "too short");
}

#[test]
fn test_string_length_counts_characters() {
    let schema: Schema = string().max(2).into();
    assert!(schema.safe_parse("héé").issues().len() == 1);
    assert!(schema.safe_parse("hé").is_success());
}

// =============================================================================
// Dates, Coercion and Other Leaves
// =============================================================================

#[test]
fn test_date_bounds() {
    let floor = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let schema: Schema = date().min(floor).into();
    assert!(schema.safe_parse(floor).is_success());
    let early = Utc.with_ymd_and_hms(2019, 12, 31, 0, 0, 0).unwrap();
    assert_eq!(issue_codes(&schema.safe_parse(early)), vec![IssueCode::TooSmall]);
}

#[test]
fn test_coercing_constructors() {
    let flag: Schema = coerce::boolean();
    assert_eq!(flag.parse("false").unwrap(), Value::Bool(true));
    assert_eq!(flag.parse("").unwrap(), Value::Bool(false));

    let big: Schema = coerce::bigint().into();
    assert_eq!(big.parse("12").unwrap(), Value::BigInt(12));
    assert_eq!(issue_codes(&big.safe_parse(1.5)), vec![IssueCode::InvalidType]);

    let when: Schema = coerce::date().into();
    assert_eq!(
        when.parse("2024-03-01").unwrap(),
        Value::Date(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(issue_codes(&when.safe_parse("garbage")), vec![IssueCode::InvalidDate]);

    let text: Schema = coerce::string().into();
    assert_eq!(text.parse(12).unwrap(), Value::from("12"));
}

#[test]
fn test_nullish_and_nullable() {
    let nullish = string().nullish();
    assert!(nullish.safe_parse(Value::Null).is_success());
    assert!(nullish.safe_parse(Value::Undefined).is_success());

    let nullable = string().nullable();
    assert!(nullable.safe_parse(Value::Null).is_success());
    assert!(!nullable.safe_parse(Value::Undefined).is_success());
}

#[test]
fn test_preprocess() {
    let schema = preprocess(
        |v| match v.as_str() {
            Some(s) => Value::from(s.split(',').map(Value::from).collect::<Vec<_>>()),
            None => v,
        },
        array(string()).min(2),
    );
    assert_eq!(
        schema.parse("a,b").unwrap(),
        Value::array(["a", "b"])
    );
}

#[derive(Debug)]
struct Connection;

#[derive(Debug)]
struct File;

#[test]
fn test_instance_of() {
    let schema = instance_of::<Connection>();
    assert!(schema.safe_parse(Value::opaque(Connection)).is_success());

    let result = schema.safe_parse(Value::opaque(File));
    assert_eq!(issue_codes(&result), vec![IssueCode::Custom]);
    assert_eq!(result.issues()[0].message, "Input not instance of Connection");
}

#[test]
fn test_symbol_and_never() {
    let schema = symbol();
    assert!(schema.safe_parse(Value::Symbol(Symbol::new(Some("id")))).is_success());
    assert!(!schema.safe_parse("id").is_success());

    assert!(!never().safe_parse(Value::Null).is_success());
    assert!(unknown().safe_parse(Value::Undefined).is_success());
}

// =============================================================================
// Refinements and Transforms
// =============================================================================

#[test]
fn test_super_refine_paths() {
    let schema = object([
        ("password", Schema::from(string())),
        ("confirm", Schema::from(string())),
    ])
    .super_refine(|v| {
        if v.get("password") != v.get("confirm") {
            vec![CustomIssue::new("Passwords do not match").at("confirm")]
        } else {
            Vec::new()
        }
    });

    let result = schema.safe_parse(json!({ "password": "a", "confirm": "b" }));
    assert_eq!(paths(&result), vec!["confirm"]);
    assert_eq!(result.issues()[0].message, "Passwords do not match");
}

#[test]
fn test_refine_params() {
    let schema = number().refine(
        |v| v.as_f64().map_or(false, |n| n % 2.0 == 0.0),
        RefineParams::message("must be even").at("value"),
    );
    let result = schema.safe_parse(3);
    assert_eq!(paths(&result), vec!["value"]);
    assert_eq!(result.issues()[0].message, "must be even");
}

#[test]
fn test_try_transform_failures() {
    let parsed = string().try_transform(|v| match v.as_str().and_then(|s| s.parse::<f64>().ok()) {
        Some(n) => Ok(Value::from(n)),
        None => Err(vec![CustomIssue::new("not numeric")]),
    });
    assert_eq!(parsed.parse("2.5").unwrap(), Value::from(2.5));
    assert_eq!(parsed.safe_parse("x").issues()[0].message, "not numeric");

    let silent = string().try_transform(|_| Err(Vec::new()));
    assert_eq!(issue_codes(&silent.safe_parse("x")), vec![IssueCode::Custom]);
}

#[test]
fn test_describe_keeps_behavior() {
    let schema = string().describe("display name");
    assert_eq!(schema.description(), Some("display name"));
    assert!(schema.safe_parse("ada").is_success());
}
