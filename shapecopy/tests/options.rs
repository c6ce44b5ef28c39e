mod fixtures;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use fixtures::{Struct2, Sub1};
use insta::assert_snapshot;
use shapecopy::{CopyErrorKind, CopyOptions, OnFieldError, PathSegment, Value, copy, copy_with};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

fn collecting() -> CopyOptions {
    CopyOptions::new().on_field_error(OnFieldError::CollectAndContinue)
}

fn bad_record_source() -> Value {
    Value::from([
        ("id1", Value::from("ok")),
        ("int1", Value::from("bad")),
        ("int2", Value::from("worse")),
        ("data1", Value::from("also ok")),
        ("sub_ptr", Value::from([("sub2", Value::Int(5))])),
    ])
}

/// Keeps the `error` field of every warning.
#[derive(Clone, Default)]
struct Warnings(Arc<Mutex<Vec<String>>>);

struct ErrorField(Option<String>);

impl Visit for ErrorField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "error" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for Warnings {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = ErrorField(None);
        event.record(&mut visitor);
        if let Some(error) = visitor.0 {
            self.0.lock().unwrap().push(error);
        }
    }
}

#[test]
fn abort_stops_at_first_failure() {
    let mut dest = Struct2::default();

    let err = copy(&bad_record_source(), &mut dest).unwrap_err();

    assert_snapshot!(err.to_string(), @"unsupported coercion from String to isize at int1");
    assert_eq!(dest.id1, "ok");
    assert_eq!(dest.data1, "also ok");
    assert!(dest.sub_ptr.is_none());
}

#[test]
fn collect_and_continue_copies_the_rest() {
    let mut dest = Struct2::default();

    let err = copy_with(&bad_record_source(), &mut dest, &collecting()).unwrap_err();

    let CopyErrorKind::Collected { errors } = err.kind() else {
        panic!("expected collected errors, got {err}");
    };
    assert_eq!(errors.len(), 2);
    assert_snapshot!(
        err.to_string(),
        @"2 field errors; unsupported coercion from String to isize at int1; unsupported coercion from String to i32 at int2"
    );
    assert_eq!(dest.id1, "ok");
    assert_eq!(dest.sub_ptr.as_deref().map(|sub| sub.sub2), Some(5));
}

#[test]
fn collect_and_continue_applies_to_maps() {
    let source = Value::from([
        ("a", Value::I32(1)),
        ("b", Value::from("no")),
        ("c", Value::I32(3)),
    ]);
    let mut dest: HashMap<String, i32> = HashMap::new();

    let err = copy_with(&source, &mut dest, &collecting()).unwrap_err();

    assert_snapshot!(
        err.to_string(),
        @r#"1 field errors; unsupported coercion from String to i32 at ["b"]"#
    );
    assert_eq!(dest.len(), 2);
}

#[test]
fn collect_and_continue_without_failures_is_ok() {
    let source = Value::from([("sub1", Value::from("x"))]);
    let mut dest = Sub1::default();

    copy_with(&source, &mut dest, &collecting()).unwrap();

    assert_eq!(dest.sub1, "x");
}

#[test]
fn nested_failures_are_collected_inside_their_record() {
    let source = Value::from([(
        "sub_ptr",
        Value::from([("sub1", Value::I32(1)), ("sub2", Value::Int(2))]),
    )]);
    let mut dest = Struct2::default();

    let err = copy_with(&source, &mut dest, &collecting()).unwrap_err();

    // The nested record collects on its own; its failure keeps the field unset.
    assert_snapshot!(
        err.to_string(),
        @"1 field errors; unsupported coercion from i32 to String at sub_ptr.sub1"
    );
    assert!(dest.sub_ptr.is_none());
}

#[test]
fn sequences_ignore_the_policy() {
    let source = vec![Value::Int(1), Value::from("x")];
    let mut dest: Vec<i32> = Vec::new();

    let err = copy_with(&source, &mut dest, &collecting()).unwrap_err();

    assert!(matches!(err.kind(), CopyErrorKind::UnsupportedCoercion { .. }));
    assert!(dest.is_empty());
}

#[test]
fn collected_element_errors_carry_their_index() {
    let source = vec![
        Value::from([("int2", Value::Int(1))]),
        Value::from([("int1", Value::from("bad")), ("int2", Value::from("worse"))]),
    ];
    let mut dest: Vec<Struct2> = Vec::new();

    let err = copy_with(&source, &mut dest, &collecting()).unwrap_err();

    let CopyErrorKind::Collected { errors } = err.kind() else {
        panic!("expected collected errors, got {err}");
    };
    assert_eq!(
        errors[0].path().segments(),
        &[PathSegment::Index(1), PathSegment::Field("int1")]
    );
    assert_snapshot!(
        err.to_string(),
        @"2 field errors; unsupported coercion from String to isize at [1].int1; unsupported coercion from String to i32 at [1].int2"
    );
    assert!(dest.is_empty());
}

#[test]
fn each_skipped_field_is_logged() {
    let warnings = Warnings::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    let mut dest = Struct2::default();

    let result = tracing::subscriber::with_default(subscriber, || {
        copy_with(&bad_record_source(), &mut dest, &collecting())
    });

    assert!(result.is_err());
    assert_eq!(
        *warnings.0.lock().unwrap(),
        [
            "unsupported coercion from String to isize at int1",
            "unsupported coercion from String to i32 at int2",
        ]
    );
}

#[test]
fn abort_logs_nothing() {
    let warnings = Warnings::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    let mut dest = Struct2::default();

    let result =
        tracing::subscriber::with_default(subscriber, || copy(&bad_record_source(), &mut dest));

    assert!(result.is_err());
    assert!(warnings.0.lock().unwrap().is_empty());
}
