mod fixtures;

use chrono::{DateTime, Utc};
use fixtures::{Struct2, Sub1, timestamp};
use insta::assert_snapshot;
use shapecopy::{CopyErrorKind, Map, PathSegment, Value, copy};

fn rows(count: i32) -> Vec<Map> {
    (0..count)
        .map(|i| {
            let mut row = Map::new();
            row.insert("date2".into(), Value::from(timestamp()));
            row.insert(
                "sub_ptr".into(),
                Value::from([("generic1", Value::I32(i * 100))]),
            );
            row
        })
        .collect()
}

#[test]
fn mappings_into_records() {
    let source = rows(10);
    let mut dest: Vec<Struct2> = Vec::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.len(), 10);
    let sub = dest[7].sub_ptr.as_deref().unwrap();
    assert_eq!(sub.generic1.downcast_ref::<i32>(), Some(&700));
    assert_eq!(dest[7].date2, Some(timestamp()));
}

#[test]
fn mappings_into_record_references() {
    let source = rows(10);
    let mut dest: Vec<Option<Box<Struct2>>> = Vec::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.len(), 10);
    let record = dest[7].as_deref().unwrap();
    let sub = record.sub_ptr.as_deref().unwrap();
    assert_eq!(sub.generic1.downcast_ref::<i32>(), Some(&700));
}

#[test]
fn record_references_into_mappings() {
    let date = timestamp();
    let source: Vec<Option<Box<Struct2>>> = (0..10)
        .map(|i| {
            Some(Box::new(Struct2 {
                date2: Some(date),
                sub_ptr: Some(Box::new({
                    let mut sub = Sub1::default();
                    sub.generic1 = Value::I32(i * 100);
                    sub
                })),
                ..Default::default()
            }))
        })
        .collect();
    let mut dest: Vec<Map> = Vec::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.len(), 10);
    let sub = dest[7]["sub_ptr"]
        .downcast_ref::<Option<Box<Sub1>>>()
        .and_then(|sub| sub.as_deref())
        .unwrap();
    assert_eq!(sub.generic1.downcast_ref::<i32>(), Some(&700));
    assert_eq!(
        dest[7]["date2"].downcast_ref::<Option<DateTime<Utc>>>(),
        Some(&Some(date))
    );
}

#[test]
fn destination_is_replaced_not_appended() {
    let source = vec![Value::Int(1), Value::Int(2)];
    let mut dest: Vec<isize> = vec![7, 8, 9];

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest, [1, 2]);
}

#[test]
fn untyped_list_source() {
    let source = Value::from(vec![Value::from([("int2", Value::Int(5))])]);
    let mut dest: Vec<Struct2> = Vec::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.len(), 1);
    assert_eq!(dest[0].int2, 5);
}

#[test]
fn failed_element_aborts_whole_copy() {
    let mut source = rows(5);
    source[3].insert("int2".into(), Value::from("x"));
    let mut dest = vec![Struct2 {
        data1: "before".into(),
        ..Default::default()
    }];

    let err = copy(&source, &mut dest).unwrap_err();

    assert_snapshot!(err.to_string(), @"unsupported coercion from String to i32 at [3].int2");
    assert_eq!(
        err.path().segments(),
        [PathSegment::Index(3), PathSegment::Field("int2")]
    );
    assert_eq!(dest.len(), 1);
    assert_eq!(dest[0].data1, "before");
}

#[test]
fn sequence_into_record_is_rejected() {
    let source = rows(1);
    let mut dest = Struct2::default();

    let err = copy(&source, &mut dest).unwrap_err();

    assert_snapshot!(
        err.to_string(),
        @"destination must be a sequence when source is a sequence (got Vec into Struct2)"
    );
}

#[test]
fn record_into_sequence_is_rejected() {
    let source = Struct2::default();
    let mut dest: Vec<Struct2> = Vec::new();

    let err = copy(&source, &mut dest).unwrap_err();

    assert!(matches!(
        err.kind(),
        CopyErrorKind::ShapeMismatch {
            source_is_sequence: false,
            ..
        }
    ));
    assert_snapshot!(
        err.to_string(),
        @"source must be a sequence when destination is a sequence (got Struct2 into Vec)"
    );
}

#[test]
fn absent_destination_sequence() {
    let source = rows(2);
    let mut dest: Option<Vec<Struct2>> = None;

    let err = copy(&source, &mut dest).unwrap_err();

    assert!(matches!(err.kind(), CopyErrorKind::NilDestination { shape: "Option" }));
    assert!(err.path().is_empty());
}
