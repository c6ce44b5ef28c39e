mod fixtures;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fixtures::{Struct1, Sub1, timestamp};
use shapecopy::{Map, Value, copy};

#[test]
fn record_into_untyped_map() {
    let date = timestamp();
    let source = Struct1 {
        id1: "ID1_X".into(),
        data1: "Data1_X".into(),
        data2: "Data2_X".into(),
        int2: 804,
        date2: Some(date),
        sub_ptr: Some(Box::new({
            let mut sub = Sub1::default();
            sub.sub2 = 809;
            sub.generic1 = Value::Int(2022);
            sub
        })),
        ..Default::default()
    };
    let mut dest = Map::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(
        dest["data1"].downcast_ref::<String>().map(String::as_str),
        Some("Data1_X")
    );
    assert!(matches!(dest["int2"], Value::I32(804)));

    // Entries keep the representation of the field they came from.
    let date2 = dest["date2"].downcast_ref::<Option<DateTime<Utc>>>();
    assert_eq!(date2, Some(&Some(date)));
    let sub = dest["sub_ptr"]
        .downcast_ref::<Option<Box<Sub1>>>()
        .and_then(|sub| sub.as_deref())
        .unwrap();
    assert_eq!(sub.sub2, 809);
    assert_eq!(sub.generic1.downcast_ref::<isize>(), Some(&2022));

    for zero in ["int1", "int3", "date1", "map", "sub"] {
        assert!(!dest.contains_key(zero), "{zero} should be skipped");
    }
}

#[test]
fn record_private_fields_are_read() {
    let source = {
        let mut sub = Sub1::default();
        sub.sub1 = "a".into();
        sub
    }
    .with_private_data(3);
    let mut dest = Map::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.len(), 2);
    assert!(matches!(dest["private_data"], Value::Int(3)));
}

#[test]
fn same_map_type_is_replaced() {
    let date = timestamp();
    let mut source = Map::new();
    source.insert("data1".into(), Value::from("Data1_X"));
    source.insert("int2".into(), Value::Int(804));
    source.insert("date2".into(), Value::from(date));
    source.insert(
        "sub_ptr".into(),
        Value::from([("sub2", Value::Int(809)), ("generic1", Value::Int(2020))]),
    );
    let mut dest = Map::new();
    dest.insert("stale".into(), Value::Bool(true));

    copy(&source, &mut dest).unwrap();

    assert!(!dest.contains_key("stale"));
    assert!(matches!(dest["int2"], Value::Int(804)));
    assert!(matches!(dest["date2"], Value::Timestamp(d) if d == date));
    let sub = dest["sub_ptr"].as_map().unwrap();
    assert!(matches!(sub["generic1"], Value::Int(2020)));
}

#[test]
fn different_map_types_merge_entries() {
    let mut source = Map::new();
    source.insert("a".into(), Value::Null);
    source.insert("b".into(), Value::I32(0));
    source.insert("c".into(), Value::I32(1));
    let mut dest: HashMap<String, Value> = HashMap::new();
    dest.insert("d".into(), Value::Bool(true));

    copy(&source, &mut dest).unwrap();

    let mut keys: Vec<_> = dest.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["c", "d"]);
}

#[test]
fn typed_values_into_typed_map() {
    let mut source: HashMap<String, Value> = HashMap::new();
    source.insert("x".into(), Value::I32(4));
    let mut dest: HashMap<String, i32> = HashMap::new();

    copy(&source, &mut dest).unwrap();

    assert_eq!(dest.get("x"), Some(&4));
}
