#![allow(missing_docs)]

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use sombra_client::query::{
    ast::QueryId,
    coerce::{element_to_id_and_values, to_db_key_value, to_db_value},
    value::{DbF64, DbId, DbValue},
    Coercer, IntegerPolicy,
};

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

fn arb_db_value() -> impl Strategy<Value = DbValue> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..8).prop_map(DbValue::Bytes),
        any::<i64>().prop_map(DbValue::I64),
        any::<u64>().prop_map(DbValue::U64),
        finite_f64().prop_map(|f| DbValue::F64(DbF64(f))),
        "[a-z]{0,12}".prop_map(DbValue::String),
        prop::collection::vec(any::<i64>(), 0..6).prop_map(DbValue::VecI64),
        prop::collection::vec(any::<u64>(), 0..6).prop_map(DbValue::VecU64),
        prop::collection::vec(finite_f64().prop_map(DbF64), 0..6).prop_map(DbValue::VecF64),
        prop::collection::vec("[a-z]{0,6}", 0..6).prop_map(DbValue::VecString),
    ]
}

proptest! {
    #[test]
    fn prop_tagged_values_pass_through(value in arb_db_value()) {
        let native = serde_json::to_value(&value).unwrap();
        prop_assert_eq!(to_db_value(&native).unwrap(), Some(value));
    }

    #[test]
    fn prop_signed_integers_tag_by_range(n in any::<i64>()) {
        prop_assert_eq!(to_db_value(&json!(n)).unwrap(), Some(DbValue::I64(n)));
    }

    #[test]
    fn prop_large_integers_are_unsigned(n in (i64::MAX as u64 + 1)..=u64::MAX) {
        prop_assert_eq!(to_db_value(&json!(n)).unwrap(), Some(DbValue::U64(n)));
    }

    #[test]
    fn prop_unsigned_policy_tags_non_negative(n in 0u64..=u64::MAX) {
        let coercer = Coercer::new(IntegerPolicy::Unsigned);
        prop_assert_eq!(coercer.to_db_value(&json!(n)).unwrap(), Some(DbValue::U64(n)));
    }

    #[test]
    fn prop_float_arrays_are_vec_f64(items in prop::collection::vec(finite_f64(), 1..8)) {
        let expected = DbValue::VecF64(items.iter().copied().map(DbF64).collect());
        prop_assert_eq!(to_db_value(&json!(items)).unwrap(), Some(expected));
    }

    #[test]
    fn prop_string_arrays_are_vec_string(items in prop::collection::vec("[a-z]{0,8}", 1..8)) {
        prop_assert_eq!(
            to_db_value(&json!(items.clone())).unwrap(),
            Some(DbValue::VecString(items))
        );
    }

    #[test]
    fn prop_element_preserves_field_order(
        id in any::<i64>(),
        fields in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8),
    ) {
        let mut record = Map::new();
        record.insert("db_id".into(), json!(id));
        for (key, value) in &fields {
            record.insert(key.clone(), json!(value));
        }
        let (query_id, values) = element_to_id_and_values(&Value::Object(record)).unwrap();
        prop_assert_eq!(query_id, QueryId::Id(DbId(id)));
        let keys: Vec<DbValue> = values.iter().map(|kv| kv.key.clone()).collect();
        let expected: Vec<DbValue> = fields
            .keys()
            .filter(|key| key.as_str() != "db_id")
            .map(|key| DbValue::String(key.clone()))
            .collect();
        prop_assert_eq!(keys, expected);
    }
}

#[test]
fn booleans_become_strings() {
    assert_eq!(
        to_db_value(&json!(true)).unwrap(),
        Some(DbValue::String("true".into()))
    );
    assert_eq!(
        serde_json::to_value(to_db_value(&json!(false)).unwrap()).unwrap(),
        json!({"String": "false"})
    );
}

#[test]
fn null_is_absent() {
    assert_eq!(to_db_value(&Value::Null).unwrap(), None);
}

#[test]
fn mixed_arrays_are_rejected() {
    let err = to_db_value(&json!([1, "a"])).unwrap_err();
    assert!(err.is_coercion());
    let err = to_db_value(&json!([-1, u64::MAX])).unwrap_err();
    assert!(err.is_coercion());
}

#[test]
fn untagged_objects_are_rejected() {
    assert!(to_db_value(&json!({"a": 1, "b": 2})).is_err());
}

#[test]
fn key_value_requires_both_sides() {
    let pair = to_db_key_value(&json!({"key": "age", "value": 3})).unwrap();
    assert_eq!(pair.key, DbValue::String("age".into()));
    assert_eq!(pair.value, DbValue::I64(3));
    assert!(to_db_key_value(&json!({"key": "age"})).is_err());
    assert!(to_db_key_value(&json!({"key": "age", "value": null})).is_err());
}

#[test]
fn db_id_must_be_integer_or_alias() {
    assert!(element_to_id_and_values(&json!({"db_id": 1.5})).is_err());
    assert!(element_to_id_and_values(&json!({"db_id": true})).is_err());
    let (id, values) = element_to_id_and_values(&json!({"db_id": "root"})).unwrap();
    assert_eq!(id, QueryId::Alias("root".into()));
    assert!(values.is_empty());
}
