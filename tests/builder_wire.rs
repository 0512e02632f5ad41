#![allow(missing_docs)]

use serde::Serialize;
use serde_json::{json, Value};
use sombra_client::query::{
    ast::{Comparison, CountComparison},
    value::DbKeyOrder,
    QueryBuilder, QueryType,
};

fn wire(query: &QueryType) -> Value {
    serde_json::to_value(query).expect("serialize query")
}

fn single_key(value: &Value) -> &str {
    let object = value.as_object().expect("query is an object");
    assert_eq!(object.len(), 1, "query must have one top-level key: {value}");
    object.keys().next().map(String::as_str).unwrap_or_default()
}

#[test]
fn insert_nodes_count_shape() {
    let query = QueryBuilder::insert().nodes().count(2).query();
    assert_eq!(
        wire(&query),
        json!({
            "InsertNodes": {
                "count": 2,
                "values": {"Single": []},
                "aliases": [],
                "ids": {"Ids": []}
            }
        })
    );
}

#[test]
fn insert_nodes_aliases_with_values_shape() {
    let query = QueryBuilder::insert()
        .nodes()
        .aliases(["alice", "bob"])
        .values([vec![("age", 36)], vec![("age", 41)]])
        .query();
    assert_eq!(
        wire(&query),
        json!({
            "InsertNodes": {
                "count": 0,
                "values": {"Multi": [
                    [{"key": {"String": "age"}, "value": {"I64": 36}}],
                    [{"key": {"String": "age"}, "value": {"I64": 41}}]
                ]},
                "aliases": ["alice", "bob"],
                "ids": {"Ids": []}
            }
        })
    );
}

#[test]
fn insert_edges_shape() {
    let query = QueryBuilder::insert()
        .edges()
        .from("alice")
        .to([2, 3])
        .each()
        .values_uniform([("since", 2020)])
        .query();
    assert_eq!(
        wire(&query),
        json!({
            "InsertEdges": {
                "ids": {"Ids": []},
                "from": {"Ids": [{"Alias": "alice"}]},
                "to": {"Ids": [{"Id": 2}, {"Id": 3}]},
                "values": {"Single": [{"key": {"String": "since"}, "value": {"I64": 2020}}]},
                "each": true
            }
        })
    );
}

#[test]
fn insert_alias_and_index_shapes() {
    assert_eq!(
        wire(&QueryBuilder::insert().aliases("root").ids(1).query()),
        json!({"InsertAlias": {"ids": {"Ids": [{"Id": 1}]}, "aliases": ["root"]}})
    );
    assert_eq!(
        wire(&QueryBuilder::insert().index("email").query()),
        json!({"InsertIndex": {"String": "email"}})
    );
}

#[derive(Serialize)]
struct Person {
    db_id: i64,
    name: &'static str,
    age: u32,
}

#[test]
fn element_extraction_is_deterministic() {
    let person = Person {
        db_id: 5,
        name: "John",
        age: 30,
    };
    let query = QueryBuilder::insert()
        .element(&person)
        .expect("coerce record")
        .query();
    assert_eq!(
        wire(&query),
        json!({
            "InsertValues": {
                "ids": {"Ids": [{"Id": 5}]},
                "values": {"Multi": [[
                    {"key": {"String": "name"}, "value": {"String": "John"}},
                    {"key": {"String": "age"}, "value": {"I64": 30}}
                ]]}
            }
        })
    );
}

#[test]
fn element_from_json_record_with_alias_id() {
    let record = json!({"db_id": "users", "tags": ["a", "b"], "note": null});
    let query = QueryBuilder::insert().element(&record).unwrap().query();
    assert_eq!(
        wire(&query),
        json!({
            "InsertValues": {
                "ids": {"Ids": [{"Alias": "users"}]},
                "values": {"Multi": [[
                    {"key": {"String": "tags"}, "value": {"VecString": ["a", "b"]}}
                ]]}
            }
        })
    );
}

#[test]
fn element_without_db_id_fails() {
    let record = json!({"name": "nobody"});
    let err = QueryBuilder::insert().element(&record).unwrap_err();
    assert!(err.is_coercion());
}

#[test]
fn ids_and_search_are_exclusive() {
    let by_ids = wire(&QueryBuilder::select().ids([1, 2]).query());
    let ids = &by_ids["SelectValues"]["ids"];
    assert!(ids.get("Ids").is_some() && ids.get("Search").is_none());

    let by_search = wire(&QueryBuilder::select().search().from(1).query());
    let ids = &by_search["SelectValues"]["ids"];
    assert!(ids.get("Search").is_some() && ids.get("Ids").is_none());
}

#[test]
fn standalone_search_passes_as_ids() {
    let query = QueryBuilder::remove()
        .ids(QueryBuilder::search().from("trash").where_().edge())
        .query();
    let value = wire(&query);
    assert_eq!(value["Remove"]["Search"]["origin"], json!({"Alias": "trash"}));
    assert_eq!(
        value["Remove"]["Search"]["conditions"],
        json!([{"data": "Edge", "logic": "And", "modifier": "None"}])
    );
}

#[test]
fn full_search_shape() {
    let query = QueryBuilder::search()
        .depth_first()
        .from("users")
        .order_by([DbKeyOrder::Asc("name".into())])
        .offset(1)
        .limit(10)
        .where_()
        .distance(CountComparison::LessThanOrEqual(2))
        .and()
        .not()
        .key("age")
        .value(Comparison::LessThan(18.into()))
        .query();
    assert_eq!(
        wire(&query),
        json!({
            "Search": {
                "algorithm": "DepthFirst",
                "origin": {"Alias": "users"},
                "destination": {"Id": 0},
                "limit": 10,
                "offset": 1,
                "order_by": [{"Asc": {"String": "name"}}],
                "conditions": [
                    {"data": {"Distance": {"LessThanOrEqual": 2}}, "logic": "And", "modifier": "None"},
                    {
                        "data": {"KeyValue": {"key": {"String": "age"}, "value": {"LessThan": {"I64": 18}}}},
                        "logic": "And",
                        "modifier": "Not"
                    }
                ]
            }
        })
    );
}

#[test]
fn every_family_has_one_top_level_key() {
    let queries = vec![
        QueryBuilder::insert().aliases("a").ids(1).query(),
        QueryBuilder::insert().edges().from(1).to(2).query(),
        QueryBuilder::insert().index("k").query(),
        QueryBuilder::insert().nodes().count(1).query(),
        QueryBuilder::insert().values_uniform([("k", 1)]).ids(1).query(),
        QueryBuilder::remove().ids(1).query(),
        QueryBuilder::remove().aliases("a").query(),
        QueryBuilder::remove().index("k").query(),
        QueryBuilder::remove().values("k").ids(1).query(),
        QueryBuilder::search().from(1).query(),
        QueryBuilder::select().aliases().ids(1).query(),
        QueryBuilder::select().aliases().query(),
        QueryBuilder::select().edge_count().ids(1).query(),
        QueryBuilder::select().indexes().query(),
        QueryBuilder::select().keys().ids(1).query(),
        QueryBuilder::select().key_count().ids(1).query(),
        QueryBuilder::select().node_count().query(),
        QueryBuilder::select().values("k").ids(1).query(),
    ];
    for query in &queries {
        let value = wire(query);
        assert_eq!(single_key(&value), query.name());
    }
}

#[test]
fn mutability_matches_family() {
    assert!(QueryBuilder::insert().nodes().count(1).query().is_mutable());
    assert!(QueryBuilder::remove().ids(1).query().is_mutable());
    assert!(!QueryBuilder::select().node_count().query().is_mutable());
    assert!(!QueryBuilder::search().from(1).query().is_mutable());
}

fn search_from(id: i64) -> Value {
    json!({
        "algorithm": "BreadthFirst",
        "origin": {"Id": id},
        "destination": {"Id": 0},
        "limit": 0,
        "offset": 0,
        "order_by": [],
        "conditions": []
    })
}

#[test]
fn insert_nodes_update_mode_shape() {
    assert_eq!(
        wire(&QueryBuilder::insert().nodes().ids([1, 2]).query()),
        json!({
            "InsertNodes": {
                "count": 0,
                "values": {"Single": []},
                "aliases": [],
                "ids": {"Ids": [{"Id": 1}, {"Id": 2}]}
            }
        })
    );

    let aliased = QueryBuilder::insert()
        .nodes()
        .ids(1)
        .aliases("a")
        .values_uniform([("k", 1)])
        .query();
    assert_eq!(
        wire(&aliased),
        json!({
            "InsertNodes": {
                "count": 0,
                "values": {"Single": [{"key": {"String": "k"}, "value": {"I64": 1}}]},
                "aliases": ["a"],
                "ids": {"Ids": [{"Id": 1}]}
            }
        })
    );

    let counted = wire(&QueryBuilder::insert().nodes().ids("a").count(2).query());
    assert_eq!(counted["InsertNodes"]["count"], json!(2));
    assert_eq!(counted["InsertNodes"]["ids"], json!({"Ids": [{"Alias": "a"}]}));
}

#[test]
fn insert_aliases_accepts_search_ids() {
    let query = QueryBuilder::insert()
        .aliases("x")
        .ids(QueryBuilder::search().from(1))
        .query();
    assert_eq!(
        wire(&query),
        json!({"InsertAlias": {"ids": {"Search": search_from(1)}, "aliases": ["x"]}})
    );
}

#[test]
fn select_aliases_and_counts_by_search() {
    assert_eq!(
        wire(&QueryBuilder::select().aliases().search().from(1).query()),
        json!({"SelectAliases": {"Search": search_from(1)}})
    );
    assert_eq!(
        wire(&QueryBuilder::select().key_count().search().from(2).query()),
        json!({"SelectKeyCount": {"Search": search_from(2)}})
    );

    let edge_counts = [
        (QueryBuilder::select().edge_count().search().from(3).query(), true, true),
        (QueryBuilder::select().edge_count_from().search().from(3).query(), true, false),
        (QueryBuilder::select().edge_count_to().search().from(3).query(), false, true),
    ];
    for (query, from, to) in edge_counts {
        assert_eq!(
            wire(&query),
            json!({"SelectEdgeCount": {"ids": {"Search": search_from(3)}, "from": from, "to": to}})
        );
    }
}
