#![allow(missing_docs)]

use sombra_client::query::{
    ast::{
        Comparison, CountComparison, QueryCondition, QueryConditionData, QueryConditionLogic,
        QueryConditionModifier, SearchQuery,
    },
    QueryBuilder, QueryType,
};

fn conditions(query: QueryType) -> Vec<QueryCondition> {
    match query {
        QueryType::Search(SearchQuery { conditions, .. }) => conditions,
        other => panic!("expected Search, got {}", other.name()),
    }
}

fn group(condition: &QueryCondition) -> &[QueryCondition] {
    match &condition.data {
        QueryConditionData::Where(inner) => inner,
        other => panic!("expected Where group, got {other:?}"),
    }
}

#[test]
fn end_where_splices_group_next_to_its_peer() {
    let conditions = conditions(
        QueryBuilder::search()
            .from(1)
            .where_()
            .node()
            .or()
            .where_()
            .edge()
            .and()
            .key("k")
            .value(Comparison::Equal(1.into()))
            .end_where()
            .query(),
    );

    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0].data, QueryConditionData::Node);
    assert_eq!(conditions[1].logic, QueryConditionLogic::Or);

    let inner = group(&conditions[1]);
    assert_eq!(inner.len(), 2);
    assert_eq!(inner[0].data, QueryConditionData::Edge);
    assert_eq!(
        inner[1].data,
        QueryConditionData::KeyValue {
            key: "k".into(),
            value: Comparison::Equal(1.into()),
        }
    );
}

#[test]
fn query_closes_groups_left_open() {
    let conditions = conditions(
        QueryBuilder::search()
            .from(1)
            .where_()
            .where_()
            .where_()
            .node()
            .query(),
    );
    assert_eq!(conditions.len(), 1);
    let middle = group(&conditions[0]);
    assert_eq!(middle.len(), 1);
    let innermost = group(&middle[0]);
    assert_eq!(innermost.len(), 1);
    let leaf = group(&innermost[0]);
    assert_eq!(leaf[0].data, QueryConditionData::Node);
}

#[test]
fn conditions_after_end_where_land_in_parent() {
    let conditions = conditions(
        QueryBuilder::search()
            .from(1)
            .where_()
            .edge()
            .and()
            .where_()
            .edge_count_from(CountComparison::GreaterThan(1))
            .end_where()
            .or()
            .edge_count_to(CountComparison::Equal(0))
            .query(),
    );
    assert_eq!(conditions.len(), 3);
    assert_eq!(conditions[0].data, QueryConditionData::Edge);
    assert_eq!(group(&conditions[1]).len(), 1);
    assert_eq!(
        conditions[2].data,
        QueryConditionData::EdgeCountTo(CountComparison::Equal(0))
    );
    assert_eq!(conditions[2].logic, QueryConditionLogic::Or);
}

#[test]
fn modifier_applies_to_one_predicate_only() {
    let conditions = conditions(
        QueryBuilder::search()
            .from(1)
            .where_()
            .not_beyond()
            .ids([2, 3])
            .and()
            .node()
            .or()
            .beyond()
            .keys(["name"])
            .and()
            .distance(CountComparison::LessThan(3))
            .query(),
    );
    let modifiers: Vec<_> = conditions.iter().map(|c| c.modifier).collect();
    assert_eq!(
        modifiers,
        vec![
            QueryConditionModifier::NotBeyond,
            QueryConditionModifier::None,
            QueryConditionModifier::Beyond,
            QueryConditionModifier::None,
        ]
    );
    let logic: Vec<_> = conditions.iter().map(|c| c.logic).collect();
    assert_eq!(
        logic,
        vec![
            QueryConditionLogic::And,
            QueryConditionLogic::And,
            QueryConditionLogic::Or,
            QueryConditionLogic::And,
        ]
    );
}

#[test]
fn modifier_on_group_marks_the_group() {
    let conditions = conditions(
        QueryBuilder::search()
            .from(1)
            .where_()
            .not()
            .where_()
            .edge()
            .end_where()
            .query(),
    );
    assert_eq!(conditions[0].modifier, QueryConditionModifier::Not);
    assert_eq!(group(&conditions[0])[0].modifier, QueryConditionModifier::None);
}

#[test]
fn stray_end_where_keeps_conditions() {
    let conditions = conditions(
        QueryBuilder::search()
            .elements()
            .where_()
            .node()
            .end_where()
            .or()
            .edge()
            .query(),
    );
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[1].data, QueryConditionData::Edge);
}
