//! Select stages.

use crate::query::ast::{QueryIds, SearchQuery};
use crate::query::payload::{
    QueryType, SelectAliasesQuery, SelectAllAliasesQuery, SelectEdgeCountQuery,
    SelectIndexesQuery, SelectKeyCountQuery, SelectKeysQuery, SelectNodeCountQuery,
    SelectValuesQuery,
};

use super::search::{Search, SearchTarget};
use super::{terminal_stage, QueryKeys};

/// Root select stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct Select;

impl Select {
    /// Selects aliases of chosen elements, or all aliases.
    pub fn aliases(self) -> SelectAliases {
        SelectAliases(SelectAliasesQuery(QueryIds::default()))
    }

    /// Selects every value of the given elements.
    pub fn ids<I: Into<QueryIds>>(self, ids: I) -> SelectValuesIds {
        SelectValuesIds(SelectValuesQuery {
            keys: Vec::new(),
            ids: ids.into(),
        })
    }

    /// Selects every value of the elements a search finds.
    pub fn search(self) -> Search<SelectValuesQuery> {
        Search::new(SelectValuesQuery {
            keys: Vec::new(),
            ids: QueryIds::default(),
        })
    }

    /// Selects property keys.
    pub fn keys(self) -> SelectKeys {
        SelectKeys(SelectKeysQuery(QueryIds::default()))
    }

    /// Counts property keys.
    pub fn key_count(self) -> SelectKeyCount {
        SelectKeyCount(SelectKeyCountQuery(QueryIds::default()))
    }

    /// Selects values of `keys` only.
    pub fn values<K: Into<QueryKeys>>(self, keys: K) -> SelectValues {
        SelectValues(SelectValuesQuery {
            keys: keys.into().0,
            ids: QueryIds::default(),
        })
    }

    /// Counts incoming and outgoing edges.
    pub fn edge_count(self) -> SelectEdgeCount {
        self.edge_count_with(true, true)
    }

    /// Counts outgoing edges.
    pub fn edge_count_from(self) -> SelectEdgeCount {
        self.edge_count_with(true, false)
    }

    /// Counts incoming edges.
    pub fn edge_count_to(self) -> SelectEdgeCount {
        self.edge_count_with(false, true)
    }

    fn edge_count_with(self, from: bool, to: bool) -> SelectEdgeCount {
        SelectEdgeCount(SelectEdgeCountQuery {
            ids: QueryIds::default(),
            from,
            to,
        })
    }

    /// Lists indexes.
    pub fn indexes(self) -> SelectIndexes {
        SelectIndexes(SelectIndexesQuery {})
    }

    /// Counts nodes.
    pub fn node_count(self) -> SelectNodeCount {
        SelectNodeCount(SelectNodeCountQuery {})
    }
}

terminal_stage! {
    /// Index listing ready.
    SelectIndexes(SelectIndexesQuery)
}

terminal_stage! {
    /// Node count ready.
    SelectNodeCount(SelectNodeCountQuery)
}

/// Aliases of chosen elements; without ids, all aliases.
#[derive(Clone, Debug)]
pub struct SelectAliases(SelectAliasesQuery);

impl SelectAliases {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(self, ids: I) -> SelectAliasesIds {
        SelectAliasesIds(SelectAliasesQuery(ids.into()))
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<SelectAliasesQuery> {
        Search::new(self.0)
    }

    /// Selects every alias in the database.
    pub fn query(self) -> QueryType {
        SelectAllAliasesQuery {}.into()
    }
}

terminal_stage! {
    /// Alias selection ready.
    SelectAliasesIds(SelectAliasesQuery)
}

/// Key selection; targets pending.
#[derive(Clone, Debug)]
pub struct SelectKeys(SelectKeysQuery);

terminal_stage! {
    /// Key selection ready.
    SelectKeysIds(SelectKeysQuery)
}

/// Key count; targets pending.
#[derive(Clone, Debug)]
pub struct SelectKeyCount(SelectKeyCountQuery);

terminal_stage! {
    /// Key count ready.
    SelectKeyCountIds(SelectKeyCountQuery)
}

/// Value selection; targets pending.
#[derive(Clone, Debug)]
pub struct SelectValues(SelectValuesQuery);

terminal_stage! {
    /// Value selection ready.
    SelectValuesIds(SelectValuesQuery)
}

/// Edge count; targets pending.
#[derive(Clone, Debug)]
pub struct SelectEdgeCount(SelectEdgeCountQuery);

terminal_stage! {
    /// Edge count ready.
    SelectEdgeCountIds(SelectEdgeCountQuery)
}

impl SelectKeys {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(self, ids: I) -> SelectKeysIds {
        SelectKeysIds(SelectKeysQuery(ids.into()))
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<SelectKeysQuery> {
        Search::new(self.0)
    }
}

impl SelectKeyCount {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(self, ids: I) -> SelectKeyCountIds {
        SelectKeyCountIds(SelectKeyCountQuery(ids.into()))
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<SelectKeyCountQuery> {
        Search::new(self.0)
    }
}

impl SelectValues {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> SelectValuesIds {
        self.0.ids = ids.into();
        SelectValuesIds(self.0)
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<SelectValuesQuery> {
        Search::new(self.0)
    }
}

impl SelectEdgeCount {
    /// Target nodes.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> SelectEdgeCountIds {
        self.0.ids = ids.into();
        SelectEdgeCountIds(self.0)
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<SelectEdgeCountQuery> {
        Search::new(self.0)
    }
}

impl SearchTarget for SelectAliasesQuery {
    fn with_search(self, search: SearchQuery) -> QueryType {
        SelectAliasesQuery(QueryIds::Search(search)).into()
    }
}

impl SearchTarget for SelectKeysQuery {
    fn with_search(self, search: SearchQuery) -> QueryType {
        SelectKeysQuery(QueryIds::Search(search)).into()
    }
}

impl SearchTarget for SelectKeyCountQuery {
    fn with_search(self, search: SearchQuery) -> QueryType {
        SelectKeyCountQuery(QueryIds::Search(search)).into()
    }
}

impl SearchTarget for SelectValuesQuery {
    fn with_search(mut self, search: SearchQuery) -> QueryType {
        self.ids = QueryIds::Search(search);
        self.into()
    }
}

impl SearchTarget for SelectEdgeCountQuery {
    fn with_search(mut self, search: SearchQuery) -> QueryType {
        self.ids = QueryIds::Search(search);
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::value::DbValue;
    use crate::query::QueryBuilder;
    use serde_json::json;

    #[test]
    fn aliases_without_ids_selects_all() {
        let query = QueryBuilder::select().aliases().query();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"SelectAllAliases": {}})
        );
    }

    #[test]
    fn aliases_for_empty_ids_is_not_select_all() {
        let query = QueryBuilder::select().aliases().ids(Vec::<i64>::new()).query();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"SelectAliases": {"Ids": []}})
        );
    }

    #[test]
    fn ids_select_all_values() {
        let QueryType::SelectValues(values) = QueryBuilder::select().ids([1, 2]).query() else {
            panic!("expected SelectValues");
        };
        assert!(values.keys.is_empty());
        assert_eq!(values.ids, QueryIds::from([1, 2]));
    }

    #[test]
    fn edge_count_flags() {
        let flags = |query: QueryType| match query {
            QueryType::SelectEdgeCount(count) => (count.from, count.to),
            other => panic!("unexpected {}", other.name()),
        };
        assert_eq!(flags(QueryBuilder::select().edge_count().ids(1).query()), (true, true));
        assert_eq!(
            flags(QueryBuilder::select().edge_count_from().ids(1).query()),
            (true, false)
        );
        assert_eq!(
            flags(QueryBuilder::select().edge_count_to().ids(1).query()),
            (false, true)
        );
    }

    #[test]
    fn keys_by_search() {
        let query = QueryBuilder::select()
            .keys()
            .search()
            .elements()
            .query();
        let QueryType::SelectKeys(SelectKeysQuery(ids)) = query else {
            panic!("expected SelectKeys");
        };
        assert!(ids.as_search().is_some());
    }

    #[test]
    fn values_keep_requested_keys() {
        let QueryType::SelectValues(values) = QueryBuilder::select()
            .values(["name", "age"])
            .ids("alice")
            .query()
        else {
            panic!("expected SelectValues");
        };
        assert_eq!(values.keys, vec![DbValue::from("name"), DbValue::from("age")]);
    }
}
