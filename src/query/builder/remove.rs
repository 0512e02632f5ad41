//! Remove stages.

use crate::query::ast::{QueryIds, SearchQuery};
use crate::query::payload::{
    QueryType, RemoveAliasesQuery, RemoveIndexQuery, RemoveQuery, RemoveValuesQuery,
};
use crate::query::value::DbValue;

use super::search::{Search, SearchTarget};
use super::{terminal_stage, QueryAliases, QueryKeys};

/// Root remove stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct Remove;

impl Remove {
    /// Drops the given aliases. Unknown aliases are ignored by the server.
    pub fn aliases<A: Into<QueryAliases>>(self, names: A) -> RemoveAliases {
        RemoveAliases(RemoveAliasesQuery(names.into().0))
    }

    /// Deletes elements (and the edges of deleted nodes).
    pub fn ids<I: Into<QueryIds>>(self, ids: I) -> RemoveIds {
        RemoveIds(RemoveQuery(ids.into()))
    }

    /// Deletes the elements a search finds.
    pub fn search(self) -> Search<RemoveQuery> {
        Search::new(RemoveQuery(QueryIds::default()))
    }

    /// Drops the index over `key`.
    pub fn index<K: Into<DbValue>>(self, key: K) -> RemoveIndex {
        RemoveIndex(RemoveIndexQuery(key.into()))
    }

    /// Removes property keys; target elements follow.
    pub fn values<K: Into<QueryKeys>>(self, keys: K) -> RemoveValues {
        RemoveValues(RemoveValuesQuery {
            ids: QueryIds::default(),
            keys: keys.into().0,
        })
    }
}

terminal_stage! {
    /// Alias removal ready.
    RemoveAliases(RemoveAliasesQuery)
}

terminal_stage! {
    /// Element removal ready.
    RemoveIds(RemoveQuery)
}

terminal_stage! {
    /// Index removal ready.
    RemoveIndex(RemoveIndexQuery)
}

/// Keys chosen; target elements pending.
#[derive(Clone, Debug)]
pub struct RemoveValues(RemoveValuesQuery);

terminal_stage! {
    /// Value removal ready.
    RemoveValuesIds(RemoveValuesQuery)
}

impl RemoveValues {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> RemoveValuesIds {
        self.0.ids = ids.into();
        RemoveValuesIds(self.0)
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<RemoveValuesQuery> {
        Search::new(self.0)
    }
}

impl SearchTarget for RemoveQuery {
    fn with_search(self, search: SearchQuery) -> QueryType {
        RemoveQuery(QueryIds::Search(search)).into()
    }
}

impl SearchTarget for RemoveValuesQuery {
    fn with_search(mut self, search: SearchQuery) -> QueryType {
        self.ids = QueryIds::Search(search);
        self.into()
    }
}
