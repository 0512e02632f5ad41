//! Insert stages: aliases, edges, nodes, values, elements and indexes.

use serde::Serialize;

use crate::error::Result;
use crate::query::ast::{QueryIds, QueryValues, SearchQuery};
use crate::query::coerce::Coercer;
use crate::query::finite::ensure_finite;
use crate::query::payload::{
    InsertAliasesQuery, InsertEdgesQuery, InsertIndexQuery, InsertNodesQuery, InsertValuesQuery,
    QueryType,
};
use crate::query::value::{DbKeyValue, DbValue};

use super::search::{Search, SearchTarget};
use super::{terminal_stage, QueryAliases};

/// Root insert stage.
#[derive(Clone, Debug, Default)]
pub struct Insert {
    coercer: Coercer,
}

impl Insert {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Uses `coercer` for records passed to `element`/`elements`.
    pub fn with_coercer(mut self, coercer: Coercer) -> Self {
        self.coercer = coercer;
        self
    }

    /// Assigns `names` to elements chosen by the next stage.
    pub fn aliases<A: Into<QueryAliases>>(self, names: A) -> InsertAliases {
        InsertAliases(InsertAliasesQuery {
            ids: QueryIds::default(),
            aliases: names.into().0,
        })
    }

    /// Inserts edges between nodes chosen by the next stages.
    pub fn edges(self) -> InsertEdges {
        InsertEdges(InsertEdgesQuery {
            ids: QueryIds::default(),
            from: QueryIds::default(),
            to: QueryIds::default(),
            values: QueryValues::default(),
            each: false,
        })
    }

    /// Writes the fields of one record to the element named by its `db_id`.
    pub fn element<T: Serialize>(self, record: &T) -> Result<InsertValuesIds> {
        self.elements(std::slice::from_ref(record))
    }

    /// Writes the fields of each record to the element named by its `db_id`,
    /// one row per record in input order.
    pub fn elements<T: Serialize>(self, records: &[T]) -> Result<InsertValuesIds> {
        let mut ids = Vec::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            ensure_finite(record)?;
            let native = serde_json::to_value(record)?;
            let (id, values) = self.coercer.element_to_id_and_values(&native)?;
            ids.push(id);
            rows.push(values);
        }
        Ok(InsertValuesIds(InsertValuesQuery {
            ids: QueryIds::Ids(ids),
            values: QueryValues::Multi(rows),
        }))
    }

    /// Creates an index over `key`.
    pub fn index<K: Into<DbValue>>(self, key: K) -> InsertIndex {
        InsertIndex(InsertIndexQuery(key.into()))
    }

    /// Inserts nodes.
    pub fn nodes(self) -> InsertNodes {
        InsertNodes(InsertNodesQuery {
            count: 0,
            values: QueryValues::default(),
            aliases: Vec::new(),
            ids: QueryIds::default(),
        })
    }

    /// Writes one list of values per target element.
    pub fn values<I, R, T>(self, values: I) -> InsertValues
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: Into<DbKeyValue>,
    {
        InsertValues(InsertValuesQuery {
            ids: QueryIds::default(),
            values: QueryValues::multi(values),
        })
    }

    /// Writes the same values to every target element.
    pub fn values_uniform<I, T>(self, values: I) -> InsertValues
    where
        I: IntoIterator<Item = T>,
        T: Into<DbKeyValue>,
    {
        InsertValues(InsertValuesQuery {
            ids: QueryIds::default(),
            values: QueryValues::single(values),
        })
    }
}

/// Aliases chosen, target ids pending.
#[derive(Clone, Debug)]
pub struct InsertAliases(InsertAliasesQuery);

impl InsertAliases {
    /// Elements receiving the aliases, matched by position.
    ///
    /// A search is accepted here but the server requires concrete ids and
    /// rejects the query.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> InsertAliasesIds {
        self.0.ids = ids.into();
        InsertAliasesIds(self.0)
    }
}

terminal_stage! {
    /// Alias insert ready.
    InsertAliasesIds(InsertAliasesQuery)
}

/// Edge insert root: origins pending, or existing edge ids to update.
#[derive(Clone, Debug)]
pub struct InsertEdges(InsertEdgesQuery);

/// Existing edges chosen for update; origins pending.
#[derive(Clone, Debug)]
pub struct InsertEdgesIds(InsertEdgesQuery);

/// Origins chosen; destinations pending.
#[derive(Clone, Debug)]
pub struct InsertEdgesFrom(InsertEdgesQuery);

/// Origins and destinations chosen.
#[derive(Clone, Debug)]
pub struct InsertEdgesFromTo(InsertEdgesQuery);

/// Every origin connects to every destination.
#[derive(Clone, Debug)]
pub struct InsertEdgesEach(InsertEdgesQuery);

terminal_stage! {
    /// Edge insert with values ready.
    InsertEdgesValues(InsertEdgesQuery)
}

impl InsertEdges {
    /// Updates the given edges instead of creating new ones.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> InsertEdgesIds {
        self.0.ids = ids.into();
        InsertEdgesIds(self.0)
    }

    /// Origin nodes.
    pub fn from<I: Into<QueryIds>>(mut self, ids: I) -> InsertEdgesFrom {
        self.0.from = ids.into();
        InsertEdgesFrom(self.0)
    }
}

impl InsertEdgesIds {
    /// Origin nodes.
    pub fn from<I: Into<QueryIds>>(mut self, ids: I) -> InsertEdgesFrom {
        self.0.from = ids.into();
        InsertEdgesFrom(self.0)
    }
}

impl InsertEdgesFrom {
    /// Destination nodes.
    pub fn to<I: Into<QueryIds>>(mut self, ids: I) -> InsertEdgesFromTo {
        self.0.to = ids.into();
        InsertEdgesFromTo(self.0)
    }
}

macro_rules! edge_values {
    ($($stage:ident),*) => {
        $(
            impl $stage {
                /// One list of values per created edge.
                pub fn values<I, R, T>(mut self, values: I) -> InsertEdgesValues
                where
                    I: IntoIterator<Item = R>,
                    R: IntoIterator<Item = T>,
                    T: Into<DbKeyValue>,
                {
                    self.0.values = QueryValues::multi(values);
                    InsertEdgesValues(self.0)
                }

                /// The same values on every created edge.
                pub fn values_uniform<I, T>(mut self, values: I) -> InsertEdgesValues
                where
                    I: IntoIterator<Item = T>,
                    T: Into<DbKeyValue>,
                {
                    self.0.values = QueryValues::single(values);
                    InsertEdgesValues(self.0)
                }

                /// Finalizes the query document.
                pub fn query(self) -> QueryType {
                    self.0.into()
                }
            }
        )*
    };
}

edge_values!(InsertEdgesFromTo, InsertEdgesEach);

impl InsertEdgesFromTo {
    /// Connects every origin to every destination instead of pairwise.
    pub fn each(mut self) -> InsertEdgesEach {
        self.0.each = true;
        InsertEdgesEach(self.0)
    }
}

terminal_stage! {
    /// Index insert ready.
    InsertIndex(InsertIndexQuery)
}

/// Node insert root.
#[derive(Clone, Debug)]
pub struct InsertNodes(InsertNodesQuery);

/// Existing nodes chosen for update.
#[derive(Clone, Debug)]
pub struct InsertNodesIds(InsertNodesQuery);

/// Aliases of the new nodes set; the count follows from them.
#[derive(Clone, Debug)]
pub struct InsertNodesAliases(InsertNodesQuery);

/// Node count fixed; only uniform values remain legal.
#[derive(Clone, Debug)]
pub struct InsertNodesCount(InsertNodesQuery);

terminal_stage! {
    /// Node insert with values ready.
    InsertNodesValues(InsertNodesQuery)
}

macro_rules! node_aliases_count {
    ($($stage:ident),*) => {
        $(
            impl $stage {
                /// Aliases of the nodes, one node per alias.
                pub fn aliases<A: Into<QueryAliases>>(mut self, names: A) -> InsertNodesAliases {
                    self.0.aliases = names.into().0;
                    InsertNodesAliases(self.0)
                }

                /// Number of nodes to create.
                pub fn count(mut self, count: u64) -> InsertNodesCount {
                    self.0.count = count;
                    InsertNodesCount(self.0)
                }
            }
        )*
    };
}

node_aliases_count!(InsertNodes, InsertNodesIds);

macro_rules! node_values {
    ($($stage:ident),*) => {
        $(
            impl $stage {
                /// One list of values per node.
                pub fn values<I, R, T>(mut self, values: I) -> InsertNodesValues
                where
                    I: IntoIterator<Item = R>,
                    R: IntoIterator<Item = T>,
                    T: Into<DbKeyValue>,
                {
                    self.0.values = QueryValues::multi(values);
                    InsertNodesValues(self.0)
                }
            }
        )*
    };
}

node_values!(InsertNodes, InsertNodesIds, InsertNodesAliases);

macro_rules! node_values_uniform {
    ($($stage:ident),*) => {
        $(
            impl $stage {
                /// The same values on every node.
                pub fn values_uniform<I, T>(mut self, values: I) -> InsertNodesValues
                where
                    I: IntoIterator<Item = T>,
                    T: Into<DbKeyValue>,
                {
                    self.0.values = QueryValues::single(values);
                    InsertNodesValues(self.0)
                }
            }
        )*
    };
}

node_values_uniform!(InsertNodes, InsertNodesIds, InsertNodesAliases, InsertNodesCount);

macro_rules! node_query {
    ($($stage:ident),*) => {
        $(
            impl $stage {
                /// Finalizes the query document.
                pub fn query(self) -> QueryType {
                    self.0.into()
                }
            }
        )*
    };
}

node_query!(InsertNodesIds, InsertNodesAliases, InsertNodesCount);

impl InsertNodes {
    /// Updates existing nodes (inserting any that do not exist yet).
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> InsertNodesIds {
        self.0.ids = ids.into();
        InsertNodesIds(self.0)
    }
}

/// Values chosen; target elements pending.
#[derive(Clone, Debug)]
pub struct InsertValues(InsertValuesQuery);

terminal_stage! {
    /// Values insert ready.
    InsertValuesIds(InsertValuesQuery)
}

impl InsertValues {
    /// Target elements.
    pub fn ids<I: Into<QueryIds>>(mut self, ids: I) -> InsertValuesIds {
        self.0.ids = ids.into();
        InsertValuesIds(self.0)
    }

    /// Targets the result of a search.
    pub fn search(self) -> Search<InsertValuesQuery> {
        Search::new(self.0)
    }
}

impl SearchTarget for InsertValuesQuery {
    fn with_search(mut self, search: SearchQuery) -> QueryType {
        self.ids = QueryIds::Search(search);
        self.into()
    }
}
