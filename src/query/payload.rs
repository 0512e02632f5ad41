//! Terminal query documents produced by the builders and the results the
//! server returns for them.

use serde::{Deserialize, Serialize};

use super::ast::{QueryIds, QueryValues, SearchQuery};
use super::value::{DbId, DbKeyValue, DbValue};

/// Assigns aliases to elements, positionally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertAliasesQuery {
    /// Target elements; must be concrete ids for the server to accept it.
    pub ids: QueryIds,
    /// Aliases matched to `ids` by position.
    pub aliases: Vec<String>,
}

/// Inserts new edges, or updates existing ones when `ids` is non-empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertEdgesQuery {
    /// Existing edges to update.
    pub ids: QueryIds,
    /// Origin nodes.
    pub from: QueryIds,
    /// Destination nodes.
    pub to: QueryIds,
    /// Edge properties.
    pub values: QueryValues,
    /// Connect every origin to every destination instead of pairwise.
    pub each: bool,
}

/// Creates an index over a property key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertIndexQuery(pub DbValue);

/// Inserts new nodes, or updates existing ones when `ids` is non-empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertNodesQuery {
    /// Number of nodes to create.
    pub count: u64,
    /// Node properties.
    pub values: QueryValues,
    /// Aliases of the new nodes.
    pub aliases: Vec<String>,
    /// Existing nodes to update.
    pub ids: QueryIds,
}

/// Inserts or replaces property values on existing elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertValuesQuery {
    /// Target elements.
    pub ids: QueryIds,
    /// Values to write.
    pub values: QueryValues,
}

/// Removes elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoveQuery(pub QueryIds);

/// Removes aliases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoveAliasesQuery(pub Vec<String>);

/// Drops an index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoveIndexQuery(pub DbValue);

/// Removes property keys from elements. Missing keys are ignored by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoveValuesQuery {
    /// Target elements.
    pub ids: QueryIds,
    /// Keys to drop.
    pub keys: Vec<DbValue>,
}

/// Selects the aliases of the given elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectAliasesQuery(pub QueryIds);

/// Selects every alias in the database.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectAllAliasesQuery {}

/// Counts edges of the given nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectEdgeCountQuery {
    /// Target nodes.
    pub ids: QueryIds,
    /// Count outgoing edges.
    pub from: bool,
    /// Count incoming edges.
    pub to: bool,
}

/// Lists all indexes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectIndexesQuery {}

/// Selects the property keys of the given elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectKeysQuery(pub QueryIds);

/// Counts property keys of the given elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectKeyCountQuery(pub QueryIds);

/// Counts all nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectNodeCountQuery {}

/// Selects property values; empty `keys` selects all of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectValuesQuery {
    /// Keys to select.
    pub keys: Vec<DbValue>,
    /// Target elements.
    pub ids: QueryIds,
}

/// Tagged query document sent to the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum QueryType {
    InsertAlias(InsertAliasesQuery),
    InsertEdges(InsertEdgesQuery),
    InsertIndex(InsertIndexQuery),
    InsertNodes(InsertNodesQuery),
    InsertValues(InsertValuesQuery),
    Remove(RemoveQuery),
    RemoveAliases(RemoveAliasesQuery),
    RemoveIndex(RemoveIndexQuery),
    RemoveValues(RemoveValuesQuery),
    Search(SearchQuery),
    SelectAliases(SelectAliasesQuery),
    SelectAllAliases(SelectAllAliasesQuery),
    SelectEdgeCount(SelectEdgeCountQuery),
    SelectIndexes(SelectIndexesQuery),
    SelectKeys(SelectKeysQuery),
    SelectKeyCount(SelectKeyCountQuery),
    SelectNodeCount(SelectNodeCountQuery),
    SelectValues(SelectValuesQuery),
}

impl QueryType {
    /// Wire tag of the document.
    pub fn name(&self) -> &'static str {
        match self {
            QueryType::InsertAlias(_) => "InsertAlias",
            QueryType::InsertEdges(_) => "InsertEdges",
            QueryType::InsertIndex(_) => "InsertIndex",
            QueryType::InsertNodes(_) => "InsertNodes",
            QueryType::InsertValues(_) => "InsertValues",
            QueryType::Remove(_) => "Remove",
            QueryType::RemoveAliases(_) => "RemoveAliases",
            QueryType::RemoveIndex(_) => "RemoveIndex",
            QueryType::RemoveValues(_) => "RemoveValues",
            QueryType::Search(_) => "Search",
            QueryType::SelectAliases(_) => "SelectAliases",
            QueryType::SelectAllAliases(_) => "SelectAllAliases",
            QueryType::SelectEdgeCount(_) => "SelectEdgeCount",
            QueryType::SelectIndexes(_) => "SelectIndexes",
            QueryType::SelectKeys(_) => "SelectKeys",
            QueryType::SelectKeyCount(_) => "SelectKeyCount",
            QueryType::SelectNodeCount(_) => "SelectNodeCount",
            QueryType::SelectValues(_) => "SelectValues",
        }
    }

    /// True for documents that modify the database and need `exec_mut`.
    pub fn is_mutable(&self) -> bool {
        matches!(
            self,
            QueryType::InsertAlias(_)
                | QueryType::InsertEdges(_)
                | QueryType::InsertIndex(_)
                | QueryType::InsertNodes(_)
                | QueryType::InsertValues(_)
                | QueryType::Remove(_)
                | QueryType::RemoveAliases(_)
                | QueryType::RemoveIndex(_)
                | QueryType::RemoveValues(_)
        )
    }
}

macro_rules! impl_into_query_type {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for QueryType {
                fn from(value: $payload) -> Self {
                    QueryType::$variant(value)
                }
            }
        )*
    };
}

impl_into_query_type! {
    InsertAliasesQuery => InsertAlias,
    InsertEdgesQuery => InsertEdges,
    InsertIndexQuery => InsertIndex,
    InsertNodesQuery => InsertNodes,
    InsertValuesQuery => InsertValues,
    RemoveQuery => Remove,
    RemoveAliasesQuery => RemoveAliases,
    RemoveIndexQuery => RemoveIndex,
    RemoveValuesQuery => RemoveValues,
    SearchQuery => Search,
    SelectAliasesQuery => SelectAliases,
    SelectAllAliasesQuery => SelectAllAliases,
    SelectEdgeCountQuery => SelectEdgeCount,
    SelectIndexesQuery => SelectIndexes,
    SelectKeysQuery => SelectKeys,
    SelectKeyCountQuery => SelectKeyCount,
    SelectNodeCountQuery => SelectNodeCount,
    SelectValuesQuery => SelectValues,
}

/// Element returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbElement {
    /// Element id.
    pub id: DbId,
    /// Origin for edges.
    #[serde(default)]
    pub from: Option<DbId>,
    /// Destination for edges.
    #[serde(default)]
    pub to: Option<DbId>,
    /// Property values.
    #[serde(default)]
    pub values: Vec<DbKeyValue>,
}

/// Result of a single query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Query-specific scalar (count of affected or returned elements).
    pub result: i64,
    /// Returned elements.
    #[serde(default)]
    pub elements: Vec<DbElement>,
}

impl QueryResult {
    /// Ids of the returned elements.
    pub fn ids(&self) -> Vec<DbId> {
        self.elements.iter().map(|e| e.id).collect()
    }
}
