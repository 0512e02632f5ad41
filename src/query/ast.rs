//! Wire-level building blocks shared by every query payload: ids, values,
//! comparisons, search conditions and the search query itself.
//!
//! Every type here serializes with serde's default external tagging, which
//! is byte-for-byte what the server deserializer expects.

use serde::{Deserialize, Serialize};

use super::value::{DbId, DbKeyOrder, DbKeyValue, DbValue};

/// Single element reference: a numeric id or a string alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryId {
    /// Numeric database id.
    Id(DbId),
    /// Named alias resolved by the server.
    Alias(String),
}

impl From<DbId> for QueryId {
    fn from(value: DbId) -> Self {
        QueryId::Id(value)
    }
}

impl From<i64> for QueryId {
    fn from(value: i64) -> Self {
        QueryId::Id(DbId(value))
    }
}

impl From<i32> for QueryId {
    fn from(value: i32) -> Self {
        QueryId::Id(DbId(i64::from(value)))
    }
}

impl From<&str> for QueryId {
    fn from(value: &str) -> Self {
        QueryId::Alias(value.to_owned())
    }
}

impl From<String> for QueryId {
    fn from(value: String) -> Self {
        QueryId::Alias(value)
    }
}

impl From<&String> for QueryId {
    fn from(value: &String) -> Self {
        QueryId::Alias(value.clone())
    }
}

/// Target elements of a query: an explicit list or a search the server
/// resolves into the list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum QueryIds {
    /// Explicit ordered ids.
    Ids(Vec<QueryId>),
    /// Deferred resolution through an embedded search.
    Search(SearchQuery),
}

impl Default for QueryIds {
    fn default() -> Self {
        QueryIds::Ids(Vec::new())
    }
}

impl QueryIds {
    /// Explicit ids, if this is the list form.
    pub fn as_ids(&self) -> Option<&[QueryId]> {
        match self {
            QueryIds::Ids(ids) => Some(ids),
            QueryIds::Search(_) => None,
        }
    }

    /// Embedded search, if this is the search form.
    pub fn as_search(&self) -> Option<&SearchQuery> {
        match self {
            QueryIds::Ids(_) => None,
            QueryIds::Search(search) => Some(search),
        }
    }
}

impl From<QueryId> for QueryIds {
    fn from(value: QueryId) -> Self {
        QueryIds::Ids(vec![value])
    }
}

impl From<DbId> for QueryIds {
    fn from(value: DbId) -> Self {
        QueryIds::Ids(vec![value.into()])
    }
}

impl From<i64> for QueryIds {
    fn from(value: i64) -> Self {
        QueryIds::Ids(vec![value.into()])
    }
}

impl From<i32> for QueryIds {
    fn from(value: i32) -> Self {
        QueryIds::Ids(vec![value.into()])
    }
}

impl From<&str> for QueryIds {
    fn from(value: &str) -> Self {
        QueryIds::Ids(vec![value.into()])
    }
}

impl From<String> for QueryIds {
    fn from(value: String) -> Self {
        QueryIds::Ids(vec![value.into()])
    }
}

impl<T: Into<QueryId>> From<Vec<T>> for QueryIds {
    fn from(value: Vec<T>) -> Self {
        QueryIds::Ids(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryId>, const N: usize> From<[T; N]> for QueryIds {
    fn from(value: [T; N]) -> Self {
        QueryIds::Ids(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryId> + Clone> From<&[T]> for QueryIds {
    fn from(value: &[T]) -> Self {
        QueryIds::Ids(value.iter().cloned().map(Into::into).collect())
    }
}

impl From<SearchQuery> for QueryIds {
    fn from(value: SearchQuery) -> Self {
        QueryIds::Search(value)
    }
}

/// Property values attached by insert queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryValues {
    /// One list broadcast to every target element.
    Single(Vec<DbKeyValue>),
    /// One list per target element, matched by position.
    Multi(Vec<Vec<DbKeyValue>>),
}

impl Default for QueryValues {
    fn default() -> Self {
        QueryValues::Single(Vec::new())
    }
}

impl QueryValues {
    pub(crate) fn single<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<DbKeyValue>,
    {
        QueryValues::Single(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn multi<I, R, T>(values: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: Into<DbKeyValue>,
    {
        QueryValues::Multi(
            values
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Comparison of a property value against a literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// `==`
    Equal(DbValue),
    /// `>`
    GreaterThan(DbValue),
    /// `>=`
    GreaterThanOrEqual(DbValue),
    /// `<`
    LessThan(DbValue),
    /// `<=`
    LessThanOrEqual(DbValue),
    /// `!=`
    NotEqual(DbValue),
    /// Substring or element containment.
    Contains(DbValue),
    /// String prefix.
    StartsWith(DbValue),
    /// String suffix.
    EndsWith(DbValue),
}

/// Comparison of a count (distance, edge count) against a number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountComparison {
    /// `==`
    Equal(u64),
    /// `>`
    GreaterThan(u64),
    /// `>=`
    GreaterThanOrEqual(u64),
    /// `<`
    LessThan(u64),
    /// `<=`
    LessThanOrEqual(u64),
    /// `!=`
    NotEqual(u64),
}

/// How a condition combines with the previous one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryConditionLogic {
    #[default]
    #[allow(missing_docs)]
    And,
    #[allow(missing_docs)]
    Or,
}

/// Modifier applied to a single condition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryConditionModifier {
    /// Condition applies as written.
    #[default]
    None,
    /// Condition is negated.
    Not,
    /// Traversal continues past elements matching the condition.
    Beyond,
    /// Traversal stops at elements matching the condition.
    NotBeyond,
}

/// Predicate payload of a search condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryConditionData {
    /// Distance from the search origin.
    Distance(CountComparison),
    /// Element is an edge.
    Edge,
    /// Total edge count of a node.
    EdgeCount(CountComparison),
    /// Outgoing edge count of a node.
    EdgeCountFrom(CountComparison),
    /// Incoming edge count of a node.
    EdgeCountTo(CountComparison),
    /// Element is one of the ids.
    Ids(Vec<QueryId>),
    /// Element has `key` whose value satisfies the comparison.
    KeyValue {
        /// Property key.
        key: DbValue,
        /// Comparison applied to the value.
        value: Comparison,
    },
    /// Element has all of the keys.
    Keys(Vec<DbValue>),
    /// Element is a node.
    Node,
    /// Nested group evaluated as a single condition.
    Where(Vec<QueryCondition>),
}

/// One entry of a search condition list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// Predicate payload.
    pub data: QueryConditionData,
    /// Combination with the previous condition.
    pub logic: QueryConditionLogic,
    /// Modifier of this condition.
    pub modifier: QueryConditionModifier,
}

/// Graph traversal strategy requested from the server.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchQueryAlgorithm {
    #[default]
    #[allow(missing_docs)]
    BreadthFirst,
    #[allow(missing_docs)]
    DepthFirst,
    /// Index lookup by key/value equality.
    Index,
    /// Scan of all elements without traversal.
    Elements,
}

/// Graph search. Used standalone or embedded as deferred ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Traversal strategy.
    pub algorithm: SearchQueryAlgorithm,
    /// Start of the traversal; `Id(0)` when unset.
    pub origin: QueryId,
    /// End of the traversal; `Id(0)` when unset.
    pub destination: QueryId,
    /// Maximum number of results, `0` meaning unlimited.
    pub limit: u64,
    /// Number of leading results skipped.
    pub offset: u64,
    /// Result ordering.
    pub order_by: Vec<DbKeyOrder>,
    /// Flat top-level condition list; nesting goes through `Where`.
    pub conditions: Vec<QueryCondition>,
}

impl SearchQuery {
    /// Empty breadth-first search with unset endpoints.
    pub fn new() -> Self {
        Self {
            algorithm: SearchQueryAlgorithm::BreadthFirst,
            origin: QueryId::Id(DbId(0)),
            destination: QueryId::Id(DbId(0)),
            limit: 0,
            offset: 0,
            order_by: Vec::new(),
            conditions: Vec::new(),
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_ids_from_plain_lists() {
        assert_eq!(
            QueryIds::from([1, 2]),
            QueryIds::Ids(vec![QueryId::Id(DbId(1)), QueryId::Id(DbId(2))])
        );
        assert_eq!(
            QueryIds::from(vec!["users"]),
            QueryIds::Ids(vec![QueryId::Alias("users".into())])
        );
    }

    #[test]
    fn unit_condition_serializes_as_tag() {
        let condition = QueryCondition {
            data: QueryConditionData::Edge,
            logic: QueryConditionLogic::Or,
            modifier: QueryConditionModifier::NotBeyond,
        };
        assert_eq!(
            serde_json::to_value(condition).unwrap(),
            json!({"data": "Edge", "logic": "Or", "modifier": "NotBeyond"})
        );
    }

    #[test]
    fn empty_search_shape() {
        assert_eq!(
            serde_json::to_value(SearchQuery::new()).unwrap(),
            json!({
                "algorithm": "BreadthFirst",
                "origin": {"Id": 0},
                "destination": {"Id": 0},
                "limit": 0,
                "offset": 0,
                "order_by": [],
                "conditions": []
            })
        );
    }
}
