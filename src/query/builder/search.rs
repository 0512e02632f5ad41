//! Search stages and the `where_` condition sub-machine.
//!
//! A search is either standalone (its `.query()` yields `QueryType::Search`)
//! or embedded in another query as deferred ids. The enclosing query is the
//! [`SearchTarget`] carried through every stage; it receives the finished
//! `SearchQuery` when the chain ends.

use crate::query::ast::{
    CountComparison, Comparison, QueryCondition, QueryConditionData, QueryConditionLogic,
    QueryConditionModifier, QueryId, QueryIds, SearchQuery, SearchQueryAlgorithm,
};
use crate::query::payload::QueryType;
use crate::query::value::{DbKeyOrder, DbValue};

use super::condition::ConditionStack;

/// Query that embeds a search as its target ids.
pub trait SearchTarget {
    /// Installs the finished search and yields the full query document.
    fn with_search(self, search: SearchQuery) -> QueryType;
}

/// Target of a search that is the query itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandaloneSearch;

impl SearchTarget for StandaloneSearch {
    fn with_search(self, search: SearchQuery) -> QueryType {
        QueryType::Search(search)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SearchState<T> {
    target: T,
    search: SearchQuery,
}

impl<T: SearchTarget> SearchState<T> {
    fn finish(self) -> QueryType {
        self.target.with_search(self.search)
    }
}

/// Root search stage: pick an algorithm, an endpoint or an index lookup.
#[derive(Clone, Debug)]
pub struct Search<T = StandaloneSearch>(SearchState<T>);

/// Algorithm chosen, endpoint pending.
#[derive(Clone, Debug)]
pub struct SearchAlgorithm<T = StandaloneSearch>(SearchState<T>);

/// Origin set.
#[derive(Clone, Debug)]
pub struct SearchFrom<T = StandaloneSearch>(SearchState<T>);

/// Destination set (or element scan selected).
#[derive(Clone, Debug)]
pub struct SearchTo<T = StandaloneSearch>(SearchState<T>);

/// Ordering set.
#[derive(Clone, Debug)]
pub struct SearchOrderBy<T = StandaloneSearch>(SearchState<T>);

/// Offset set.
#[derive(Clone, Debug)]
pub struct SearchOffset<T = StandaloneSearch>(SearchState<T>);

/// Limit set.
#[derive(Clone, Debug)]
pub struct SearchLimit<T = StandaloneSearch>(SearchState<T>);

/// Index lookup awaiting its value.
#[derive(Clone, Debug)]
pub struct SearchIndex<T = StandaloneSearch> {
    state: SearchState<T>,
    key: DbValue,
}

/// Index lookup complete.
#[derive(Clone, Debug)]
pub struct SearchIndexValue<T = StandaloneSearch>(SearchState<T>);

impl<T: SearchTarget> Search<T> {
    pub(crate) fn new(target: T) -> Self {
        Search(SearchState {
            target,
            search: SearchQuery::new(),
        })
    }

    /// Breadth-first traversal.
    pub fn breadth_first(mut self) -> SearchAlgorithm<T> {
        self.0.search.algorithm = SearchQueryAlgorithm::BreadthFirst;
        SearchAlgorithm(self.0)
    }

    /// Depth-first traversal.
    pub fn depth_first(mut self) -> SearchAlgorithm<T> {
        self.0.search.algorithm = SearchQueryAlgorithm::DepthFirst;
        SearchAlgorithm(self.0)
    }

    /// Scans all elements without a traversal origin.
    pub fn elements(mut self) -> SearchTo<T> {
        self.0.search.algorithm = SearchQueryAlgorithm::Elements;
        SearchTo(self.0)
    }

    /// Looks elements up through the index on `key`.
    pub fn index<K: Into<DbValue>>(self, key: K) -> SearchIndex<T> {
        SearchIndex {
            state: self.0,
            key: key.into(),
        }
    }

    /// Traverses from `id`.
    pub fn from<I: Into<QueryId>>(mut self, id: I) -> SearchFrom<T> {
        self.0.search.origin = id.into();
        SearchFrom(self.0)
    }

    /// Traverses backwards from `id`.
    pub fn to<I: Into<QueryId>>(mut self, id: I) -> SearchTo<T> {
        self.0.search.destination = id.into();
        SearchTo(self.0)
    }
}

impl<T: SearchTarget> SearchAlgorithm<T> {
    /// Traverses from `id`.
    pub fn from<I: Into<QueryId>>(mut self, id: I) -> SearchFrom<T> {
        self.0.search.origin = id.into();
        SearchFrom(self.0)
    }

    /// Traverses backwards from `id`.
    pub fn to<I: Into<QueryId>>(mut self, id: I) -> SearchTo<T> {
        self.0.search.destination = id.into();
        SearchTo(self.0)
    }
}

impl<T: SearchTarget> SearchIndex<T> {
    /// Matches elements whose indexed key equals `value`.
    pub fn value<V: Into<DbValue>>(self, value: V) -> SearchIndexValue<T> {
        let mut state = self.state;
        state.search.algorithm = SearchQueryAlgorithm::Index;
        state.search.conditions.push(QueryCondition {
            data: QueryConditionData::KeyValue {
                key: self.key,
                value: Comparison::Equal(value.into()),
            },
            logic: QueryConditionLogic::And,
            modifier: QueryConditionModifier::None,
        });
        SearchIndexValue(state)
    }
}

impl<T: SearchTarget> SearchIndexValue<T> {
    /// Finalizes the query document.
    pub fn query(self) -> QueryType {
        self.0.finish()
    }
}

/// Adds the shared tail of the modifier stages: `where_` and `query`.
macro_rules! search_tail {
    ($($stage:ident),*) => {
        $(
            impl<T: SearchTarget> $stage<T> {
                /// Starts the condition list.
                pub fn where_(self) -> Where<T> {
                    Where::new(self.0)
                }

                /// Finalizes the query document.
                pub fn query(self) -> QueryType {
                    self.0.finish()
                }
            }
        )*
    };
}

search_tail!(SearchFrom, SearchTo, SearchOrderBy, SearchOffset, SearchLimit);

macro_rules! search_order_by {
    ($($stage:ident),*) => {
        $(
            impl<T: SearchTarget> $stage<T> {
                /// Orders the results.
                pub fn order_by<I: IntoIterator<Item = DbKeyOrder>>(mut self, keys: I) -> SearchOrderBy<T> {
                    self.0.search.order_by = keys.into_iter().collect();
                    SearchOrderBy(self.0)
                }
            }
        )*
    };
}

search_order_by!(SearchFrom, SearchTo);

macro_rules! search_offset {
    ($($stage:ident),*) => {
        $(
            impl<T: SearchTarget> $stage<T> {
                /// Skips the first `offset` results.
                pub fn offset(mut self, offset: u64) -> SearchOffset<T> {
                    self.0.search.offset = offset;
                    SearchOffset(self.0)
                }
            }
        )*
    };
}

search_offset!(SearchFrom, SearchTo, SearchOrderBy);

macro_rules! search_limit {
    ($($stage:ident),*) => {
        $(
            impl<T: SearchTarget> $stage<T> {
                /// Caps the number of results.
                pub fn limit(mut self, limit: u64) -> SearchLimit<T> {
                    self.0.search.limit = limit;
                    SearchLimit(self.0)
                }
            }
        )*
    };
}

search_limit!(SearchFrom, SearchTo, SearchOrderBy, SearchOffset);

impl<T: SearchTarget> SearchFrom<T> {
    /// Sets the destination, turning the traversal into a path search.
    pub fn to<I: Into<QueryId>>(mut self, id: I) -> SearchTo<T> {
        self.0.search.destination = id.into();
        SearchTo(self.0)
    }
}

/// Condition stage: the next call adds a predicate, a modifier or a group.
#[derive(Clone, Debug)]
pub struct Where<T = StandaloneSearch> {
    state: SearchState<T>,
    stack: ConditionStack,
}

/// Awaiting the comparison for a `key(..)` predicate.
#[derive(Clone, Debug)]
pub struct WhereKey<T = StandaloneSearch> {
    inner: Where<T>,
    key: DbValue,
}

/// Predicate added: combine with the next one, close a group or finish.
#[derive(Clone, Debug)]
pub struct WhereLogicOperator<T = StandaloneSearch>(Where<T>);

impl<T: SearchTarget> Where<T> {
    fn new(state: SearchState<T>) -> Self {
        Self {
            state,
            stack: ConditionStack::new(),
        }
    }

    fn add(mut self, data: QueryConditionData) -> WhereLogicOperator<T> {
        self.stack.push(data);
        WhereLogicOperator(self)
    }

    fn modifier(mut self, modifier: QueryConditionModifier) -> Self {
        self.stack.set_modifier(modifier);
        self
    }

    /// Distance from the origin (origin is 0, its edges 1, their targets 2).
    pub fn distance(self, comparison: CountComparison) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::Distance(comparison))
    }

    /// Element is an edge.
    pub fn edge(self) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::Edge)
    }

    /// Total edge count of a node.
    pub fn edge_count(self, comparison: CountComparison) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::EdgeCount(comparison))
    }

    /// Outgoing edge count of a node.
    pub fn edge_count_from(self, comparison: CountComparison) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::EdgeCountFrom(comparison))
    }

    /// Incoming edge count of a node.
    pub fn edge_count_to(self, comparison: CountComparison) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::EdgeCountTo(comparison))
    }

    /// Element is one of `ids`.
    pub fn ids<I, Q>(self, ids: I) -> WhereLogicOperator<T>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QueryId>,
    {
        self.add(QueryConditionData::Ids(
            ids.into_iter().map(Into::into).collect(),
        ))
    }

    /// Starts a key/value predicate on `key`.
    pub fn key<K: Into<DbValue>>(self, key: K) -> WhereKey<T> {
        WhereKey {
            inner: self,
            key: key.into(),
        }
    }

    /// Element has every key in `keys`.
    pub fn keys<I, K>(self, keys: I) -> WhereLogicOperator<T>
    where
        I: IntoIterator<Item = K>,
        K: Into<DbValue>,
    {
        self.add(QueryConditionData::Keys(
            keys.into_iter().map(Into::into).collect(),
        ))
    }

    /// Element is a node.
    pub fn node(self) -> WhereLogicOperator<T> {
        self.add(QueryConditionData::Node)
    }

    /// Negates the next condition.
    pub fn not(self) -> Self {
        self.modifier(QueryConditionModifier::Not)
    }

    /// Continues the traversal past elements matching the next condition.
    pub fn beyond(self) -> Self {
        self.modifier(QueryConditionModifier::Beyond)
    }

    /// Stops the traversal at elements matching the next condition.
    pub fn not_beyond(self) -> Self {
        self.modifier(QueryConditionModifier::NotBeyond)
    }

    /// Opens a nested group that becomes a single condition once closed.
    pub fn where_(mut self) -> Self {
        self.stack.open_group();
        self
    }
}

impl<T: SearchTarget> WhereKey<T> {
    /// Compares the key's value.
    pub fn value(self, comparison: Comparison) -> WhereLogicOperator<T> {
        self.inner.add(QueryConditionData::KeyValue {
            key: self.key,
            value: comparison,
        })
    }
}

impl<T: SearchTarget> WhereLogicOperator<T> {
    /// Next condition must also hold.
    pub fn and(mut self) -> Where<T> {
        self.0.stack.set_logic(QueryConditionLogic::And);
        self.0
    }

    /// Next condition may hold instead.
    pub fn or(mut self) -> Where<T> {
        self.0.stack.set_logic(QueryConditionLogic::Or);
        self.0
    }

    /// Closes the innermost open group. Without an open group this does nothing.
    pub fn end_where(mut self) -> Self {
        self.0.stack.end_group();
        self
    }

    /// Closes any open groups and finalizes the query document.
    pub fn query(self) -> QueryType {
        let Where { mut state, stack } = self.0;
        state.search.conditions = stack.finish();
        state.finish()
    }

    fn into_search(self) -> SearchQuery {
        let Where { mut state, stack } = self.0;
        state.search.conditions = stack.finish();
        state.search
    }
}

macro_rules! standalone_into_search {
    ($($stage:ident),*) => {
        $(
            impl From<$stage<StandaloneSearch>> for SearchQuery {
                fn from(stage: $stage<StandaloneSearch>) -> Self {
                    stage.0.search
                }
            }

            impl From<$stage<StandaloneSearch>> for QueryIds {
                fn from(stage: $stage<StandaloneSearch>) -> Self {
                    QueryIds::Search(stage.0.search)
                }
            }
        )*
    };
}

standalone_into_search!(
    SearchFrom,
    SearchTo,
    SearchOrderBy,
    SearchOffset,
    SearchLimit,
    SearchIndexValue
);

impl From<WhereLogicOperator<StandaloneSearch>> for SearchQuery {
    fn from(stage: WhereLogicOperator<StandaloneSearch>) -> Self {
        stage.into_search()
    }
}

impl From<WhereLogicOperator<StandaloneSearch>> for QueryIds {
    fn from(stage: WhereLogicOperator<StandaloneSearch>) -> Self {
        QueryIds::Search(stage.into_search())
    }
}
