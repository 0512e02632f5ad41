//! Stack of condition lists backing the `where_` sub-machine.

use tracing::debug;

use crate::query::ast::{
    QueryCondition, QueryConditionData, QueryConditionLogic, QueryConditionModifier,
};

/// Open condition groups, innermost last. Never empty.
#[derive(Clone, Debug)]
pub(crate) struct ConditionStack {
    lists: Vec<Vec<QueryCondition>>,
    logic: QueryConditionLogic,
    modifier: QueryConditionModifier,
}

impl ConditionStack {
    pub(crate) fn new() -> Self {
        Self {
            lists: vec![Vec::new()],
            logic: QueryConditionLogic::And,
            modifier: QueryConditionModifier::None,
        }
    }

    pub(crate) fn set_logic(&mut self, logic: QueryConditionLogic) {
        self.logic = logic;
    }

    pub(crate) fn set_modifier(&mut self, modifier: QueryConditionModifier) {
        self.modifier = modifier;
    }

    /// Appends a condition to the innermost group, consuming the pending logic and modifier.
    pub(crate) fn push(&mut self, data: QueryConditionData) {
        let condition = QueryCondition {
            data,
            logic: std::mem::take(&mut self.logic),
            modifier: std::mem::take(&mut self.modifier),
        };
        match self.lists.last_mut() {
            Some(top) => top.push(condition),
            None => self.lists.push(vec![condition]),
        }
    }

    /// Adds a `Where` marker to the innermost group and opens a fresh group after it.
    pub(crate) fn open_group(&mut self) {
        self.push(QueryConditionData::Where(Vec::new()));
        self.lists.push(Vec::new());
    }

    /// Closes the innermost group into the last `Where` of its parent.
    /// Returns false when no group is open.
    pub(crate) fn collapse(&mut self) -> bool {
        if self.lists.len() < 2 {
            return false;
        }
        let Some(group) = self.lists.pop() else {
            return false;
        };
        let Some(parent) = self.lists.last_mut() else {
            return false;
        };
        let target = parent
            .iter()
            .rposition(|condition| matches!(condition.data, QueryConditionData::Where(_)));
        if let Some(index) = target {
            if let QueryConditionData::Where(nested) = &mut parent[index].data {
                nested.extend(group);
                return true;
            }
        }
        parent.extend(group);
        true
    }

    /// Closes a group for an explicit `end_where`; unmatched calls are no-ops.
    pub(crate) fn end_group(&mut self) {
        if !self.collapse() {
            debug!("search.where.unmatched_end");
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.lists.len()
    }

    /// Collapses every open group and returns the top-level list.
    pub(crate) fn finish(mut self) -> Vec<QueryCondition> {
        while self.collapse() {}
        self.lists.pop().unwrap_or_default()
    }
}
