//! Fluent, type-state query builder.
//!
//! Every stage is a distinct type exposing only the calls that are legal from
//! that point, so an invalid chain does not compile. Stages take `self` by
//! value and wrap the same accumulator; `.query()` consumes the last stage and
//! yields a [`QueryType`] ready for serialization.
//!
//! ```
//! use sombra_client::query::{QueryBuilder, ast::Comparison};
//!
//! let query = QueryBuilder::select()
//!     .values(["name"])
//!     .search()
//!     .from("users")
//!     .where_()
//!     .key("age")
//!     .value(Comparison::GreaterThan(21.into()))
//!     .query();
//! assert_eq!(query.name(), "SelectValues");
//! ```

mod condition;
mod insert;
mod remove;
mod search;
mod select;

pub use insert::*;
pub use remove::*;
pub use search::*;
pub use select::*;

use super::value::DbValue;

/// Entry point of every builder chain.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Starts an insert chain.
    pub fn insert() -> Insert {
        Insert::new()
    }

    /// Starts a remove chain.
    pub fn remove() -> Remove {
        Remove
    }

    /// Starts a select chain.
    pub fn select() -> Select {
        Select
    }

    /// Starts a standalone search.
    pub fn search() -> Search {
        Search::new(StandaloneSearch)
    }
}

/// Alias list accepted by alias-related stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryAliases(pub Vec<String>);

impl From<&str> for QueryAliases {
    fn from(value: &str) -> Self {
        QueryAliases(vec![value.to_owned()])
    }
}

impl From<String> for QueryAliases {
    fn from(value: String) -> Self {
        QueryAliases(vec![value])
    }
}

impl<T: Into<String>> From<Vec<T>> for QueryAliases {
    fn from(value: Vec<T>) -> Self {
        QueryAliases(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for QueryAliases {
    fn from(value: [T; N]) -> Self {
        QueryAliases(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String> + Clone> From<&[T]> for QueryAliases {
    fn from(value: &[T]) -> Self {
        QueryAliases(value.iter().cloned().map(Into::into).collect())
    }
}

/// Property key list accepted by select/remove value stages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryKeys(pub Vec<DbValue>);

impl From<DbValue> for QueryKeys {
    fn from(value: DbValue) -> Self {
        QueryKeys(vec![value])
    }
}

impl From<&str> for QueryKeys {
    fn from(value: &str) -> Self {
        QueryKeys(vec![value.into()])
    }
}

impl From<String> for QueryKeys {
    fn from(value: String) -> Self {
        QueryKeys(vec![value.into()])
    }
}

impl<T: Into<DbValue>> From<Vec<T>> for QueryKeys {
    fn from(value: Vec<T>) -> Self {
        QueryKeys(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DbValue>, const N: usize> From<[T; N]> for QueryKeys {
    fn from(value: [T; N]) -> Self {
        QueryKeys(value.into_iter().map(Into::into).collect())
    }
}

/// Declares a stage whose only remaining call is `.query()`.
macro_rules! terminal_stage {
    ($(#[$meta:meta])* $name:ident($payload:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(pub(crate) $payload);

        impl $name {
            /// Finalizes the query document.
            pub fn query(self) -> $crate::query::payload::QueryType {
                self.0.into()
            }
        }
    };
}

pub(crate) use terminal_stage;
