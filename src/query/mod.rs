#![forbid(unsafe_code)]

//! Typed construction of query documents.
//!
//! Queries are assembled through the staged [`QueryBuilder`] and end as a
//! [`QueryType`], the externally tagged JSON document the server executes.

/// Ids, property values, comparisons, conditions and the search query.
///
/// These are the shared building blocks embedded in every payload.
pub mod ast;

/// Type-state builder for every query family.
pub mod builder;

/// Coercion of native JSON values into tagged database values.
pub mod coerce;

pub(crate) mod finite;

/// Terminal query payloads, the `QueryType` union and server results.
pub mod payload;

/// Tagged database values.
pub mod value;

pub use builder::QueryBuilder;
pub use coerce::{Coercer, IntegerPolicy};
pub use payload::{QueryResult, QueryType};
pub use value::{DbId, DbKeyValue, DbValue};
