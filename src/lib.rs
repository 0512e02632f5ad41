//! Client-side query construction for the Sombra graph database server.
//!
//! Queries are built with the staged [`QueryBuilder`], which only exposes
//! the calls that are legal at each step, and end as a [`QueryType`]
//! document serialized to JSON. [`DbClient`] sends documents through a
//! caller-supplied [`client::Transport`].

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;

pub use client::DbClient;
pub use error::{ClientError, Result};
pub use query::{QueryBuilder, QueryType};
