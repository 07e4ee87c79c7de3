//! # cf-rs-db
//!
//! A dialect-specific SQL compiler. A [`Query`](query::Query) describes one
//! statement (select, insert, update, delete, count, create-table or
//! drop-table) and the [`SqlCompiler`](query::SqlCompiler) turns it into SQL
//! text with `?` placeholders plus the [`Value`](value::Value)s to bind, in
//! placeholder order. Values are never interpolated into the SQL.
//!
//! ## Module Overview
//!
//! - [`value`] - Bound [`Value`](value::Value)s and insert/update [`FieldValue`](value::FieldValue)s
//! - [`dialect`] - The [`Dialect`](dialect::Dialect) trait and the SQLite dialect
//! - [`schema`] - Column type descriptors, entity schemas and the type resolver
//! - [`query`] - Predicates, clauses, query descriptors and compilation
//!
//! ## Example
//!
//! ```
//! use cf_rs_db::query::{Predicate, Query, SqlCompiler};
//!
//! let compiler = SqlCompiler::sqlite();
//! let fragment = compiler
//!     .compile(&Query::insert("users").value("name", "a").value("age", 5))
//!     .unwrap();
//! assert_eq!(fragment.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
//! assert_eq!(fragment.values.len(), 2);
//!
//! let fragment = compiler
//!     .compile(&Query::select("users").filter(Predicate::eq("id", 7)))
//!     .unwrap();
//! assert_eq!(fragment.sql, "SELECT * FROM users WHERE id = ?");
//! ```

// format_push_string: format! with push_str reads closer to the emitted SQL
// doc_markdown: SQL keywords in docs are not code items
#![allow(clippy::format_push_string)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

pub mod dialect;
pub mod query;
pub mod schema;
pub mod value;

pub use dialect::{Dialect, SqliteDialect};
pub use query::{Predicate, Query, SqlCompiler, SqlFragment};
pub use schema::{ColumnDescriptor, ColumnType, EntitySchema, SchemaLookup, SchemaRegistry};
pub use value::{FieldValue, Value};
