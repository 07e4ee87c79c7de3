//! Query description and compilation.
//!
//! - [`predicate`] - Predicate trees and WHERE compilation
//! - [`clauses`] - ORDER BY, LIMIT and GROUP BY rendering
//! - [`compiler`] - The query descriptor and the SQL compiler

pub mod clauses;
pub mod compiler;
pub mod predicate;

pub use clauses::{Direction, Limit, OrderBy};
pub use compiler::{ColumnDef, Columns, Join, JoinKind, Operation, Query, SqlCompiler, SqlFragment};
pub use predicate::{compile_predicate, Connective, Operand, Operator, Predicate};
