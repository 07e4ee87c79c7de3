//! SQL dialects.
//!
//! A [`Dialect`] supplies the type table (atomic column type to DDL token)
//! and the structural DDL tokens used by the type resolver. A compiler is
//! built for exactly one dialect; implementing this trait is how another
//! database would be supported.

use cf_rs_core::settings::SQLITE_ENGINE;
use cf_rs_core::{CfError, CfResult};

use crate::schema::ColumnType;

/// Type table and DDL tokens for one SQL dialect.
pub trait Dialect: Send + Sync {
    /// Returns a short name for this dialect, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns the DDL data type for an atomic column type, or `None` if the
    /// dialect has no mapping for it.
    fn type_sql(&self, column_type: ColumnType) -> Option<&'static str>;

    /// Token marking a primary key column.
    fn primary_key(&self) -> &'static str {
        "PRIMARY KEY"
    }

    /// Token marking an auto-incrementing column.
    fn auto_increment(&self) -> &'static str;

    /// Token for the nullability of a column.
    fn nullability(&self, nullable: bool) -> &'static str {
        if nullable {
            "NULL"
        } else {
            "NOT NULL"
        }
    }

    /// Keyword introducing a column default.
    fn default_keyword(&self) -> &'static str {
        "DEFAULT"
    }
}

/// The SQLite dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn type_sql(&self, column_type: ColumnType) -> Option<&'static str> {
        Some(match column_type {
            ColumnType::Int => "INTEGER",
            ColumnType::String => "VARCHAR(120)",
            ColumnType::Text => "TEXT",
            ColumnType::List => "VARCHAR(255)",
            ColumnType::Bool => "TINYINT(1)",
        })
    }

    fn auto_increment(&self) -> &'static str {
        "AUTOINCREMENT"
    }
}

/// Returns the dialect for a configured engine name.
///
/// # Errors
///
/// Returns [`CfError::ConfigurationError`] for engines that have no dialect.
pub fn dialect_for_engine(engine: &str) -> CfResult<Box<dyn Dialect>> {
    match engine {
        SQLITE_ENGINE | "sqlite" | "sqlite3" => Ok(Box::new(SqliteDialect)),
        other => Err(CfError::ConfigurationError(format!(
            "No SQL dialect available for engine '{other}'"
        ))),
    }
}
