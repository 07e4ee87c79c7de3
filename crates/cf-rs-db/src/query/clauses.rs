//! ORDER BY, LIMIT and GROUP BY rendering.
//!
//! These clauses are built from structural input only. Nothing here produces
//! a bound value, and column names and directions are emitted verbatim, so
//! they must never carry untrusted text.

use std::fmt;
use std::str::FromStr;

use cf_rs_core::CfError;

/// A sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `ASC`
    #[default]
    Asc,
    /// `DESC`
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Direction {
    type Err = CfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(CfError::MalformedQuery(format!(
                "unknown sort direction '{s}'"
            ))),
        }
    }
}

/// One `column DIRECTION` entry of an ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The column or expression to sort by.
    pub column: String,
    /// The sort direction.
    pub direction: Direction,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// A LIMIT clause: a row count, or an offset and a row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `LIMIT count`
    Count(u64),
    /// `LIMIT offset, count`
    Range {
        /// Rows to skip.
        offset: u64,
        /// Rows to return.
        count: u64,
    },
}

/// Renders ORDER BY entries as `col DIR, col DIR`, in the given order.
pub fn order_by_sql(order_by: &[OrderBy]) -> String {
    order_by
        .iter()
        .map(|o| format!("{} {}", o.column, o.direction))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a limit as `count` or `offset, count`.
pub fn limit_sql(limit: &Limit) -> String {
    match limit {
        Limit::Count(count) => count.to_string(),
        Limit::Range { offset, count } => format!("{offset}, {count}"),
    }
}

/// Renders a GROUP BY column.
pub fn group_by_sql(column: &str) -> String {
    column.to_string()
}
