//! Query descriptors and the SQL compiler.
//!
//! A [`Query`] describes one statement: its [`Operation`], the table, the
//! columns or column definitions, the values to write, an optional
//! [`Predicate`] and the trailing ORDER BY / LIMIT / GROUP BY clauses. The
//! [`SqlCompiler`] turns it into a [`SqlFragment`]: SQL text with `?`
//! placeholders plus the values to bind to them, in placeholder order.
//!
//! # Examples
//!
//! ```
//! use cf_rs_db::query::compiler::{Query, SqlCompiler};
//! use cf_rs_db::query::predicate::Predicate;
//!
//! let compiler = SqlCompiler::sqlite();
//! let fragment = compiler
//!     .compile(&Query::select("users").filter(Predicate::eq("id", 7)))
//!     .unwrap();
//! assert_eq!(fragment.sql, "SELECT * FROM users WHERE id = ?");
//! ```

use std::fmt;
use std::str::FromStr;

use cf_rs_core::logging::compile_span;
use cf_rs_core::{CfError, CfResult, DatabaseSettings};

use super::clauses::{group_by_sql, limit_sql, order_by_sql, Limit, OrderBy};
use super::predicate::{compile_predicate, Predicate};
use crate::dialect::{dialect_for_engine, Dialect, SqliteDialect};
use crate::schema::{ColumnDescriptor, EntitySchema, SchemaLookup, TypeResolver};
use crate::value::{FieldValue, Value};

/// The kind of statement a [`Query`] compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `SELECT`
    Select,
    /// `INSERT`
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
    /// `SELECT COUNT(*)`, or a select over explicit count columns.
    Count,
    /// `CREATE TABLE`
    CreateTable,
    /// `DROP TABLE IF EXISTS`
    DropTable,
}

impl Operation {
    /// Returns the canonical tag of this operation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Count => "count",
            Self::CreateTable => "create_table",
            Self::DropTable => "drop_table",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CfError;

    /// Parses an operation tag. Case, `-` and `_` are ignored, so
    /// `create_table`, `create-table` and `CreateTable` are the same tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "select" => Ok(Self::Select),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "count" => Ok(Self::Count),
            "createtable" => Ok(Self::CreateTable),
            "droptable" => Ok(Self::DropTable),
            _ => Err(CfError::UnsupportedOperation(s.to_string())),
        }
    }
}

/// One entry of a `CREATE TABLE` column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// The column name, or `None` for a bare fragment such as a table
    /// constraint.
    pub name: Option<String>,
    /// The type DDL, or the whole fragment when `name` is `None`.
    pub definition: String,
}

impl ColumnDef {
    /// A named column: `name definition`.
    pub fn named(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            definition: definition.into(),
        }
    }

    /// A bare fragment, e.g. `PRIMARY KEY (a, b)`.
    pub fn raw(definition: impl Into<String>) -> Self {
        Self {
            name: None,
            definition: definition.into(),
        }
    }

    fn to_sql(&self) -> String {
        match self.name {
            Some(ref name) => format!("{name} {}", self.definition),
            None => self.definition.clone(),
        }
    }
}

/// The column part of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// Every column: `*`, or `COUNT(*)` for a count.
    #[default]
    All,
    /// Output expressions joined with `, `.
    List(Vec<String>),
    /// A column list emitted verbatim.
    Raw(String),
    /// Column definitions for `CREATE TABLE`.
    Definitions(Vec<ColumnDef>),
}

/// SQL join kinds. Only left joins are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `LEFT JOIN`
    Left,
}

impl JoinKind {
    /// Returns the SQL keyword for this join.
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::Left => "LEFT JOIN",
        }
    }
}

impl FromStr for JoinKind {
    type Err = CfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("left") {
            Ok(Self::Left)
        } else {
            Err(CfError::UnsupportedOperation(format!("{s} join")))
        }
    }
}

/// A join against another table, whose name receives the query's prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// The join kind.
    pub kind: JoinKind,
    /// The joined table, without prefix.
    pub table: String,
    /// The `ON` condition, emitted verbatim.
    pub on: String,
}

/// A complete description of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The statement kind.
    pub operation: Operation,
    /// Prepended to the table name and to joined table names.
    pub table_prefix: String,
    /// The table name, without prefix.
    pub table: String,
    /// Output columns (select/count) or column definitions (create-table).
    pub columns: Columns,
    /// Column assignments for insert and update, in emission order.
    pub field_values: Vec<(String, FieldValue)>,
    /// The WHERE condition.
    pub predicate: Option<Predicate>,
    /// ORDER BY entries, in precedence order.
    pub order_by: Vec<OrderBy>,
    /// The LIMIT clause.
    pub limit: Option<Limit>,
    /// The GROUP BY column.
    pub group_by: Option<String>,
    /// Joins, for select and count.
    pub joins: Vec<Join>,
    /// Directive appended after a `CREATE TABLE` column list.
    pub table_options: Option<String>,
}

impl Query {
    /// Creates an empty query of the given kind.
    pub fn new(operation: Operation, table: impl Into<String>) -> Self {
        Self {
            operation,
            table_prefix: String::new(),
            table: table.into(),
            columns: Columns::All,
            field_values: Vec::new(),
            predicate: None,
            order_by: Vec::new(),
            limit: None,
            group_by: None,
            joins: Vec::new(),
            table_options: None,
        }
    }

    /// `SELECT * FROM table`.
    pub fn select(table: impl Into<String>) -> Self {
        Self::new(Operation::Select, table)
    }

    /// `INSERT INTO table`.
    pub fn insert(table: impl Into<String>) -> Self {
        Self::new(Operation::Insert, table)
    }

    /// `UPDATE table`.
    pub fn update(table: impl Into<String>) -> Self {
        Self::new(Operation::Update, table)
    }

    /// `DELETE FROM table`.
    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(Operation::Delete, table)
    }

    /// `SELECT COUNT(*) FROM table`.
    pub fn count(table: impl Into<String>) -> Self {
        Self::new(Operation::Count, table)
    }

    /// `CREATE TABLE table`.
    pub fn create_table(table: impl Into<String>) -> Self {
        Self::new(Operation::CreateTable, table)
    }

    /// `DROP TABLE IF EXISTS table`.
    pub fn drop_table(table: impl Into<String>) -> Self {
        Self::new(Operation::DropTable, table)
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Applies a database configuration: its table prefix and, for
    /// create-table queries without their own, its table options.
    #[must_use]
    pub fn with_settings(mut self, settings: &DatabaseSettings) -> Self {
        self.table_prefix.clone_from(&settings.table_prefix);
        if self.operation == Operation::CreateTable && self.table_options.is_none() {
            self.table_options.clone_from(&settings.table_options);
        }
        self
    }

    /// Selects the given output expressions.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Columns::List(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Selects a column list emitted verbatim.
    #[must_use]
    pub fn raw_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Columns::Raw(columns.into());
        self
    }

    /// Sets the create-table column definitions.
    #[must_use]
    pub fn definitions(mut self, definitions: Vec<ColumnDef>) -> Self {
        self.columns = Columns::Definitions(definitions);
        self
    }

    /// Appends one create-table column definition.
    #[must_use]
    pub fn define(mut self, definition: ColumnDef) -> Self {
        match self.columns {
            Columns::Definitions(ref mut defs) => defs.push(definition),
            _ => self.columns = Columns::Definitions(vec![definition]),
        }
        self
    }

    /// Assigns a value (or raw fragment) to a column for insert or update.
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.field_values.push((column.into(), value.into()));
        self
    }

    /// Adds a WHERE condition, `AND`-ed with any existing one.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing & predicate,
            None => predicate,
        });
        self
    }

    /// Appends an ORDER BY entry.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Sets `LIMIT count`.
    #[must_use]
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(Limit::Count(count));
        self
    }

    /// Sets `LIMIT offset, count`.
    #[must_use]
    pub fn limit_range(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(Limit::Range { offset, count });
        self
    }

    /// Sets the GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    /// Appends a `LEFT JOIN table ON condition`.
    #[must_use]
    pub fn left_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Left,
            table: table.into(),
            on: on.into(),
        });
        self
    }

    /// Sets the directive appended after a `CREATE TABLE` column list.
    #[must_use]
    pub fn table_options(mut self, options: impl Into<String>) -> Self {
        self.table_options = Some(options.into());
        self
    }

    /// Returns the prefixed table name.
    pub fn table_name(&self) -> String {
        format!("{}{}", self.table_prefix, self.table)
    }
}

/// SQL text and the values bound to its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    /// SQL with `?` placeholders.
    pub sql: String,
    /// One value per placeholder, left to right.
    pub values: Vec<Value>,
}

impl SqlFragment {
    /// Returns `true` if the fragment has no SQL.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Counts the `?` characters in the SQL.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Compiles [`Query`] descriptors for one SQL dialect.
///
/// The compiler holds no state beyond its dialect, so one instance can be
/// shared between threads.
pub struct SqlCompiler {
    dialect: Box<dyn Dialect>,
}

impl fmt::Debug for SqlCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlCompiler")
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

impl SqlCompiler {
    /// Creates a compiler for a dialect.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self {
            dialect: Box::new(dialect),
        }
    }

    /// Creates a compiler for SQLite.
    pub fn sqlite() -> Self {
        Self::new(SqliteDialect)
    }

    /// Creates a compiler for the engine named in a database configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::ConfigurationError`] if the engine has no dialect.
    pub fn from_settings(settings: &DatabaseSettings) -> CfResult<Self> {
        Ok(Self {
            dialect: dialect_for_engine(&settings.engine)?,
        })
    }

    /// Returns the dialect this compiler targets.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Compiles a query into SQL and its bound values.
    ///
    /// The statement for the operation comes first, followed by WHERE,
    /// ORDER BY, LIMIT and GROUP BY when present, in that order. Values are
    /// concatenated in the same order.
    ///
    /// # Errors
    ///
    /// - [`CfError::MalformedQuery`] if the query does not fit its operation
    ///   (insert or update without values, create-table without column
    ///   definitions, column definitions given to a select).
    /// - [`CfError::MalformedPredicate`] if the predicate cannot be compiled.
    pub fn compile(&self, query: &Query) -> CfResult<SqlFragment> {
        let _span = compile_span(query.operation.as_str(), &query.table).entered();

        let mut fragment = match query.operation {
            Operation::Select => Self::compile_select(query, "*")?,
            Operation::Count => Self::compile_select(query, "COUNT(*)")?,
            Operation::Insert => Self::compile_insert(query)?,
            Operation::Update => Self::compile_update(query)?,
            Operation::Delete => SqlFragment {
                sql: format!("DELETE FROM {}", query.table_name()),
                values: Vec::new(),
            },
            Operation::CreateTable => Self::compile_create_table(query)?,
            Operation::DropTable => SqlFragment {
                sql: format!("DROP TABLE IF EXISTS {}", query.table_name()),
                values: Vec::new(),
            },
        };

        if let Some(ref predicate) = query.predicate {
            let condition = compile_predicate(predicate)?;
            if !condition.is_empty() {
                fragment.sql.push_str(" WHERE ");
                fragment.sql.push_str(&condition.sql);
                fragment.values.extend(condition.values);
            }
        }

        if !query.order_by.is_empty() {
            fragment.sql.push_str(" ORDER BY ");
            fragment.sql.push_str(&order_by_sql(&query.order_by));
        }

        if let Some(ref limit) = query.limit {
            fragment.sql.push_str(" LIMIT ");
            fragment.sql.push_str(&limit_sql(limit));
        }

        if let Some(ref column) = query.group_by {
            fragment.sql.push_str(" GROUP BY ");
            fragment.sql.push_str(&group_by_sql(column));
        }

        tracing::debug!(
            operation = %query.operation,
            table = %query.table_name(),
            values = fragment.values.len(),
            "compiled query"
        );
        Ok(fragment)
    }

    /// Resolves a column descriptor into this dialect's DDL fragment.
    ///
    /// # Errors
    ///
    /// See [`TypeResolver::resolve`].
    pub fn resolve_type(
        &self,
        descriptor: &ColumnDescriptor,
        schemas: &dyn SchemaLookup,
    ) -> CfResult<String> {
        TypeResolver::new(self.dialect.as_ref(), schemas).resolve(descriptor)
    }

    /// Resolves every column of a schema into create-table definitions, in
    /// schema order.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn table_definitions(
        &self,
        schema: &EntitySchema,
        schemas: &dyn SchemaLookup,
    ) -> CfResult<Vec<ColumnDef>> {
        let resolver = TypeResolver::new(self.dialect.as_ref(), schemas);
        schema
            .columns
            .iter()
            .map(|(name, descriptor)| Ok(ColumnDef::named(name, resolver.resolve(descriptor)?)))
            .collect()
    }

    fn compile_select(query: &Query, all_columns: &str) -> CfResult<SqlFragment> {
        let columns = match query.columns {
            Columns::All => all_columns.to_string(),
            Columns::List(ref columns) if columns.is_empty() => all_columns.to_string(),
            Columns::List(ref columns) => columns.join(", "),
            Columns::Raw(ref columns) => columns.clone(),
            Columns::Definitions(_) => {
                return Err(CfError::MalformedQuery(format!(
                    "{} on '{}' cannot take column definitions",
                    query.operation, query.table
                )))
            }
        };

        let mut sql = format!("SELECT {columns} FROM {}", query.table_name());
        for join in &query.joins {
            sql.push_str(&format!(
                " {} {}{} ON {}",
                join.kind.sql_keyword(),
                query.table_prefix,
                join.table,
                join.on
            ));
        }

        Ok(SqlFragment {
            sql,
            values: Vec::new(),
        })
    }

    fn compile_insert(query: &Query) -> CfResult<SqlFragment> {
        Self::require_values(query)?;

        let mut values = Vec::new();
        let columns: Vec<&str> = query
            .field_values
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        let slots: Vec<String> = query
            .field_values
            .iter()
            .map(|(_, value)| match value {
                FieldValue::Bound(v) => {
                    values.push(v.clone());
                    "?".to_string()
                }
                FieldValue::Raw(raw) => raw.clone(),
            })
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            query.table_name(),
            columns.join(", "),
            slots.join(", ")
        );
        Ok(SqlFragment { sql, values })
    }

    fn compile_update(query: &Query) -> CfResult<SqlFragment> {
        Self::require_values(query)?;

        let mut values = Vec::new();
        let assignments: Vec<String> = query
            .field_values
            .iter()
            .map(|(name, value)| match value {
                FieldValue::Bound(v) => {
                    values.push(v.clone());
                    format!("{name} = ?")
                }
                FieldValue::Raw(raw) => format!("{name} = {raw}"),
            })
            .collect();

        let sql = format!(
            "UPDATE {} SET {}",
            query.table_name(),
            assignments.join(", ")
        );
        Ok(SqlFragment { sql, values })
    }

    fn compile_create_table(query: &Query) -> CfResult<SqlFragment> {
        let definitions = match query.columns {
            Columns::Definitions(ref defs) if !defs.is_empty() => defs,
            _ => {
                return Err(CfError::MalformedQuery(format!(
                    "create_table on '{}' needs column definitions",
                    query.table
                )))
            }
        };

        let mut sql = format!(
            "CREATE TABLE {} ({})",
            query.table_name(),
            definitions
                .iter()
                .map(ColumnDef::to_sql)
                .collect::<Vec<_>>()
                .join(", ")
        );
        if let Some(options) = query
            .table_options
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
        {
            sql.push(' ');
            sql.push_str(options);
        }

        Ok(SqlFragment {
            sql,
            values: Vec::new(),
        })
    }

    fn require_values(query: &Query) -> CfResult<()> {
        if query.field_values.is_empty() {
            return Err(CfError::MalformedQuery(format!(
                "{} on '{}' has no field values",
                query.operation, query.table
            )));
        }
        Ok(())
    }
}
