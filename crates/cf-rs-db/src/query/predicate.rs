//! Predicate trees and their compilation into WHERE expressions.
//!
//! A [`Predicate`] is either a single column comparison or a group of
//! predicates joined by `AND`/`OR`. Every condition carries its operator
//! explicitly, so the same column may appear any number of times in a tree.
//!
//! Compilation walks the tree left to right and pushes each bound value as
//! its placeholder is written, which keeps the `?` markers and the value list
//! in lock-step across nested groups.
//!
//! # Examples
//!
//! ```
//! use cf_rs_db::query::predicate::{compile_predicate, Predicate};
//!
//! let tree = Predicate::and([
//!     Predicate::eq("x", 1),
//!     Predicate::or([Predicate::eq("y", 2), Predicate::eq("z", 3)]),
//! ]);
//! let fragment = compile_predicate(&tree).unwrap();
//! assert_eq!(fragment.sql, "x = ? AND (y = ? OR z = ?)");
//! assert_eq!(fragment.values.len(), 3);
//! ```

use std::fmt;
use std::ops;
use std::str::FromStr;

use cf_rs_core::{CfError, CfResult};

use super::compiler::SqlFragment;
use crate::value::Value;

/// How the children of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
}

impl Connective {
    /// Returns the SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Recognizes a connective tag in a legacy predicate map. Tags are
    /// upper case, exactly as they appear in the SQL.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<>`
    NotEqual,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `GLOB`
    Glob,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
}

impl Operator {
    /// Returns the operator as it appears in SQL.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::NotEqual => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Glob => "GLOB",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        }
    }

    /// Returns `true` for operators whose right-hand side is a
    /// parenthesized list.
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// The operator used when a list operand deduplicates down to a single
    /// value: `IN` becomes `=`, `NOT IN` becomes `!=`.
    const fn singular(self) -> Self {
        match self {
            Self::In => Self::Eq,
            Self::NotIn => Self::Ne,
            other => other,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = CfError;

    /// Parses an operator case-insensitively; runs of whitespace inside
    /// two-word operators are treated as one space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "=" | "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<>" => Ok(Self::NotEqual),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "LIKE" => Ok(Self::Like),
            "NOT LIKE" => Ok(Self::NotLike),
            "GLOB" => Ok(Self::Glob),
            "IN" => Ok(Self::In),
            "NOT IN" => Ok(Self::NotIn),
            "IS" => Ok(Self::Is),
            "IS NOT" => Ok(Self::IsNot),
            _ => Err(CfError::MalformedPredicate(format!("unknown operator '{s}'"))),
        }
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value.
    Scalar(Value),
    /// A list of values; duplicates are removed at compile time.
    List(Vec<Value>),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

macro_rules! scalar_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Self::Scalar(Value::from(v))
                }
            }
        )*
    };
}

scalar_operand!(
    bool,
    i32,
    i64,
    u32,
    f64,
    String,
    &str,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
    uuid::Uuid,
);

/// A node of a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column operator operand`. With no operator, `=` is used for scalars
    /// and `IN` for lists.
    Condition {
        /// The column the condition applies to, emitted verbatim.
        column: String,
        /// The comparison operator, or `None` to infer it from the operand.
        operator: Option<Operator>,
        /// The value or values compared against.
        operand: Operand,
    },
    /// Children joined by a connective. Nested groups are parenthesized.
    Group {
        /// `AND` or `OR`.
        connective: Connective,
        /// The grouped predicates, in order.
        children: Vec<Predicate>,
    },
}

impl Predicate {
    /// `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Condition {
            column: column.into(),
            operator: None,
            operand: Operand::Scalar(value.into()),
        }
    }

    /// `column <op> value`.
    pub fn compare(
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<Operand>,
    ) -> Self {
        Self::Condition {
            column: column.into(),
            operator: Some(operator),
            operand: value.into(),
        }
    }

    /// `column IN (values...)`, with the inferred list operator.
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Condition {
            column: column.into(),
            operator: None,
            operand: Operand::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Joins predicates with `AND`.
    pub fn and(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Group {
            connective: Connective::And,
            children: children.into_iter().collect(),
        }
    }

    /// Joins predicates with `OR`.
    pub fn or(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Group {
            connective: Connective::Or,
            children: children.into_iter().collect(),
        }
    }

    /// Returns `true` if the predicate contains no condition at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Condition { .. } => false,
            Self::Group { children, .. } => children.iter().all(Self::is_empty),
        }
    }

    /// Builds a condition from a compound key such as `"age"`, `"age >="`
    /// or `"name LIKE#2"`.
    ///
    /// Anything from the first `#` on is discarded; it only exists to keep
    /// keys unique in map-shaped trees. The rest is split on the first
    /// whitespace into the column and an optional operator.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::MalformedPredicate`] if the column is empty, is a
    /// connective tag, or the operator is unknown.
    pub fn from_key(key: &str, operand: impl Into<Operand>) -> CfResult<Self> {
        let key = strip_suffix(key).trim();
        let (column, operator) = match key.split_once(char::is_whitespace) {
            Some((column, operator)) => (column, Some(operator.parse::<Operator>()?)),
            None => (key, None),
        };

        if column.is_empty() {
            return Err(CfError::MalformedPredicate(format!(
                "predicate key '{key}' names no column"
            )));
        }
        if Connective::from_tag(column).is_some() {
            return Err(CfError::MalformedPredicate(format!(
                "'{column}' is a connective, not a column"
            )));
        }

        Ok(Self::Condition {
            column: column.to_string(),
            operator,
            operand: operand.into(),
        })
    }

    /// Loads a map-shaped predicate tree:
    ///
    /// ```json
    /// {"name": "a", "age >=": 18, "id": [1, 2], "OR": {"x": 1, "x#2": 2}}
    /// ```
    ///
    /// Entries become `AND`-ed children in document order. An `AND`/`OR`
    /// key holds a nested tree. A document whose only entry is a connective
    /// group is that group.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::MalformedPredicate`] when the document or a
    /// connective value is not an object, a value is a nested list or an
    /// object, or a key cannot be parsed.
    pub fn from_json(json: &serde_json::Value) -> CfResult<Self> {
        let object = json.as_object().ok_or_else(|| {
            CfError::MalformedPredicate(format!("predicate tree must be an object, got {json}"))
        })?;

        let mut children = children_from_json(object)?;
        if children.len() == 1 && matches!(children[0], Self::Group { .. }) {
            return Ok(children.remove(0));
        }
        Ok(Self::and(children))
    }
}

impl ops::BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (
                Self::Group {
                    connective: Connective::And,
                    children: mut left,
                },
                Self::Group {
                    connective: Connective::And,
                    children: right,
                },
            ) => {
                left.extend(right);
                Self::and(left)
            }
            (
                Self::Group {
                    connective: Connective::And,
                    children: mut left,
                },
                other,
            ) => {
                left.push(other);
                Self::and(left)
            }
            (left, right) => Self::and([left, right]),
        }
    }
}

impl ops::BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (
                Self::Group {
                    connective: Connective::Or,
                    children: mut left,
                },
                Self::Group {
                    connective: Connective::Or,
                    children: right,
                },
            ) => {
                left.extend(right);
                Self::or(left)
            }
            (
                Self::Group {
                    connective: Connective::Or,
                    children: mut left,
                },
                other,
            ) => {
                left.push(other);
                Self::or(left)
            }
            (left, right) => Self::or([left, right]),
        }
    }
}

/// Compiles a predicate tree into a boolean SQL expression and its values.
///
/// The root is never parenthesized; nested groups are. Groups without any
/// condition are skipped, so an empty tree yields an empty fragment.
///
/// # Errors
///
/// Returns [`CfError::MalformedPredicate`] for an empty column, an empty
/// value list, or a list given to an operator that compares one value.
pub fn compile_predicate(predicate: &Predicate) -> CfResult<SqlFragment> {
    let mut sql = String::new();
    let mut values = Vec::new();
    compile_node(predicate, &mut sql, &mut values)?;
    Ok(SqlFragment { sql, values })
}

fn compile_node(node: &Predicate, sql: &mut String, values: &mut Vec<Value>) -> CfResult<()> {
    match node {
        Predicate::Condition {
            column,
            operator,
            operand,
        } => compile_condition(column, *operator, operand, sql, values),
        Predicate::Group {
            connective,
            children,
        } => {
            let mut first = true;
            for child in children.iter().filter(|child| !child.is_empty()) {
                if !first {
                    sql.push(' ');
                    sql.push_str(connective.as_sql());
                    sql.push(' ');
                }
                first = false;

                if matches!(child, Predicate::Group { .. }) {
                    sql.push('(');
                    compile_node(child, sql, values)?;
                    sql.push(')');
                } else {
                    compile_node(child, sql, values)?;
                }
            }
            Ok(())
        }
    }
}

fn compile_condition(
    column: &str,
    operator: Option<Operator>,
    operand: &Operand,
    sql: &mut String,
    values: &mut Vec<Value>,
) -> CfResult<()> {
    if column.is_empty() {
        return Err(CfError::MalformedPredicate(
            "condition has an empty column".to_string(),
        ));
    }

    match operand {
        Operand::Scalar(value) => {
            compile_scalar(column, operator, value, sql, values);
            Ok(())
        }
        Operand::List(list) => {
            let distinct = dedup(list);
            match distinct.as_slice() {
                [] => Err(CfError::MalformedPredicate(format!(
                    "empty value list for '{column}'"
                ))),
                [single] => {
                    compile_scalar(column, operator.map(Operator::singular), single, sql, values);
                    Ok(())
                }
                _ => {
                    let operator = operator.unwrap_or(Operator::In);
                    if !operator.takes_list() {
                        return Err(CfError::MalformedPredicate(format!(
                            "operator {operator} on '{column}' does not accept a list"
                        )));
                    }
                    let placeholders = vec!["?"; distinct.len()].join(", ");
                    sql.push_str(&format!("{column} {operator} ({placeholders})"));
                    values.extend(distinct.into_iter().cloned());
                    Ok(())
                }
            }
        }
    }
}

fn compile_scalar(
    column: &str,
    operator: Option<Operator>,
    value: &Value,
    sql: &mut String,
    values: &mut Vec<Value>,
) {
    let operator = operator.unwrap_or(Operator::Eq);
    if operator.takes_list() {
        sql.push_str(&format!("{column} {operator} (?)"));
    } else {
        sql.push_str(&format!("{column} {operator} ?"));
    }
    values.push(value.clone());
}

/// Removes duplicates, keeping the first occurrence of each value.
///
/// Linear scan per value: `Value` holds `f64` so it is neither `Hash` nor
/// `Eq`, and equality must match `PartialEq` (`NaN` never equals itself).
fn dedup(list: &[Value]) -> Vec<&Value> {
    let mut distinct: Vec<&Value> = Vec::with_capacity(list.len());
    for value in list {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct
}

fn strip_suffix(key: &str) -> &str {
    key.split_once('#').map_or(key, |(head, _)| head)
}

fn children_from_json(
    object: &serde_json::Map<String, serde_json::Value>,
) -> CfResult<Vec<Predicate>> {
    object
        .iter()
        .map(|(key, value)| {
            if let Some(connective) = Connective::from_tag(strip_suffix(key).trim()) {
                let nested = value.as_object().ok_or_else(|| {
                    CfError::MalformedPredicate(format!(
                        "'{key}' must hold a nested predicate object, got {value}"
                    ))
                })?;
                return Ok(Predicate::Group {
                    connective,
                    children: children_from_json(nested)?,
                });
            }

            let operand = match value {
                serde_json::Value::Array(items) => Operand::List(
                    items
                        .iter()
                        .map(Value::from_json)
                        .collect::<CfResult<Vec<_>>>()?,
                ),
                scalar => Operand::Scalar(Value::from_json(scalar)?),
            };
            Predicate::from_key(key, operand)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(p: &Predicate) -> (String, Vec<Value>) {
        let fragment = compile_predicate(p).unwrap();
        (fragment.sql, fragment.values)
    }

    // ── Operators ────────────────────────────────────────────────────

    #[test]
    fn test_operator_parse_case_insensitive() {
        assert_eq!("like".parse::<Operator>().unwrap(), Operator::Like);
        assert_eq!("not   in".parse::<Operator>().unwrap(), Operator::NotIn);
        assert_eq!("Is Not".parse::<Operator>().unwrap(), Operator::IsNot);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("<>".parse::<Operator>().unwrap(), Operator::NotEqual);
    }

    #[test]
    fn test_operator_parse_unknown() {
        let err = "~=".parse::<Operator>().unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
        assert!("DROP TABLE".parse::<Operator>().is_err());
    }

    // ── Scalars ──────────────────────────────────────────────────────

    #[test]
    fn test_scalar_default_operator() {
        let (sql, values) = compile(&Predicate::eq("id", 7));
        assert_eq!(sql, "id = ?");
        assert_eq!(values, vec![Value::Int(7)]);
    }

    #[test]
    fn test_scalar_explicit_operator() {
        let (sql, values) = compile(&Predicate::compare("age", Operator::Ge, 18));
        assert_eq!(sql, "age >= ?");
        assert_eq!(values, vec![Value::Int(18)]);
    }

    #[test]
    fn test_scalar_with_in_operator() {
        let (sql, values) = compile(&Predicate::compare("id", Operator::In, 3));
        assert_eq!(sql, "id IN (?)");
        assert_eq!(values, vec![Value::Int(3)]);
    }

    #[test]
    fn test_null_is_bound_not_rewritten() {
        let (sql, values) = compile(&Predicate::compare("deleted_at", Operator::Is, Value::Null));
        assert_eq!(sql, "deleted_at IS ?");
        assert_eq!(values, vec![Value::Null]);
    }

    // ── Lists ────────────────────────────────────────────────────────

    #[test]
    fn test_list_default_in() {
        let (sql, values) = compile(&Predicate::is_in("id", [1, 2, 3]));
        assert_eq!(sql, "id IN (?, ?, ?)");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_list_dedup_keeps_first_occurrence_order() {
        let (sql, values) = compile(&Predicate::is_in("id", [3, 1, 3, 2, 1]));
        assert_eq!(sql, "id IN (?, ?, ?)");
        assert_eq!(values, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_list_singleton_collapses_to_eq() {
        let repeated = Predicate::compare(
            "age",
            Operator::In,
            Operand::List(vec![Value::Int(5), Value::Int(5), Value::Int(5)]),
        );
        assert_eq!(compile(&repeated), compile(&Predicate::eq("age", 5)));
        assert_eq!(compile(&repeated).0, "age = ?");
    }

    #[test]
    fn test_list_singleton_not_in_collapses_to_ne() {
        let p = Predicate::compare("age", Operator::NotIn, Operand::List(vec![Value::Int(5)]));
        assert_eq!(compile(&p).0, "age != ?");
    }

    #[test]
    fn test_list_singleton_keeps_comparison_operator() {
        let p = Predicate::compare("age", Operator::Gt, Operand::List(vec![Value::Int(5)]));
        assert_eq!(compile(&p).0, "age > ?");
    }

    #[test]
    fn test_list_not_in() {
        let p = Predicate::compare(
            "status",
            Operator::NotIn,
            Operand::List(vec!["a".into(), "b".into()]),
        );
        assert_eq!(compile(&p).0, "status NOT IN (?, ?)");
    }

    #[test]
    fn test_list_with_scalar_operator_is_malformed() {
        let p = Predicate::compare(
            "age",
            Operator::Gt,
            Operand::List(vec![Value::Int(1), Value::Int(2)]),
        );
        let err = compile_predicate(&p).unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
    }

    #[test]
    fn test_empty_list_is_malformed() {
        let p = Predicate::is_in("id", Vec::<i64>::new());
        let err = compile_predicate(&p).unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
    }

    #[test]
    fn test_empty_column_is_malformed() {
        let err = compile_predicate(&Predicate::eq("", 1)).unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
    }

    // ── Groups ───────────────────────────────────────────────────────

    #[test]
    fn test_nested_groups_parenthesized() {
        let p = Predicate::and([
            Predicate::eq("x", 1),
            Predicate::or([Predicate::eq("y", 2), Predicate::eq("z", 3)]),
        ]);
        let (sql, values) = compile(&p);
        assert_eq!(sql, "x = ? AND (y = ? OR z = ?)");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_values_follow_placeholders_across_depths() {
        let p = Predicate::or([
            Predicate::and([
                Predicate::eq("a", 1),
                Predicate::or([Predicate::eq("b", 2), Predicate::is_in("c", [3, 4])]),
            ]),
            Predicate::eq("d", 5),
        ]);
        let (sql, values) = compile(&p);
        assert_eq!(sql, "(a = ? AND (b = ? OR c IN (?, ?))) OR d = ?");
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4),
                Value::Int(5)
            ]
        );
    }

    #[test]
    fn test_same_column_twice() {
        let p = Predicate::and([
            Predicate::compare("age", Operator::Ge, 18),
            Predicate::compare("age", Operator::Lt, 65),
        ]);
        assert_eq!(compile(&p).0, "age >= ? AND age < ?");
    }

    #[test]
    fn test_empty_tree_yields_empty_fragment() {
        let fragment = compile_predicate(&Predicate::and([])).unwrap();
        assert!(fragment.sql.is_empty());
        assert!(fragment.values.is_empty());
    }

    #[test]
    fn test_empty_nested_group_skipped() {
        let p = Predicate::and([
            Predicate::or([]),
            Predicate::eq("x", 1),
            Predicate::and([Predicate::or([])]),
        ]);
        assert!(!p.is_empty());
        assert_eq!(compile(&p).0, "x = ?");
    }

    #[test]
    fn test_bit_operators_flatten() {
        let p = Predicate::eq("a", 1) & Predicate::eq("b", 2) & Predicate::eq("c", 3);
        match &p {
            Predicate::Group {
                connective: Connective::And,
                children,
            } => assert_eq!(children.len(), 3),
            _ => panic!("Expected And group"),
        }

        let q = (Predicate::eq("a", 1) | Predicate::eq("b", 2)) & Predicate::eq("c", 3);
        assert_eq!(compile(&q).0, "(a = ? OR b = ?) AND c = ?");
    }

    // ── Legacy keys ──────────────────────────────────────────────────

    #[test]
    fn test_from_key_plain_column() {
        let p = Predicate::from_key("name", "a").unwrap();
        assert_eq!(p, Predicate::eq("name", "a"));
    }

    #[test]
    fn test_from_key_with_operator_and_suffix() {
        let p = Predicate::from_key("age >=#2", 18).unwrap();
        assert_eq!(p, Predicate::compare("age", Operator::Ge, 18));

        let p = Predicate::from_key("name not like", "a%").unwrap();
        assert_eq!(compile(&p).0, "name NOT LIKE ?");
    }

    #[test]
    fn test_from_key_errors() {
        assert!(matches!(
            Predicate::from_key("#1", 1),
            Err(CfError::MalformedPredicate(_))
        ));
        assert!(matches!(
            Predicate::from_key("age ~~", 1),
            Err(CfError::MalformedPredicate(_))
        ));
        assert!(matches!(
            Predicate::from_key("AND", 1),
            Err(CfError::MalformedPredicate(_))
        ));
    }

    #[test]
    fn test_from_json_nesting() {
        let json = serde_json::json!({"AND": {"x": 1, "OR": {"y": 2, "z": 3}}});
        let (sql, values) = compile(&Predicate::from_json(&json).unwrap());
        assert_eq!(sql, "x = ? AND (y = ? OR z = ?)");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_from_json_duplicate_column_via_suffix() {
        let json = serde_json::json!({"age >=": 18, "age <#2": 65, "id": [1, 2, 2]});
        let (sql, values) = compile(&Predicate::from_json(&json).unwrap());
        assert_eq!(sql, "age >= ? AND age < ? AND id IN (?, ?)");
        assert_eq!(
            values,
            vec![Value::Int(18), Value::Int(65), Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn test_from_json_errors() {
        let not_object = serde_json::json!([1, 2]);
        assert!(Predicate::from_json(&not_object).is_err());

        let bad_group = serde_json::json!({"OR": [1, 2]});
        assert!(matches!(
            Predicate::from_json(&bad_group),
            Err(CfError::MalformedPredicate(_))
        ));

        let nested_list = serde_json::json!({"id": [[1], [2]]});
        assert!(matches!(
            Predicate::from_json(&nested_list),
            Err(CfError::MalformedPredicate(_))
        ));
    }
}
