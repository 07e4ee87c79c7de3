//! Bound parameter values.
//!
//! [`Value`] is the scalar type carried in the `values` list of every
//! compiled fragment. [`FieldValue`] is what insert and update statements
//! receive per column: either a value to bind, or a raw SQL fragment that is
//! emitted verbatim and never bound.

use cf_rs_core::{CfError, CfResult};

/// A backend-agnostic scalar bound to a `?` placeholder.
///
/// # Examples
///
/// ```
/// use cf_rs_db::value::Value;
///
/// assert_eq!(Value::from(42_i64), Value::Int(42));
/// assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// Raw binary data.
    Bytes(Vec<u8>),
    /// A date without time.
    Date(chrono::NaiveDate),
    /// A date and time without timezone.
    DateTime(chrono::NaiveDateTime),
    /// A time without date.
    Time(chrono::NaiveTime),
    /// A UUID value.
    Uuid(uuid::Uuid),
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from!(
    bool => |v| Value::Bool(v),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => |v| Value::Int(v),
    u32 => |v| Value::Int(i64::from(v)),
    f64 => |v| Value::Float(v),
    String => |v| Value::String(v),
    &str => |v| Value::String(v.to_owned()),
    Vec<u8> => |v| Value::Bytes(v),
    &[u8] => |v| Value::Bytes(v.to_vec()),
    chrono::NaiveDate => |v| Value::Date(v),
    chrono::NaiveDateTime => |v| Value::DateTime(v),
    chrono::NaiveTime => |v| Value::Time(v),
    uuid::Uuid => |v| Value::Uuid(v),
);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl Value {
    /// Returns `true` if this value is `Null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts a JSON scalar into a `Value`.
    ///
    /// Integers that fit in `i64` become `Int`, other numbers become `Float`.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::MalformedPredicate`] for arrays and objects, which
    /// have no scalar representation.
    pub fn from_json(json: &serde_json::Value) -> CfResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| {
                    CfError::MalformedPredicate(format!("number {n} is not representable"))
                }),
            serde_json::Value::String(s) => Ok(Self::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(
                CfError::MalformedPredicate(format!("expected a scalar value, got {json}")),
            ),
        }
    }
}

/// A value assigned to a column by an insert or update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A value bound to a `?` placeholder.
    Bound(Value),
    /// A trusted SQL fragment emitted verbatim (e.g. `counter + 1`).
    ///
    /// Raw fragments must never be built from untrusted input.
    Raw(String),
}

impl FieldValue {
    /// Creates a raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::Bound(v)
    }
}

macro_rules! bound_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    Self::Bound(Value::from(v))
                }
            }
        )*
    };
}

bound_field_value!(
    bool,
    i32,
    i64,
    u32,
    f64,
    String,
    &str,
    Vec<u8>,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
    uuid::Uuid,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(false), Value::Bool(false));
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(42_u32), Value::Int(42));
    }

    #[test]
    fn test_from_string() {
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(
            Value::from("hello".to_string()),
            Value::String("hello".to_string())
        );
    }

    #[test]
    fn test_from_option() {
        let some_val: Option<i64> = Some(42);
        assert_eq!(Value::from(some_val), Value::Int(42));

        let none_val: Option<i64> = None;
        assert_eq!(Value::from(none_val), Value::Null);
        assert!(Value::from(none_val).is_null());
    }

    #[test]
    fn test_from_chrono_date() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Value::from(d), Value::Date(d));
    }

    #[test]
    fn test_from_uuid() {
        let u = uuid::Uuid::nil();
        assert_eq!(Value::from(u), Value::Uuid(u));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&serde_json::json!(null)).unwrap(), Value::Null);
        assert_eq!(Value::from_json(&serde_json::json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(Value::from_json(&serde_json::json!(7)).unwrap(), Value::Int(7));
        assert_eq!(Value::from_json(&serde_json::json!(2.5)).unwrap(), Value::Float(2.5));
        assert_eq!(
            Value::from_json(&serde_json::json!("a")).unwrap(),
            Value::String("a".into())
        );
    }

    #[test]
    fn test_from_json_rejects_containers() {
        let err = Value::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
        let err = Value::from_json(&serde_json::json!({"raw": "x"})).unwrap_err();
        assert!(matches!(err, CfError::MalformedPredicate(_)));
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from(5), FieldValue::Bound(Value::Int(5)));
        assert_eq!(
            FieldValue::raw("counter + 1"),
            FieldValue::Raw("counter + 1".to_string())
        );
    }
}
