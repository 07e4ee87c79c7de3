//! Column type descriptors, entity schemas, and the type resolver.
//!
//! A [`ColumnDescriptor`] is either an atomic [`ColumnType`] or a reference
//! to another entity, plus the `primary`, `auto`, `null` and `default`
//! attributes. The [`TypeResolver`] turns a descriptor into the dialect's
//! DDL fragment. A reference resolves to the type of the referenced
//! entity's identity column, so foreign keys always match the primary key
//! they point at.
//!
//! Entity schemas are supplied by the caller through [`SchemaLookup`]; the
//! resolver never consults global state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cf_rs_core::{CfError, CfResult};
use serde::Deserialize;

use crate::dialect::Dialect;

/// An atomic column type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Integer.
    Int,
    /// Short string.
    String,
    /// Unbounded text.
    Text,
    /// Serialized list of values.
    List,
    /// Boolean flag.
    Bool,
}

impl ColumnType {
    /// Returns the tag for this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Text => "text",
            Self::List => "list",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = CfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "list" => Ok(Self::List),
            "bool" => Ok(Self::Bool),
            other => Err(CfError::UnknownType(other.to_string())),
        }
    }
}

/// The base type of a column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// An atomic type looked up in the dialect's type table.
    Column(ColumnType),
    /// The identity column type of another entity.
    References(String),
}

/// A column type with its DDL attributes.
///
/// Descriptors can be deserialized either from a bare tag (`"int"`) or from
/// an object:
///
/// ```
/// use cf_rs_db::schema::{ColumnDescriptor, ColumnType, TypeRef};
///
/// let desc: ColumnDescriptor =
///     serde_json::from_str(r#"{"type": "int", "primary": true, "auto": true}"#).unwrap();
/// assert_eq!(desc.base, TypeRef::Column(ColumnType::Int));
/// assert!(desc.primary && desc.auto);
///
/// let fk: ColumnDescriptor = serde_json::from_str(r#"{"references": "users"}"#).unwrap();
/// assert_eq!(fk.base, TypeRef::References("users".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DescriptorRepr")]
pub struct ColumnDescriptor {
    /// The base type.
    pub base: TypeRef,
    /// Whether the column is the primary key.
    pub primary: bool,
    /// Whether the column auto-increments.
    pub auto: bool,
    /// Explicit nullability. `None` emits no nullability token.
    pub null: Option<bool>,
    /// Default literal, emitted quoted.
    pub default: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a descriptor for an atomic type with no attributes.
    pub const fn new(column_type: ColumnType) -> Self {
        Self::with_base(TypeRef::Column(column_type))
    }

    /// Creates a descriptor referencing another entity's identity column.
    pub fn references(entity: impl Into<String>) -> Self {
        Self::with_base(TypeRef::References(entity.into()))
    }

    /// Parses a bare atomic tag such as `"string"`.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::UnknownType`] if the tag is not a known type.
    pub fn parse(tag: &str) -> CfResult<Self> {
        Ok(Self::new(tag.parse()?))
    }

    const fn with_base(base: TypeRef) -> Self {
        Self {
            base,
            primary: false,
            auto: false,
            null: None,
            default: None,
        }
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    /// Sets explicit nullability.
    #[must_use]
    pub fn null(mut self, nullable: bool) -> Self {
        self.null = Some(nullable);
        self
    }

    /// Sets the default literal.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorRepr {
    Tag(String),
    Full {
        #[serde(rename = "type")]
        column_type: Option<String>,
        references: Option<String>,
        #[serde(default)]
        primary: bool,
        #[serde(default)]
        auto: bool,
        null: Option<bool>,
        default: Option<String>,
    },
}

impl TryFrom<DescriptorRepr> for ColumnDescriptor {
    type Error = CfError;

    fn try_from(repr: DescriptorRepr) -> Result<Self, Self::Error> {
        match repr {
            DescriptorRepr::Tag(tag) => Self::parse(&tag),
            DescriptorRepr::Full {
                column_type,
                references,
                primary,
                auto,
                null,
                default,
            } => {
                let base = match (column_type, references) {
                    (Some(tag), None) => TypeRef::Column(tag.parse()?),
                    (None, Some(entity)) => TypeRef::References(entity),
                    _ => {
                        return Err(CfError::SerializationError(
                            "column descriptor needs exactly one of 'type' or 'references'"
                                .to_string(),
                        ))
                    }
                };
                Ok(Self {
                    base,
                    primary,
                    auto,
                    null,
                    default,
                })
            }
        }
    }
}

/// The schema of one entity: its columns in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySchema {
    /// Explicit identity column. When `None`, the first column flagged
    /// `primary` is the identity column.
    pub identity_column: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<(String, ColumnDescriptor)>,
}

impl EntitySchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, descriptor: ColumnDescriptor) -> Self {
        self.columns.push((name.into(), descriptor));
        self
    }

    /// Sets the identity column explicitly.
    #[must_use]
    pub fn identity(mut self, name: impl Into<String>) -> Self {
        self.identity_column = Some(name.into());
        self
    }

    /// Returns the identity column name.
    pub fn identity_column(&self) -> Option<&str> {
        self.identity_column.as_deref().or_else(|| {
            self.columns
                .iter()
                .find(|(_, desc)| desc.primary)
                .map(|(name, _)| name.as_str())
        })
    }

    /// Returns the descriptor of a column.
    pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, desc)| desc)
    }

    /// Parses a schema from JSON of the form
    /// `{"identity": "id", "columns": {"id": {...}, "name": "string"}}`.
    /// Column order follows the JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CfError::SerializationError`] for malformed JSON and
    /// [`CfError::UnknownType`] for unknown type tags.
    pub fn from_json(json: &serde_json::Value) -> CfResult<Self> {
        let object = json.as_object().ok_or_else(|| {
            CfError::SerializationError(format!("entity schema must be an object, got {json}"))
        })?;

        let identity_column = match object.get("identity") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(CfError::SerializationError(format!(
                    "'identity' must be a string, got {other}"
                )))
            }
        };

        let columns = object
            .get("columns")
            .and_then(serde_json::Value::as_object)
            .ok_or_else(|| {
                CfError::SerializationError("entity schema needs a 'columns' object".to_string())
            })?
            .iter()
            .map(|(name, raw)| {
                let repr: DescriptorRepr = serde_json::from_value(raw.clone())?;
                Ok((name.clone(), ColumnDescriptor::try_from(repr)?))
            })
            .collect::<CfResult<Vec<_>>>()?;

        Ok(Self {
            identity_column,
            columns,
        })
    }
}

/// Synchronous, side-effect-free access to entity schemas.
pub trait SchemaLookup {
    /// Returns the schema of `entity`, if known.
    fn schema_of(&self, entity: &str) -> Option<&EntitySchema>;
}

impl SchemaLookup for HashMap<String, EntitySchema> {
    fn schema_of(&self, entity: &str) -> Option<&EntitySchema> {
        self.get(entity)
    }
}

/// An in-memory collection of entity schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the schema of an entity.
    pub fn register(&mut self, entity: impl Into<String>, schema: EntitySchema) {
        self.entities.insert(entity.into(), schema);
    }

    /// Returns the number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Loads a registry from a JSON object mapping entity names to schemas
    /// (see [`EntitySchema::from_json`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON or any schema in it is malformed.
    pub fn from_json_str(json: &str) -> CfResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            CfError::SerializationError("schema registry must be a JSON object".to_string())
        })?;

        let mut registry = Self::new();
        for (entity, schema) in object {
            registry.register(entity.clone(), EntitySchema::from_json(schema)?);
        }
        Ok(registry)
    }
}

impl SchemaLookup for SchemaRegistry {
    fn schema_of(&self, entity: &str) -> Option<&EntitySchema> {
        self.entities.get(entity)
    }
}

/// Resolves column descriptors into DDL fragments for one dialect.
pub struct TypeResolver<'a> {
    dialect: &'a dyn Dialect,
    schemas: &'a dyn SchemaLookup,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over a dialect and a schema lookup.
    pub fn new(dialect: &'a dyn Dialect, schemas: &'a dyn SchemaLookup) -> Self {
        Self { dialect, schemas }
    }

    /// Resolves a descriptor into its DDL fragment, e.g.
    /// `INTEGER PRIMARY KEY AUTOINCREMENT` or `VARCHAR(120) NOT NULL DEFAULT 'x'`.
    ///
    /// # Errors
    ///
    /// - [`CfError::UnknownType`] if the dialect has no token for the type.
    /// - [`CfError::Resolution`] if a referenced entity, its identity column,
    ///   or the identity column's descriptor cannot be found, or if references
    ///   form a cycle.
    pub fn resolve(&self, descriptor: &ColumnDescriptor) -> CfResult<String> {
        let mut visited = Vec::new();
        self.resolve_inner(descriptor, &mut visited)
    }

    fn resolve_inner(
        &self,
        descriptor: &ColumnDescriptor,
        visited: &mut Vec<String>,
    ) -> CfResult<String> {
        let column_type = match &descriptor.base {
            TypeRef::Column(column_type) => *column_type,
            TypeRef::References(entity) => {
                let target = self.referenced_descriptor(entity, visited)?;
                return self.resolve_inner(&Self::strip_identity(target), visited);
            }
        };

        let mut sql = self
            .dialect
            .type_sql(column_type)
            .ok_or_else(|| {
                CfError::UnknownType(format!(
                    "{column_type} has no {} type",
                    self.dialect.name()
                ))
            })?
            .to_string();

        if descriptor.primary {
            sql.push(' ');
            sql.push_str(self.dialect.primary_key());
        }
        if descriptor.auto {
            sql.push(' ');
            sql.push_str(self.dialect.auto_increment());
        }
        if let Some(nullable) = descriptor.null {
            sql.push(' ');
            sql.push_str(self.dialect.nullability(nullable));
        }
        if let Some(ref default) = descriptor.default {
            sql.push_str(&format!(
                " {} '{}'",
                self.dialect.default_keyword(),
                default.replace('\'', "''")
            ));
        }

        Ok(sql)
    }

    fn referenced_descriptor(
        &self,
        entity: &str,
        visited: &mut Vec<String>,
    ) -> CfResult<&'a ColumnDescriptor> {
        if visited.iter().any(|seen| seen == entity) {
            visited.push(entity.to_string());
            return Err(CfError::Resolution(format!(
                "reference cycle: {}",
                visited.join(" -> ")
            )));
        }
        visited.push(entity.to_string());

        let schemas: &'a dyn SchemaLookup = self.schemas;
        let schema = schemas
            .schema_of(entity)
            .ok_or_else(|| CfError::Resolution(format!("unknown entity '{entity}'")))?;
        let identity = schema.identity_column().ok_or_else(|| {
            CfError::Resolution(format!("entity '{entity}' has no identity column"))
        })?;
        let target = schema.descriptor(identity).ok_or_else(|| {
            CfError::Resolution(format!(
                "identity column '{identity}' of entity '{entity}' has no type"
            ))
        })?;

        tracing::trace!(entity, identity, "following column type reference");
        Ok(target)
    }

    /// Builds the descriptor a reference resolves through: the target's own
    /// descriptor with `primary`/`auto` cleared. Attributes set on the
    /// referencing descriptor do not apply.
    fn strip_identity(target: &ColumnDescriptor) -> ColumnDescriptor {
        ColumnDescriptor {
            primary: false,
            auto: false,
            ..target.clone()
        }
    }
}
