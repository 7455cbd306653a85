//! Schema definition language for the recovery tables.
//!
//! The schema is fixed and versioned: plugins declare their tables through
//! these types, the builder aggregates them, and the migration runner
//! renders dialect-specific DDL applied once at deployment. The runtime
//! never inspects or mutates schema at request time.

mod builder;
mod migration;

pub use builder::SchemaBuilder;
pub use migration::{Migration, MigrationRunner};

use serde::{Deserialize, Serialize};

/// Represents a complete model (table) definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDefinition {
    /// The name of the model/table.
    pub name: String,
    /// The fields (columns) in this model.
    pub fields: Vec<Field>,
    /// Indexes on this model.
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl ModelDefinition {
    /// Creates a new model definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Adds a field to the model.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an index to the model.
    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Represents a field (column) in a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    /// The name of the field.
    pub name: String,
    /// The data type of the field.
    pub field_type: FieldType,
    /// Whether this field is required (NOT NULL).
    #[serde(default)]
    pub required: bool,
    /// Whether this field is unique.
    #[serde(default)]
    pub unique: bool,
    /// Whether this field is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Default value for the field (as a SQL expression).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Foreign key reference (table.column).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    /// Action on delete for foreign keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
}

impl Field {
    /// Creates a new required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            unique: false,
            primary_key: false,
            default: None,
            references: None,
            on_delete: None,
        }
    }

    /// Creates a string primary key field.
    pub fn primary_key(name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldType::String(36));
        field.primary_key = true;
        field
    }

    /// Creates a numeric primary key field.
    pub fn big_primary_key(name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldType::BigInt);
        field.primary_key = true;
        field
    }

    /// Marks this field as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a default value.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets a foreign key reference (table.column).
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.references = Some(target.into());
        self
    }

    /// Sets the on-delete action for the foreign key.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }
}

/// The data type of a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldType {
    /// A 64-bit integer.
    BigInt,
    /// A variable-length string with a maximum length.
    String(u32),
    /// An unbounded text column.
    Text,
    /// A boolean flag.
    Boolean,
    /// A timestamp with timezone.
    Timestamp,
}

impl FieldType {
    /// Returns the SQL type for the given dialect.
    pub fn sql_type(&self, dialect: SqlDialect) -> String {
        match (self, dialect) {
            (FieldType::BigInt, _) => "BIGINT".to_string(),
            (FieldType::String(len), _) => format!("VARCHAR({})", len),
            (FieldType::Text, _) => "TEXT".to_string(),
            (FieldType::Boolean, SqlDialect::MySql) => "TINYINT(1)".to_string(),
            (FieldType::Boolean, SqlDialect::Postgres) => "BOOLEAN".to_string(),
            (FieldType::Timestamp, SqlDialect::MySql) => "DATETIME".to_string(),
            (FieldType::Timestamp, SqlDialect::Postgres) => "TIMESTAMPTZ".to_string(),
        }
    }
}

/// Action taken on a foreign key when the referenced row is deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    Restrict,
}

impl ReferentialAction {
    /// Returns the SQL clause for this action.
    pub fn sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
        }
    }
}

/// An index over one or more columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDefinition {
    /// The index name.
    pub name: String,
    /// The indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    /// Creates a new index definition.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    /// Marks the index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// The SQL dialects the migration runner can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Postgres,
    MySql,
}

/// A complete schema: the set of models the deployment must provide.
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    /// The models in this schema.
    pub models: Vec<ModelDefinition>,
}

impl SchemaDefinition {
    /// Creates an empty schema definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a model by name.
    pub fn get_model(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// Returns the core models this subsystem reads but does not own: the
/// marketplace `users` table, as the recovery flow expects it to exist.
pub fn core_schema() -> Vec<ModelDefinition> {
    vec![ModelDefinition::new("users")
        .field(Field::big_primary_key("id"))
        .field(Field::new("username", FieldType::String(64)).unique())
        .field(Field::new("email", FieldType::String(255)).unique())
        .field(Field::new("password_hash", FieldType::Text))
        .field(Field::new("role", FieldType::String(16)))
        .field(Field::new("verified", FieldType::Boolean).default("false"))
        .field(Field::new("created_at", FieldType::Timestamp))
        .field(Field::new("updated_at", FieldType::Timestamp))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_schema_users_table() {
        let models = core_schema();
        assert_eq!(models.len(), 1);

        let users = &models[0];
        assert_eq!(users.name, "users");
        assert!(users.get_field("password_hash").is_some());
        assert!(users.get_field("email").unwrap().unique);
    }

    #[test]
    fn test_sql_types_per_dialect() {
        assert_eq!(FieldType::Boolean.sql_type(SqlDialect::Postgres), "BOOLEAN");
        assert_eq!(FieldType::Boolean.sql_type(SqlDialect::MySql), "TINYINT(1)");
        assert_eq!(FieldType::String(64).sql_type(SqlDialect::MySql), "VARCHAR(64)");
    }
}
