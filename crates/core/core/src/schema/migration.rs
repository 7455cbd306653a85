//! Deployment-time migration rendering.
//!
//! The runner turns the fixed [`SchemaDefinition`] into idempotent DDL
//! (`CREATE TABLE IF NOT EXISTS` plus index statements) for the target
//! dialect. Operations apply the output once per deployment; request
//! handlers never touch schema.

use super::{Field, ModelDefinition, SchemaDefinition, SqlDialect};

/// A named, ordered set of DDL statements.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Human-readable name.
    pub name: String,
    /// The statements to execute, in order.
    pub statements: Vec<String>,
}

impl Migration {
    /// Creates a new empty migration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }

    /// Returns the statements joined into a single script.
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for stmt in &self.statements {
            script.push_str(stmt);
            script.push_str(";\n");
        }
        script
    }
}

/// Renders a schema into DDL for one SQL dialect.
pub struct MigrationRunner {
    dialect: SqlDialect,
}

impl MigrationRunner {
    /// Creates a new migration runner for the given SQL dialect.
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    /// Plans the migration that creates every model in the schema.
    pub fn plan(&self, schema: &SchemaDefinition) -> Migration {
        let mut migration = Migration::new("recovery_schema");
        for model in &schema.models {
            migration.statements.push(self.create_table_sql(model));
            for index in &model.indexes {
                migration.statements.push(self.create_index_sql(model, index));
            }
        }
        migration
    }

    fn create_table_sql(&self, model: &ModelDefinition) -> String {
        let mut columns = Vec::new();
        let mut constraints = Vec::new();

        for field in &model.fields {
            columns.push(self.column_sql(field));
            if let Some(target) = &field.references {
                constraints.push(self.foreign_key_sql(model, field, target));
            }
        }

        columns.extend(constraints);
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            model.name,
            columns.join(",\n    ")
        )
    }

    fn column_sql(&self, field: &Field) -> String {
        let mut col = format!("{} {}", field.name, field.field_type.sql_type(self.dialect));
        if field.primary_key {
            col.push_str(" PRIMARY KEY");
        } else if field.required {
            col.push_str(" NOT NULL");
        }
        if field.unique && !field.primary_key {
            col.push_str(" UNIQUE");
        }
        if let Some(default) = &field.default {
            col.push_str(&format!(" DEFAULT {}", default));
        }
        col
    }

    fn foreign_key_sql(&self, model: &ModelDefinition, field: &Field, target: &str) -> String {
        let (table, column) = target.split_once('.').unwrap_or((target, "id"));
        let mut sql = format!(
            "CONSTRAINT fk_{}_{} FOREIGN KEY ({}) REFERENCES {} ({})",
            model.name, field.name, field.name, table, column
        );
        if let Some(action) = field.on_delete {
            sql.push_str(&format!(" ON DELETE {}", action.sql()));
        }
        sql
    }

    fn create_index_sql(&self, model: &ModelDefinition, index: &super::IndexDefinition) -> String {
        let unique = if index.unique { "UNIQUE " } else { "" };
        match self.dialect {
            SqlDialect::Postgres => format!(
                "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
                unique,
                index.name,
                model.name,
                index.columns.join(", ")
            ),
            // MySQL has no IF NOT EXISTS for indexes; deployments apply the
            // migration once so a plain CREATE INDEX is correct there.
            SqlDialect::MySql => format!(
                "CREATE {}INDEX {} ON {} ({})",
                unique,
                index.name,
                model.name,
                index.columns.join(", ")
            ),
        }
    }
}
