//! Schema builder aggregating model definitions from plugins.

use super::{ModelDefinition, SchemaDefinition};
use crate::traits::SchemaProvider;
use std::collections::HashMap;

/// Collects model definitions from the core schema and plugins into the
/// single fixed schema the deployment applies.
pub struct SchemaBuilder {
    models: HashMap<String, ModelDefinition>,
}

impl SchemaBuilder {
    /// Creates a new empty schema builder.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Creates a schema builder with the core models pre-loaded.
    pub fn with_core() -> Self {
        let mut builder = Self::new();
        for model in super::core_schema() {
            builder.models.insert(model.name.clone(), model);
        }
        builder
    }

    /// Registers the models from a SchemaProvider.
    pub fn define_model<T: SchemaProvider>(mut self) -> Self {
        for model in T::schema() {
            self.models.insert(model.name.clone(), model);
        }
        self
    }

    /// Adds a model definition directly.
    pub fn add_model(mut self, model: ModelDefinition) -> Self {
        self.models.insert(model.name.clone(), model);
        self
    }

    /// Adds a model definition directly (mutable reference version).
    pub fn add_model_mut(&mut self, model: ModelDefinition) -> &mut Self {
        self.models.insert(model.name.clone(), model);
        self
    }

    /// Builds the final schema definition.
    pub fn build(self) -> SchemaDefinition {
        let mut models: Vec<ModelDefinition> = self.models.into_values().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        SchemaDefinition { models }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
