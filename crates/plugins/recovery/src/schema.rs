//! Schema definitions for the recovery plugin.

use harvest_auth_core::schema::{
    Field, FieldType, IndexDefinition, ModelDefinition, ReferentialAction,
};
use harvest_auth_core::traits::SchemaProvider;

/// Schema provider for the recovery tables.
pub struct RecoverySchema;

impl SchemaProvider for RecoverySchema {
    fn schema() -> Vec<ModelDefinition> {
        vec![
            ModelDefinition::new("otp_credential")
                .field(Field::primary_key("id"))
                .field(
                    Field::new("user_id", FieldType::BigInt)
                        .references("users.id")
                        .on_delete(ReferentialAction::Cascade),
                )
                .field(Field::new("code", FieldType::String(16)))
                .field(Field::new("expires_at", FieldType::Timestamp))
                .field(Field::new("consumed", FieldType::Boolean).default("false"))
                .field(Field::new("created_at", FieldType::Timestamp))
                .index(IndexDefinition::new(
                    "idx_otp_credential_user_created",
                    vec!["user_id".to_string(), "created_at".to_string()],
                )),
            ModelDefinition::new("reset_token")
                .field(Field::primary_key("id"))
                .field(
                    Field::new("user_id", FieldType::BigInt)
                        .references("users.id")
                        .on_delete(ReferentialAction::Cascade),
                )
                .field(Field::new("token", FieldType::String(64)).unique())
                .field(Field::new("expires_at", FieldType::Timestamp))
                .field(Field::new("used", FieldType::Boolean).default("false"))
                .field(Field::new("created_at", FieldType::Timestamp))
                .index(IndexDefinition::new(
                    "idx_reset_token_user",
                    vec!["user_id".to_string()],
                )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_definition() {
        let models = RecoverySchema::schema();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "otp_credential");
        assert_eq!(models[1].name, "reset_token");
    }

    #[test]
    fn test_tokens_are_unique_column() {
        let models = RecoverySchema::schema();
        let token_field = models[1].get_field("token").unwrap();
        assert!(token_field.unique);
    }

    #[test]
    fn test_rows_cascade_with_user() {
        for model in RecoverySchema::schema() {
            let user_id = model.get_field("user_id").unwrap();
            assert_eq!(user_id.on_delete, Some(ReferentialAction::Cascade));
        }
    }
}
