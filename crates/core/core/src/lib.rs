//! # Harvest Auth Core
//!
//! Foundational types and traits for the Harvest Market account-recovery
//! service. It defines the domain records (`User`, `OtpCredential`,
//! `ResetToken`), the error taxonomy, and the trait seams that storage
//! adapters, mail dispatchers, and flow plugins implement.

pub mod error;
pub mod router;
pub mod schema;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{RecoveryError, RecoveryResult};
pub use schema::{
    core_schema, Field, FieldType, IndexDefinition, Migration, MigrationRunner, ModelDefinition,
    ReferentialAction, SchemaBuilder, SchemaDefinition, SqlDialect,
};
pub use traits::{
    AuthPlugin, MailDispatcher, MailMessage, MailReceipt, RecoveryStore, SchemaProvider,
};
pub use types::{OtpCredential, ResetToken, Role, User};

// Re-export router types
pub use router::{Method, Request, RequestHandler, Response, Route, Router};
