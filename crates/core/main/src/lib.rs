//! # Harvest Auth
//!
//! Account recovery for the Harvest Market backend: email-code issuance,
//! verification, and single-use password reset.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use harvest_auth::prelude::*;
//! use harvest_auth_adapter_memory::MemoryStore;
//! use harvest_auth_mailer::LogMailer;
//! use harvest_auth_plugin_recovery::{RecoveryConfig, RecoveryService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RecoveryError> {
//!     let service = RecoveryService::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(LogMailer::new()),
//!         RecoveryConfig::default(),
//!     );
//!
//!     let receipt = service.request_code("alice@example.com", "alice").await?;
//!     assert!(receipt.accepted);
//!
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use harvest_auth_core::*;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use harvest_auth_core::error::{RecoveryError, RecoveryResult};
    pub use harvest_auth_core::schema::{Field, FieldType, ModelDefinition};
    pub use harvest_auth_core::traits::{
        AuthPlugin, MailDispatcher, RecoveryStore, SchemaProvider,
    };
    pub use harvest_auth_core::types::{OtpCredential, ResetToken, Role, User};
}
