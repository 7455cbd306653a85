//! # Harvest Auth Recovery Plugin
//!
//! Email-code account recovery for the Harvest Market backend: a user who
//! lost their password requests a one-time code by email, verifies it, and
//! redeems the resulting reset token exactly once to set a new password.

mod config;
mod email;
mod handlers;
mod schema;
mod service;

pub use config::{PasswordPolicy, RecoveryConfig};
pub use email::verification_code_message;
pub use schema::RecoverySchema;
pub use service::{
    CodeRequestReceipt, IssuedResetToken, RecoveryService, TokenRedemption,
};

use std::sync::Arc;

use harvest_auth_core::router::{Method, Route, Router};
use harvest_auth_core::schema::SchemaBuilder;
use harvest_auth_core::traits::{AuthPlugin, MailDispatcher, RecoveryStore, SchemaProvider};

/// The account-recovery plugin.
pub struct RecoveryPlugin {
    service: Arc<RecoveryService>,
}

impl RecoveryPlugin {
    /// Creates a new recovery plugin over the given collaborators.
    pub fn new(
        store: Arc<dyn RecoveryStore>,
        mailer: Arc<dyn MailDispatcher>,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            service: Arc::new(RecoveryService::new(store, mailer, config)),
        }
    }

    /// Gets the underlying service.
    pub fn service(&self) -> Arc<RecoveryService> {
        Arc::clone(&self.service)
    }
}

impl AuthPlugin for RecoveryPlugin {
    fn id(&self) -> &'static str {
        "recovery"
    }

    fn name(&self) -> &'static str {
        "Account Recovery"
    }

    fn define_schema(&self, builder: &mut SchemaBuilder) {
        for model in RecoverySchema::schema() {
            builder.add_model_mut(model);
        }
    }

    fn register_routes(&self, router: &mut Router) {
        router.route(
            Route::new(
                Method::POST,
                "/recovery/request-code",
                handlers::RequestCodeHandler::new(self.service()),
            )
            .summary("Request a verification code")
            .description("Issues a one-time code and emails it to the account. The response shape does not reveal whether the account exists.")
            .tag("recovery"),
        );

        router.route(
            Route::new(
                Method::POST,
                "/recovery/resend-code",
                handlers::ResendCodeHandler::new(self.service()),
            )
            .summary("Resend the verification code")
            .description("Invalidates any outstanding code and issues a fresh one.")
            .tag("recovery"),
        );

        router.route(
            Route::new(
                Method::POST,
                "/recovery/verify-code",
                handlers::VerifyCodeHandler::new(self.service()),
            )
            .summary("Verify a code")
            .description("Checks the submitted code and returns a single-use reset token on success.")
            .tag("recovery"),
        );

        router.route(
            Route::new(
                Method::POST,
                "/recovery/reset-password",
                handlers::ResetPasswordHandler::new(self.service()),
            )
            .summary("Set a new password")
            .description("Redeems a reset token and overwrites the account password.")
            .tag("recovery"),
        );
    }
}
