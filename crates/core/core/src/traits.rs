//! Core traits for the account-recovery service.
//!
//! This module defines the trait seams between the recovery flow and its
//! collaborators: the relational store, the outbound mail dispatcher, and
//! the plugin surface the HTTP layer assembles.

use async_trait::async_trait;

use crate::error::RecoveryResult;
use crate::router::Router;
use crate::schema::{ModelDefinition, SchemaBuilder};
use crate::types::{OtpCredential, ResetToken, User};

/// Trait for providing schema definitions.
///
/// Plugins and models implement this trait to declare their table
/// requirements. The schema builder aggregates these definitions into the
/// fixed schema applied at deployment.
pub trait SchemaProvider {
    /// Returns the model definitions required by this provider.
    fn schema() -> Vec<ModelDefinition>;
}

/// Trait for flow plugins.
///
/// A plugin contributes its tables to the deployment schema and its routes
/// to the router the HTTP layer mounts.
pub trait AuthPlugin: Send + Sync {
    /// Returns the unique identifier for this plugin.
    fn id(&self) -> &'static str;

    /// Returns a human-readable name for this plugin.
    fn name(&self) -> &'static str;

    /// Defines the schema requirements for this plugin.
    fn define_schema(&self, _builder: &mut SchemaBuilder) {}

    /// Registers routes for this plugin.
    fn register_routes(&self, _router: &mut Router) {}
}

/// Trait for the relational store backing the recovery workflow.
///
/// Adapters implement this trait against `users`, `otp_credential`, and
/// `reset_token` tables. The two `*_consume`-shaped operations must be
/// atomic conditional updates: the unconsumed/unused guard and the flip
/// happen as one statement, and the return value reports whether this call
/// performed the transition. Two racing callers must never both see `true`.
#[async_trait]
pub trait RecoveryStore: Send + Sync {
    // ==================== User Operations ====================

    /// Finds a user matching both email and username.
    async fn find_user_by_login(
        &self,
        email: &str,
        username: &str,
    ) -> RecoveryResult<Option<User>>;

    /// Finds a user by ID.
    async fn find_user_by_id(&self, id: i64) -> RecoveryResult<Option<User>>;

    // ==================== Credential Operations ====================

    /// Deletes every credential row for the owning user, then inserts the
    /// given one. Only the newest code is ever valid.
    async fn replace_credential(&self, credential: &OtpCredential) -> RecoveryResult<()>;

    /// Returns the most recently created credential for the user regardless
    /// of its consumed/expired state. Interpretation is the verifier's job.
    async fn latest_credential(&self, user_id: i64) -> RecoveryResult<Option<OtpCredential>>;

    /// Atomically flips `consumed` from false to true for the given row.
    /// Returns true only if this call performed the transition.
    async fn consume_credential(&self, credential_id: &str) -> RecoveryResult<bool>;

    // ==================== Reset Token Operations ====================

    /// Prunes the owning user's used and expired tokens, then inserts the
    /// given one.
    async fn put_reset_token(&self, token: &ResetToken) -> RecoveryResult<()>;

    /// Looks up a token row by exact token value.
    async fn find_reset_token(&self, token: &str) -> RecoveryResult<Option<ResetToken>>;

    /// Atomically flips `used` from false to true for the given token row
    /// and overwrites the owning user's password hash, both in the same
    /// transaction. Returns true only if this call performed the flip; a
    /// false return means the token was redeemed by a concurrent call and
    /// the password was not written.
    async fn commit_password_reset(
        &self,
        token_id: &str,
        user_id: i64,
        password_hash: &str,
    ) -> RecoveryResult<bool>;

    // ==================== Schema Operations ====================

    /// Applies the fixed schema. Called once at deployment, never at
    /// request time.
    async fn migrate(&self, models: &[ModelDefinition]) -> RecoveryResult<()>;
}

/// An outbound email message with alternative bodies.
#[derive(Debug, Clone)]
pub struct MailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// Plain-text body.
    pub text_body: String,
}

impl MailMessage {
    /// Creates a new message.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
            text_body: text_body.into(),
        }
    }
}

/// The dispatcher's report on a send.
#[derive(Debug, Clone, Copy)]
pub struct MailReceipt {
    /// Whether the message was handed to the transport.
    pub queued: bool,
    /// Whether the provider positively acknowledged the message.
    pub provider_confirmed: bool,
}

impl MailReceipt {
    /// A receipt for a provider-acknowledged send.
    pub fn confirmed() -> Self {
        Self {
            queued: true,
            provider_confirmed: true,
        }
    }

    /// A receipt for a send that was queued without provider confirmation.
    pub fn unconfirmed() -> Self {
        Self {
            queued: true,
            provider_confirmed: false,
        }
    }
}

/// Trait for the outbound email collaborator.
///
/// The recovery flow formats messages and hands them here; delivery failure
/// must never roll back code issuance, so callers treat errors as an
/// unconfirmed send rather than an operation failure.
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    /// Sends a message and reports what the transport observed.
    async fn send(&self, message: &MailMessage) -> RecoveryResult<MailReceipt>;
}
