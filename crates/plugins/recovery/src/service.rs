//! The recovery workflow: code issuance, verification, token minting, and
//! the password committer.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use harvest_auth_core::error::{RecoveryError, RecoveryResult};
use harvest_auth_core::traits::{MailDispatcher, RecoveryStore};
use harvest_auth_core::types::{OtpCredential, ResetToken};
use harvest_auth_otp_utils::{normalize_code, CodeGenerator};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RecoveryConfig;
use crate::email::verification_code_message;

/// Receipt returned by `request_code` and `resend_code`.
///
/// The shape is identical whether or not the account exists, so responses
/// cannot be used to probe for accounts. Only a real dispatch failure
/// reports unconfirmed delivery.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequestReceipt {
    /// Always true: the request was accepted.
    pub accepted: bool,
    /// Whether the mail provider positively acknowledged the message.
    pub delivery_confirmed: bool,
}

/// A freshly minted reset token, returned by a successful verification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedResetToken {
    /// The opaque token to present when setting the new password.
    pub reset_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}

/// A password-reset submission.
#[derive(Debug, Clone)]
pub struct TokenRedemption {
    /// The reset token from `verify_code`.
    pub token: String,
    /// The new password.
    pub new_password: String,
    /// The confirmation copy of the new password.
    pub confirm_password: String,
}

/// The account-recovery service.
///
/// Every operation is a bounded request/response call; state lives in the
/// store and all inputs arrive as explicit parameters.
pub struct RecoveryService {
    store: Arc<dyn RecoveryStore>,
    mailer: Arc<dyn MailDispatcher>,
    config: RecoveryConfig,
    generator: CodeGenerator,
}

impl RecoveryService {
    /// Creates a new recovery service.
    pub fn new(
        store: Arc<dyn RecoveryStore>,
        mailer: Arc<dyn MailDispatcher>,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            config,
            generator: CodeGenerator::default(),
        }
    }

    /// Gets the service configuration.
    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Issues a fresh verification code for the account matching `email`
    /// and `username`, replacing any outstanding code, and mails it.
    ///
    /// Unknown accounts still produce a success-shaped receipt. Delivery
    /// failure never rolls back issuance; the user can retry via resend.
    pub async fn request_code(
        &self,
        email: &str,
        username: &str,
    ) -> RecoveryResult<CodeRequestReceipt> {
        let email = email.trim();
        let username = username.trim();
        if email.is_empty() {
            return Err(RecoveryError::MissingField {
                field: "email".to_string(),
            });
        }
        if username.is_empty() {
            return Err(RecoveryError::MissingField {
                field: "username".to_string(),
            });
        }

        let Some(user) = self.store.find_user_by_login(email, username).await? else {
            debug!("code requested for unknown account");
            return Ok(CodeRequestReceipt {
                accepted: true,
                delivery_confirmed: true,
            });
        };

        let code = self.generator.generate();
        // Storage and comparison must share one canonical form, so the
        // fresh code goes through the same normalizer as submissions.
        let normalized = normalize_code(&code)?;
        let credential = OtpCredential::new(
            user.id,
            normalized,
            Duration::seconds(self.config.code_ttl_secs),
        );
        self.store.replace_credential(&credential).await?;
        info!(user_id = user.id, "verification code issued");

        let message =
            verification_code_message(&user.email, &user.username, &code, self.config.code_ttl_secs);
        let delivery_confirmed = match self.mailer.send(&message).await {
            Ok(receipt) => receipt.provider_confirmed,
            Err(err) => {
                warn!(user_id = user.id, error = %err, "verification code email failed");
                false
            }
        };

        Ok(CodeRequestReceipt {
            accepted: true,
            delivery_confirmed,
        })
    }

    /// Re-issues a verification code. Issuance already replaces any
    /// outstanding code, so this is the same operation as `request_code`,
    /// exposed separately for the HTTP layer.
    pub async fn resend_code(
        &self,
        email: &str,
        username: &str,
    ) -> RecoveryResult<CodeRequestReceipt> {
        self.request_code(email, username).await
    }

    /// Verifies a submitted code and, on success, mints a reset token.
    ///
    /// Checks run in a fixed order: shape, existence, match, consumed,
    /// expiry. A replayed code reports `AlreadyUsed` even when it has also
    /// expired, since that is the actionable message for the legitimate
    /// user. The consumed flip is a conditional update, so of two racing
    /// submissions exactly one wins.
    pub async fn verify_code(
        &self,
        user_id: i64,
        submitted: &str,
    ) -> RecoveryResult<IssuedResetToken> {
        let submitted = normalize_code(submitted)?;

        let Some(credential) = self.store.latest_credential(user_id).await? else {
            return Err(RecoveryError::NoCodeIssued);
        };

        if credential.code != submitted {
            debug!(user_id, "code mismatch");
            return Err(RecoveryError::CodeMismatch);
        }
        if credential.consumed {
            return Err(RecoveryError::AlreadyUsed);
        }
        if credential.is_expired() {
            return Err(RecoveryError::Expired);
        }

        if !self.store.consume_credential(&credential.id).await? {
            // Lost the race against a concurrent submission.
            return Err(RecoveryError::AlreadyUsed);
        }

        let token = ResetToken::new(
            user_id,
            CodeGenerator::reset_token(),
            Duration::seconds(self.config.token_ttl_secs),
        );
        self.store.put_reset_token(&token).await?;
        info!(user_id, "code verified, reset token issued");

        Ok(IssuedResetToken {
            reset_token: token.token,
            expires_at: token.expires_at,
        })
    }

    /// Redeems a reset token and overwrites the account's password hash.
    ///
    /// Confirmation and policy checks run before any store access. The
    /// token flip and the hash write are one transaction in the store, so
    /// the token cannot stay usable after the password changes and the
    /// password cannot change without consuming the token.
    pub async fn redeem_token(&self, redemption: TokenRedemption) -> RecoveryResult<()> {
        if redemption.token.trim().is_empty() {
            return Err(RecoveryError::MissingField {
                field: "token".to_string(),
            });
        }
        if redemption.new_password != redemption.confirm_password {
            return Err(RecoveryError::PasswordMismatch);
        }
        self.config
            .password
            .validate(&redemption.new_password)
            .map_err(RecoveryError::weak_password)?;

        let Some(token) = self.store.find_reset_token(redemption.token.trim()).await? else {
            return Err(RecoveryError::InvalidToken);
        };
        if token.used {
            return Err(RecoveryError::TokenAlreadyUsed);
        }
        if token.is_expired() {
            return Err(RecoveryError::TokenExpired);
        }

        let hash = bcrypt::hash(&redemption.new_password, self.config.bcrypt_cost).map_err(
            |err| RecoveryError::HashingFailed {
                reason: err.to_string(),
            },
        )?;

        if !self
            .store
            .commit_password_reset(&token.id, token.user_id, &hash)
            .await?
        {
            return Err(RecoveryError::TokenAlreadyUsed);
        }

        info!(user_id = token.user_id, "password reset completed");
        Ok(())
    }
}
