//! Error types for the account-recovery service.
//!
//! This module defines the `RecoveryError` enum which represents all
//! failure states the recovery workflow can surface, from user-correctable
//! code mistakes to store outages.

use thiserror::Error;

/// The main error type for recovery operations.
///
/// Most variants are expected, user-correctable states that map to 4xx
/// responses with a stable error code. Store, migration, and hashing
/// failures are the only 5xx-class conditions.
#[derive(Debug, Error)]
pub enum RecoveryError {
    // ==================== Code Verification Errors ====================
    /// The submitted code does not reduce to exactly six digits.
    #[error("Code must be a 6-digit number")]
    MalformedCode,

    /// No code has been issued for this account.
    #[error("No verification code has been requested for this account")]
    NoCodeIssued,

    /// The submitted code does not match the issued code.
    #[error("Incorrect verification code")]
    CodeMismatch,

    /// The code was already consumed by an earlier verification.
    #[error("This code has already been used")]
    AlreadyUsed,

    /// The code is past its expiry.
    #[error("This code has expired, request a new one")]
    Expired,

    // ==================== Reset Token Errors ====================
    /// The reset token does not exist.
    #[error("Invalid reset token")]
    InvalidToken,

    /// The reset token was already redeemed.
    #[error("This reset token has already been used")]
    TokenAlreadyUsed,

    /// The reset token is past its expiry.
    #[error("This reset token has expired, restart the reset")]
    TokenExpired,

    // ==================== Validation Errors ====================
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The new password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The new password does not meet the configured policy.
    #[error("Password does not meet requirements: {reason}")]
    WeakPassword { reason: String },

    // ==================== Infrastructure Errors ====================
    /// The underlying data store failed or is unreachable.
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The mail dispatcher reported a delivery failure.
    #[error("Email delivery failed: {message}")]
    EmailDeliveryFailed { message: String },

    /// Password hashing failed.
    #[error("Failed to hash password: {reason}")]
    HashingFailed { reason: String },

    /// A schema migration failed.
    #[error("Migration error: {message}")]
    MigrationError { message: String },

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RecoveryError {
    /// Creates a new store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new email delivery error.
    pub fn email(message: impl Into<String>) -> Self {
        Self::EmailDeliveryFailed {
            message: message.into(),
        }
    }

    /// Creates a new weak password error.
    pub fn weak_password(reason: impl Into<String>) -> Self {
        Self::WeakPassword {
            reason: reason.into(),
        }
    }

    /// Creates a new migration error.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::MigrationError {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Returns true if this is a user-correctable error (vs internal).
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::StoreUnavailable { .. }
                | Self::EmailDeliveryFailed { .. }
                | Self::HashingFailed { .. }
                | Self::MigrationError { .. }
                | Self::ConfigurationError { .. }
        )
    }

    /// Returns a stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedCode => "MALFORMED_CODE",
            Self::NoCodeIssued => "NO_CODE_ISSUED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::AlreadyUsed => "CODE_ALREADY_USED",
            Self::Expired => "CODE_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenAlreadyUsed => "TOKEN_ALREADY_USED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::WeakPassword { .. } => "WEAK_PASSWORD",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::EmailDeliveryFailed { .. } => "EMAIL_DELIVERY_FAILED",
            Self::HashingFailed { .. } => "HASHING_FAILED",
            Self::MigrationError { .. } => "MIGRATION_ERROR",
            Self::ConfigurationError { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::CodeMismatch
            | Self::AlreadyUsed
            | Self::Expired
            | Self::InvalidToken
            | Self::TokenAlreadyUsed
            | Self::TokenExpired => 401,
            Self::NoCodeIssued => 404,
            Self::MalformedCode
            | Self::MissingField { .. }
            | Self::PasswordMismatch
            | Self::WeakPassword { .. } => 422,
            Self::StoreUnavailable { .. }
            | Self::EmailDeliveryFailed { .. }
            | Self::HashingFailed { .. }
            | Self::MigrationError { .. }
            | Self::ConfigurationError { .. } => 500,
        }
    }
}

/// A Result type alias using RecoveryError.
pub type RecoveryResult<T> = Result<T, RecoveryError>;

impl From<serde_json::Error> for RecoveryError {
    fn from(err: serde_json::Error) -> Self {
        Self::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecoveryError::CodeMismatch;
        assert_eq!(err.to_string(), "Incorrect verification code");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RecoveryError::CodeMismatch.status_code(), 401);
        assert_eq!(RecoveryError::NoCodeIssued.status_code(), 404);
        assert_eq!(RecoveryError::MalformedCode.status_code(), 422);
        assert_eq!(RecoveryError::store("down").status_code(), 500);
    }

    #[test]
    fn test_is_user_error() {
        assert!(RecoveryError::AlreadyUsed.is_user_error());
        assert!(RecoveryError::PasswordMismatch.is_user_error());
        assert!(!RecoveryError::store("connection refused").is_user_error());
        assert!(!RecoveryError::email("relay timeout").is_user_error());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(RecoveryError::AlreadyUsed.error_code(), "CODE_ALREADY_USED");
        assert_eq!(
            RecoveryError::TokenAlreadyUsed.error_code(),
            "TOKEN_ALREADY_USED"
        );
    }
}
