//! Core data types for the account-recovery service.
//!
//! This module defines the canonical `User`, `OtpCredential`, and
//! `ResetToken` records the workflow operates on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The role of a marketplace account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A buyer browsing and ordering produce.
    Buyer,
    /// A farmer listing produce for sale.
    Farmer,
}

impl Role {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Farmer => "farmer",
        }
    }
}

/// Represents a marketplace account.
///
/// Users are created by the registration flow (out of scope here); this
/// subsystem reads them for lookup and overwrites `password_hash` when a
/// reset completes. The hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique numeric identifier.
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Bcrypt hash of the password. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role.
    pub role: Role,

    /// Whether the email address has been verified.
    #[serde(default)]
    pub verified: bool,

    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user record.
    pub fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Represents one issued one-time code.
///
/// At most one usable credential exists per user at any time; issuance
/// deletes every prior row for the user before inserting. The `consumed`
/// flag transitions false to true exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpCredential {
    /// Unique identifier for this credential row.
    pub id: String,

    /// The ID of the user this code was issued to.
    pub user_id: i64,

    /// The normalized 6-digit code.
    pub code: String,

    /// When this code expires.
    pub expires_at: DateTime<Utc>,

    /// Whether this code has been consumed by a successful verification.
    #[serde(default)]
    pub consumed: bool,

    /// Timestamp when the code was issued.
    pub created_at: DateTime<Utc>,
}

impl OtpCredential {
    /// Creates a new credential expiring `ttl` from now.
    pub fn new(user_id: i64, code: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            code: code.into(),
            expires_at: now + ttl,
            consumed: false,
            created_at: now,
        }
    }

    /// Checks if the code is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the code is still usable (unconsumed and unexpired).
    pub fn is_usable(&self) -> bool {
        !self.consumed && !self.is_expired()
    }
}

/// Represents a short-lived capability to set a new password.
///
/// Minted after a successful code verification, redeemable at most once
/// and only before expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    /// Unique identifier for this token row.
    pub id: String,

    /// The ID of the user this token belongs to.
    pub user_id: i64,

    /// The opaque token value (32 hex characters).
    pub token: String,

    /// When this token expires.
    pub expires_at: DateTime<Utc>,

    /// Whether this token has been redeemed.
    #[serde(default)]
    pub used: bool,

    /// Timestamp when the token was minted.
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Creates a new token expiring `ttl` from now.
    pub fn new(user_id: i64, token: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            token: token.into(),
            expires_at: now + ttl,
            used: false,
            created_at: now,
        }
    }

    /// Checks if the token is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new(1, "alice", "alice@example.com", "$2b$12$hash", Role::Farmer);
        assert_eq!(user.id, 1);
        assert_eq!(user.role.as_str(), "farmer");
        assert!(!user.verified);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(1, "alice", "alice@example.com", "$2b$12$hash", Role::Buyer);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_credential_lifecycle() {
        let cred = OtpCredential::new(1, "042317", Duration::minutes(10));
        assert!(!cred.is_expired());
        assert!(cred.is_usable());

        let stale = OtpCredential::new(1, "042317", Duration::seconds(-1));
        assert!(stale.is_expired());
        assert!(!stale.is_usable());
    }

    #[test]
    fn test_token_expiry() {
        let token = ResetToken::new(1, "ab".repeat(16), Duration::minutes(30));
        assert!(!token.is_expired());

        let stale = ResetToken::new(1, "ab".repeat(16), Duration::seconds(-1));
        assert!(stale.is_expired());
    }
}
