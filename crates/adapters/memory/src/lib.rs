//! # Harvest Auth Memory Adapter
//!
//! An in-memory [`RecoveryStore`] implementation, primarily intended for
//! testing and development. Data is lost when the process exits.
//!
//! The conditional transitions (`consume_credential`,
//! `commit_password_reset`) each run under a single write-lock
//! acquisition, so racing callers observe the same exactly-once semantics
//! a SQL adapter gets from `UPDATE ... WHERE ... AND consumed = false`.

use async_trait::async_trait;
use chrono::Utc;
use harvest_auth_core::error::{RecoveryError, RecoveryResult};
use harvest_auth_core::schema::ModelDefinition;
use harvest_auth_core::traits::RecoveryStore;
use harvest_auth_core::types::{OtpCredential, ResetToken, User};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for a single entity type.
type Store<T> = Arc<RwLock<HashMap<String, T>>>;

/// In-memory storage adapter for the recovery workflow.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    credentials: Store<OtpCredential>,
    reset_tokens: Store<ResetToken>,
    tables: Arc<RwLock<Vec<String>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user record, for seeding tests and dev environments.
    pub async fn seed_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Returns the stored password hash for a user, if present.
    pub async fn password_hash(&self, user_id: i64) -> Option<String> {
        self.users
            .read()
            .await
            .get(&user_id)
            .map(|u| u.password_hash.clone())
    }

    /// Returns the number of credential rows currently stored.
    pub async fn credential_count(&self) -> usize {
        self.credentials.read().await.len()
    }

    /// Returns the number of reset-token rows currently stored.
    pub async fn reset_token_count(&self) -> usize {
        self.reset_tokens.read().await.len()
    }

    /// Returns the names of the tables `migrate` has been asked to apply.
    pub async fn migrated_tables(&self) -> Vec<String> {
        self.tables.read().await.clone()
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.credentials.write().await.clear();
        self.reset_tokens.write().await.clear();
        self.tables.write().await.clear();
    }
}

#[async_trait]
impl RecoveryStore for MemoryStore {
    // ==================== User Operations ====================

    async fn find_user_by_login(
        &self,
        email: &str,
        username: &str,
    ) -> RecoveryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email && u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> RecoveryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    // ==================== Credential Operations ====================

    async fn replace_credential(&self, credential: &OtpCredential) -> RecoveryResult<()> {
        let mut credentials = self.credentials.write().await;
        credentials.retain(|_, c| c.user_id != credential.user_id);
        credentials.insert(credential.id.clone(), credential.clone());
        Ok(())
    }

    async fn latest_credential(&self, user_id: i64) -> RecoveryResult<Option<OtpCredential>> {
        let credentials = self.credentials.read().await;
        Ok(credentials
            .values()
            .filter(|c| c.user_id == user_id)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn consume_credential(&self, credential_id: &str) -> RecoveryResult<bool> {
        let mut credentials = self.credentials.write().await;
        match credentials.get_mut(credential_id) {
            Some(credential) if !credential.consumed => {
                credential.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // ==================== Reset Token Operations ====================

    async fn put_reset_token(&self, token: &ResetToken) -> RecoveryResult<()> {
        let mut tokens = self.reset_tokens.write().await;
        let now = Utc::now();
        tokens.retain(|_, t| t.user_id != token.user_id || (!t.used && t.expires_at >= now));
        tokens.insert(token.id.clone(), token.clone());
        Ok(())
    }

    async fn find_reset_token(&self, token: &str) -> RecoveryResult<Option<ResetToken>> {
        let tokens = self.reset_tokens.read().await;
        Ok(tokens.values().find(|t| t.token == token).cloned())
    }

    async fn commit_password_reset(
        &self,
        token_id: &str,
        user_id: i64,
        password_hash: &str,
    ) -> RecoveryResult<bool> {
        // Token flip and password write share one write lock: neither can
        // land without the other, matching a SQL transaction.
        let mut tokens = self.reset_tokens.write().await;
        let mut users = self.users.write().await;

        let flipped = match tokens.get_mut(token_id) {
            Some(token) if !token.used => {
                token.used = true;
                true
            }
            _ => false,
        };
        if !flipped {
            return Ok(false);
        }

        let user = users.get_mut(&user_id).ok_or_else(|| {
            RecoveryError::store(format!("user {} missing for reset token", user_id))
        })?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(true)
    }

    // ==================== Schema Operations ====================

    async fn migrate(&self, models: &[ModelDefinition]) -> RecoveryResult<()> {
        let mut tables = self.tables.write().await;
        for model in models {
            if !tables.contains(&model.name) {
                tables.push(model.name.clone());
            }
        }
        Ok(())
    }
}
