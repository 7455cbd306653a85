//! Server configuration.

use harvest_auth_core::error::{RecoveryError, RecoveryResult};
use serde::{Deserialize, Serialize};

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level.
    pub log_level: String,
    /// Base path for recovery routes.
    pub base_path: String,
    /// SMTP relay settings; the log-only dispatcher is used when absent.
    pub smtp: Option<SmtpSettings>,
    /// Recovery flow tuning.
    pub recovery: RecoverySettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            base_path: "/api/auth".to_string(),
            smtp: None,
            recovery: RecoverySettings::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &str) -> RecoveryResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| RecoveryError::config(format!("cannot read {}: {}", path, err)))?;
        toml::from_str(&raw)
            .map_err(|err| RecoveryError::config(format!("cannot parse {}: {}", path, err)))
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    /// Relay host.
    pub host: String,
    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Relay username.
    pub username: String,
    /// Relay password.
    pub password: String,
    /// Sender address.
    pub from: String,
}

fn default_smtp_port() -> u16 {
    465
}

/// Recovery flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Verification code TTL in seconds.
    pub code_ttl_secs: i64,
    /// Reset token TTL in seconds.
    pub token_ttl_secs: i64,
    /// Minimum length for new passwords.
    pub min_password_length: usize,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            code_ttl_secs: 600,
            token_ttl_secs: 1800,
            min_password_length: 8,
        }
    }
}
