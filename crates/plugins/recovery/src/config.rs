//! Configuration for the recovery plugin.

/// Password policy applied before a reset is committed.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length.
    pub min_length: usize,
    /// Require uppercase letters.
    pub require_uppercase: bool,
    /// Require lowercase letters.
    pub require_lowercase: bool,
    /// Require numbers.
    pub require_numbers: bool,
    /// Require special characters.
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: false,
            require_lowercase: false,
            require_numbers: false,
            require_special: false,
        }
    }
}

impl PasswordPolicy {
    /// Creates a new policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum password length.
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Requires uppercase letters.
    pub fn require_uppercase(mut self) -> Self {
        self.require_uppercase = true;
        self
    }

    /// Requires lowercase letters.
    pub fn require_lowercase(mut self) -> Self {
        self.require_lowercase = true;
        self
    }

    /// Requires numbers.
    pub fn require_numbers(mut self) -> Self {
        self.require_numbers = true;
        self
    }

    /// Requires special characters.
    pub fn require_special(mut self) -> Self {
        self.require_special = true;
        self
    }

    /// Validates a password against the policy.
    pub fn validate(&self, password: &str) -> Result<(), String> {
        if password.len() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err("Password must contain at least one uppercase letter".to_string());
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err("Password must contain at least one lowercase letter".to_string());
        }

        if self.require_numbers && !password.chars().any(|c| c.is_numeric()) {
            return Err("Password must contain at least one number".to_string());
        }

        if self.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err("Password must contain at least one special character".to_string());
        }

        Ok(())
    }
}

/// Configuration for the recovery flow.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Code expiration time in seconds. Default: 600 (10 minutes).
    pub code_ttl_secs: i64,
    /// Reset-token expiration time in seconds. Default: 1800 (30 minutes).
    /// Longer than the code TTL since the user still has to fill in the
    /// password form.
    pub token_ttl_secs: i64,
    /// Bcrypt cost factor for new password hashes.
    pub bcrypt_cost: u32,
    /// Password policy for new passwords.
    pub password: PasswordPolicy,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 600,
            token_ttl_secs: 1800,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            password: PasswordPolicy::default(),
        }
    }
}

impl RecoveryConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code TTL in seconds.
    pub fn code_ttl_secs(mut self, secs: i64) -> Self {
        self.code_ttl_secs = secs;
        self
    }

    /// Sets the reset-token TTL in seconds.
    pub fn token_ttl_secs(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// Sets the bcrypt cost factor.
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Sets the password policy.
    pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_validation() {
        let policy = PasswordPolicy::new()
            .min_length(8)
            .require_uppercase()
            .require_numbers();

        assert!(policy.validate("Short1").is_err());
        assert!(policy.validate("longenough1").is_err());
        assert!(policy.validate("LongEnough").is_err());
        assert!(policy.validate("LongEnough1").is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.code_ttl_secs, 600);
        assert_eq!(config.token_ttl_secs, 1800);
        assert!(config.token_ttl_secs > config.code_ttl_secs);
    }
}
