//! Code and token generation.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::normalize::CODE_LENGTH;

/// Number of random bytes in a reset token (128 bits).
const RESET_TOKEN_BYTES: usize = 16;

/// Generates verification codes and reset tokens.
///
/// Codes and tokens guard password reset, so both are drawn from the
/// operating-system RNG rather than a general-purpose generator.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator producing codes of the given length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Returns the configured code length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates a new code: a random integer in `[0, 10^length)` rendered
    /// left-zero-padded to exactly `length` ASCII digits.
    pub fn generate(&self) -> String {
        let bound = 10u64.pow(self.length as u32);
        let value = OsRng.gen_range(0..bound);
        format!("{:0width$}", value, width = self.length)
    }

    /// Generates an opaque reset token: 16 random bytes hex-encoded to
    /// 32 characters.
    pub fn reset_token() -> String {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        let generator = CodeGenerator::default();
        for _ in 0..50 {
            let code = generator.generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let generator = CodeGenerator::default();
        let codes: HashSet<String> = (0..100).map(|_| generator.generate()).collect();
        assert!(codes.len() > 90);
    }

    #[test]
    fn test_reset_token_shape() {
        let token = CodeGenerator::reset_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_reset_tokens_unique() {
        let a = CodeGenerator::reset_token();
        let b = CodeGenerator::reset_token();
        assert_ne!(a, b);
    }
}
