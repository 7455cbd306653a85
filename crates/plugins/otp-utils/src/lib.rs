//! # Harvest Auth OTP Utilities
//!
//! Shared one-time-code utilities for the recovery flow:
//! - code generation from a cryptographically secure source
//! - reset-token minting
//! - normalization of user-submitted codes
//!
//! Generation and verification must agree on one canonical code form, so
//! both go through [`normalize_code`] before storage or comparison.

mod generator;
mod normalize;

pub use generator::CodeGenerator;
pub use normalize::{normalize_code, CODE_LENGTH};
