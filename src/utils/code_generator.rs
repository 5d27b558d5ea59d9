//! Short code generation.
//!
//! Codes are drawn uniformly from the 62-symbol alphabet `[0-9A-Za-z]`. At the
//! default length of 7 there are 62^7 (about 3.5 * 10^12) codes, so collisions
//! are rare but possible; callers must still handle a duplicate-key insert.

use rand::{Rng, distr::Alphanumeric};

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Produces short, URL-safe identifiers.
///
/// Implementations are pure generators that don't interact with storage.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Generates a candidate code. Uniqueness is not guaranteed.
    fn generate(&self) -> String;
}

/// Random fixed-length alphanumeric codes from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct AlphanumericGenerator {
    length: usize,
}

impl AlphanumericGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for AlphanumericGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for AlphanumericGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
