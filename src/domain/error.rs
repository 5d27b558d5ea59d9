//! Failures reported by the durable record store.

use std::fmt;
use thiserror::Error;

/// Which uniqueness constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Code,
    LongUrl,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Code => f.write_str("code"),
            DuplicateField::LongUrl => f.write_str("long_url"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert collided with an existing record. Callers regenerate the code
    /// (for [`DuplicateField::Code`]) or re-read the winner (for
    /// [`DuplicateField::LongUrl`]); it is not a fatal error by itself.
    #[error("duplicate key on {0}")]
    DuplicateKey(DuplicateField),
    #[error("durable store unavailable: {0}")]
    Unavailable(String),
}
