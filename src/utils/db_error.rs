//! Translation of `sqlx` errors into store errors.

use crate::domain::error::{DuplicateField, StoreError};

const CODE_CONSTRAINT: &str = "urls_code_key";
const LONG_URL_CONSTRAINT: &str = "urls_long_url_key";

/// Returns which unique constraint `e` violated, if it is a unique violation
/// on the `urls` table.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<DuplicateField> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(CODE_CONSTRAINT) => Some(DuplicateField::Code),
        Some(LONG_URL_CONSTRAINT) => Some(DuplicateField::LongUrl),
        _ => None,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match unique_violation_field(&e) {
            Some(field) => StoreError::DuplicateKey(field),
            None => StoreError::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_is_not_a_duplicate() {
        assert_eq!(unique_violation_field(&sqlx::Error::RowNotFound), None);
    }
}
