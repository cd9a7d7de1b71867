//! Mapping of SQLx errors onto [`StoreError`].

use crate::domain::repositories::StoreError;

/// Name of the unique constraint on `links.slug`.
pub const SLUG_UNIQUE_CONSTRAINT: &str = "links_slug_key";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && db_err.is_unique_violation()
        {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().unwrap_or_default().to_string(),
            };
        }

        StoreError::Unavailable(e.to_string())
    }
}

/// Returns true when `e` is a uniqueness violation on the slug index.
pub fn is_unique_violation_on_slug(e: &StoreError) -> bool {
    matches!(
        e,
        StoreError::UniqueViolation { constraint } if constraint == SLUG_UNIQUE_CONSTRAINT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_row_not_found_is_unavailable() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(!is_unique_violation_on_slug(&err));
    }

    #[test]
    fn test_detects_slug_violation() {
        let err = StoreError::UniqueViolation {
            constraint: SLUG_UNIQUE_CONSTRAINT.to_string(),
        };
        assert!(is_unique_violation_on_slug(&err));

        let other = StoreError::UniqueViolation {
            constraint: "links_pkey".to_string(),
        };
        assert!(!is_unique_violation_on_slug(&other));
    }
}
