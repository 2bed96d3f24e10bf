use thiserror::Error;

/// Typed error contract for the backing store. Handlers map these kinds to
/// localized messages instead of pattern-matching backend strings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("record not found")]
    NotFound,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(sqlx::Error),
}

// SQLSTATE classes carried by Postgres constraint failures.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => {
                let constraint = db.constraint().unwrap_or_default().to_string();
                match db.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => StoreError::DuplicateKey(constraint),
                    Some(FOREIGN_KEY_VIOLATION) => StoreError::ForeignKeyViolation(constraint),
                    _ => StoreError::Query(err),
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err),
        }
    }
}

impl StoreError {
    /// True when retrying the same write cannot succeed without user changes.
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_) | StoreError::ForeignKeyViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound));
        assert!(!err.is_constraint());
    }

    #[test]
    fn constraint_kinds_are_flagged() {
        assert!(StoreError::DuplicateKey("uq_brands_name".into()).is_constraint());
        assert!(StoreError::ForeignKeyViolation("fk_car_models_brand".into()).is_constraint());
        assert!(!StoreError::NotFound.is_constraint());
    }
}
