use crate::domain::order::OrderError;

// ============================================================================
// Service-wide Error Taxonomy
// ============================================================================
//
// Every service trait, repository and reaction returns AppError. The HTTP
// layer maps each variant to a status code (see api::error).
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error("Referenced record does not exist: {0}")]
    ForeignKey(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient role: {0}")]
    Forbidden(String),

    #[error("Realtime transport error: {0}")]
    Transport(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            if db_err.is_unique_violation() {
                return AppError::Duplicate(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return AppError::ForeignKey(constraint);
            }
        }

        AppError::Database(err)
    }
}
