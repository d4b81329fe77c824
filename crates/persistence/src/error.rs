//! Persistence error types.

use thiserror::Error;

/// Errors returned by repositories.
///
/// Absence is not an error: lookups return `Option` and state changes return
/// `bool`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
