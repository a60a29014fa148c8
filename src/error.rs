use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum AtelierError {
    #[error("DATABASE_URL is not configured; set it to the store's connection string")]
    MissingDatabaseUrl,

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl AtelierError {
    /// Whether the underlying database failure is a constraint violation
    /// (duplicate unique key, foreign key). Routes that treat "insert
    /// failed" as "probably already exists" branch on this.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AtelierError::Database(SqlxError::Database(db)) if db.constraint().is_some() || db.is_unique_violation() || db.is_foreign_key_violation()
        )
    }
}

impl IntoResponse for AtelierError {
    fn into_response(self) -> Response {
        match self {
            AtelierError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
