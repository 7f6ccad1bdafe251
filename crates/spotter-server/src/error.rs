use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("You can't add yourself as a friend")]
    SelfReference,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a store-level unique violation to `AlreadyExists`. A concurrent
    /// duplicate can slip past a handler's pre-check and land on the
    /// constraint instead; the caller still sees the same error either way.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => AppError::AlreadyExists(message.to_string()),
            _ => AppError::Database(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::SelfReference | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DanglingReference(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::DanglingReference(msg) => {
                tracing::error!("Data integrity violation: {}", msg);
                "Data integrity error".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_errors_map_to_client_status_codes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::AlreadyExists("friendship".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::SelfReference.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation("bad username".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn racing_duplicate_insert_surfaces_as_conflict() {
        let err = sqlx::Error::Database(Box::new(UniqueViolation));
        let mapped = AppError::conflict_on_unique(err, "Username already taken");
        assert!(matches!(mapped, AppError::AlreadyExists(_)));
        assert_eq!(mapped.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_store_errors_stay_database_errors() {
        let mapped = AppError::conflict_on_unique(sqlx::Error::RowNotFound, "unused");
        assert!(matches!(mapped, AppError::Database(_)));
    }

    #[test]
    fn integrity_and_store_errors_are_internal() {
        assert_eq!(
            AppError::DanglingReference("friend stats missing".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
