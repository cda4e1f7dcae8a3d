use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::types::api::ErrorBody;

pub type AppResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("no paste body provided")]
    EmptyInput,
    #[error("paste body must be plain text")]
    WrongType,
    #[error("paste body contains non-printable or non-ASCII bytes")]
    NonPlainText,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("not found")]
    NotFound,
    #[error("key already taken")]
    Conflict,
    #[error("could not find a free key after {attempts} attempts")]
    KeySpaceExhausted { attempts: u32 },
    #[error("database error")]
    Store { source: sqlx::Error },
}

impl ApiError {
    /// Infrastructure failures, as opposed to client-caused rejections.
    /// These are the ones reported to the notifier.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Conflict | ApiError::KeySpaceExhausted { .. } | ApiError::Store { .. }
        )
    }

    /// Operator-facing detail line, including the underlying source if any.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Store { source } => source.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::EmptyInput => StatusCode::BAD_REQUEST,
            ApiError::WrongType => StatusCode::BAD_REQUEST,
            ApiError::NonPlainText => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::KeySpaceExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let details = match &self {
            ApiError::Store { source } => Some(source.to_string()),
            _ => None,
        };

        (
            status_code,
            Json(ErrorBody {
                error: self.to_string(),
                details,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(err) if is_unique_violation(err.as_ref()) => ApiError::Conflict,
            source => ApiError::Store { source },
        }
    }
}

/// SQLSTATE 23505 on Postgres; SQLite reports the primary-key and unique
/// extended result codes.
fn is_unique_violation(err: &dyn sqlx::error::DatabaseError) -> bool {
    matches!(err.code().as_deref(), Some("23505" | "1555" | "2067"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(status_of(ApiError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::WrongType), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::NonPlainText), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limit_is_429() {
        assert_eq!(
            status_of(ApiError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn missing_paste_is_404_not_500() {
        assert_eq!(status_of(ApiError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_are_internal() {
        let err = ApiError::Store {
            source: sqlx::Error::PoolClosed,
        };
        assert!(err.is_internal());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_are_not_reported() {
        assert!(!ApiError::EmptyInput.is_internal());
        assert!(!ApiError::RateLimited.is_internal());
        assert!(!ApiError::NotFound.is_internal());
    }
}
