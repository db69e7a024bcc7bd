use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{auth::jwt::TokenError, response::ErrorResponse};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Requested (or referenced parent) row is missing or soft-deleted.
    #[error("not found")]
    NotFound,

    #[error("wrong email or password")]
    WrongCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Validation(String),

    /// Body could not be bound to the request type.
    #[error("{0}")]
    MalformedBody(String),

    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    #[error(transparent)]
    Database(sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::WrongCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unimplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            warn!(error = %self, %status, "request rejected");
            self.to_string()
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn token_errors_are_unauthorized() {
        assert_eq!(
            AppError::from(TokenError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(TokenError::InvalidSignatureMethod).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unmapped_errors_default_to_internal() {
        let err = AppError::from(anyhow::anyhow!("storage exploded"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unimplemented_is_not_a_crash() {
        let err = AppError::Unimplemented("fetch appointment by id");
        assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(err.to_string(), "fetch appointment by id is not implemented");
    }
}
