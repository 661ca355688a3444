use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seatrelay_core::AppError;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            error @ (AppError::Upstream { .. } | AppError::Internal(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("error managing license: {error}"),
            ),
        };

        (status, message).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
