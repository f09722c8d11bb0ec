use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        if self.is_validation() || matches!(self, AppError::RateLimited | AppError::NotFound) {
            tracing::debug!(error = %self, "Request rejected");
        } else {
            tracing::error!(error = ?self, "Request failed");
        }

        let message = self.to_string();
        match self {
            AppError::InvalidEmail => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidEmail, &message)
            }
            AppError::InvalidRole => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidRole, &message)
            }
            AppError::EmptyField(_) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::EmptyField, &message)
            }
            AppError::DuplicateEmail => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::DuplicateEmail, &message)
            }
            AppError::RateLimited => {
                error_resp(StatusCode::TOO_MANY_REQUESTS, ErrorCode::RateLimited, &message)
            }
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, &message),
            AppError::Database(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database error",
            ),
            AppError::Notifier(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::NotifierError,
                "Internal server error",
            ),
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Internal server error",
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message, "code": code.as_str() });
    (status, Json(body)).into_response()
}
