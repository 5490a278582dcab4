use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scopefinder_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    details: Option<String>,
}

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
        let (status, payload) = match self.0 {
            AppError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    details: None,
                },
            ),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: message,
                    details: None,
                },
            ),
            AppError::Upstream { message, details } => {
                error!(error = %message, details = %details, "directory request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: message,
                        details: Some(details),
                    },
                )
            }
            AppError::Internal(details) => {
                error!(details = %details, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_owned(),
                        details: Some(details),
                    },
                )
            }
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
