pub mod health;
pub mod resolve;
pub mod search;

use axum::extract::rejection::JsonRejection;
use scopefinder_core::AppError;

/// Maps body parsing failures to validation errors so they answer 400.
fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::Validation(format!("invalid request body: {}", rejection.body_text()))
}

/// Returns the field value when present and not blank.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
