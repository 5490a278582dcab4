//! Shared primitives for all Rust crates in Scopefinder.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Scopefinder crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    ///
    /// The value is kept as given; surrounding whitespace is not trimmed
    /// because directory identifiers are compared byte for byte.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, surfaced verbatim to the caller.
    #[error("{0}")]
    Validation(String),

    /// Requested directory object does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A directory service call failed in a way that aborts the request.
    #[error("{message}: {details}")]
    Upstream {
        /// Generic description of the failed operation.
        message: String,
        /// Detail reported by the upstream service or transport.
        details: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an upstream error from an operation description and any displayable cause.
    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Upstream {
            message: message.into(),
            details: details.to_string(),
        }
    }
}
