//! Token endpoint payloads shared by the HTTP credential strategies.

use chrono::{DateTime, Duration, Utc};
use reqwest::Response;
use scopefinder_application::AccessToken;
use scopefinder_core::{AppError, AppResult};
use serde::Deserialize;

/// Numeric fields arrive as JSON numbers from Entra ID and as strings from managed identity endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(i64),
    Text(String),
}

impl Seconds {
    fn value(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
    access_token: String,
    expires_in: Option<Seconds>,
    expires_on: Option<Seconds>,
}

impl TokenEndpointResponse {
    /// Converts the payload, preferring the absolute `expires_on` instant.
    pub(crate) fn into_access_token(self, received_at: DateTime<Utc>) -> AccessToken {
        let expires_at = self
            .expires_on
            .as_ref()
            .and_then(Seconds::value)
            .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0))
            .or_else(|| {
                self.expires_in
                    .as_ref()
                    .and_then(Seconds::value)
                    .map(|seconds| received_at + Duration::seconds(seconds))
            });

        AccessToken::new(self.access_token, expires_at)
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
}

/// Reads a token endpoint response, mapping failures to upstream errors.
pub(crate) async fn read_token_response(
    response: Response,
    operation: &str,
) -> AppResult<AccessToken> {
    let received_at = Utc::now();
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|error| AppError::upstream(operation, error))?;

    if !status.is_success() {
        return Err(AppError::upstream(
            operation,
            describe_token_error(status.as_u16(), body.as_str()),
        ));
    }

    serde_json::from_str::<TokenEndpointResponse>(body.as_str())
        .map(|payload| payload.into_access_token(received_at))
        .map_err(|error| AppError::upstream(operation, format!("invalid token response: {error}")))
}

fn describe_token_error(status: u16, body: &str) -> String {
    let Ok(payload) = serde_json::from_str::<TokenErrorResponse>(body) else {
        return format!("HTTP {status}");
    };

    match (payload.error, payload.error_description.or(payload.message)) {
        (Some(code), Some(description)) => format!("HTTP {status} {code}: {description}"),
        (Some(code), None) => format!("HTTP {status} {code}"),
        (None, Some(description)) => format!("HTTP {status}: {description}"),
        (None, None) => format!("HTTP {status}"),
    }
}
