use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use scopefinder_core::AppResult;

/// Bearer token issued for the directory audience.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a token. `expires_at` is `None` for tokens with unknown lifetime.
    #[must_use]
    pub fn new(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// Returns the raw bearer value.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }

    /// Returns the expiry instant, if known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns whether the token is still usable `margin` from `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at
            .is_none_or(|expires_at| expires_at - margin > now)
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Port for credential strategies that yield directory access tokens.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a token valid for the directory audience.
    async fn access_token(&self) -> AppResult<AccessToken>;

    /// Returns a stable label for logs.
    fn strategy_name(&self) -> &'static str;
}
