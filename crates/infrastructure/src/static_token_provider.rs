use async_trait::async_trait;
use scopefinder_application::{AccessToken, AccessTokenProvider};
use scopefinder_core::{AppResult, NonEmptyString};

/// Fixed bearer token, for local development against a pre-issued token.
pub struct StaticTokenProvider {
    token: NonEmptyString,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            token: NonEmptyString::new(token)?,
        })
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> AppResult<AccessToken> {
        Ok(AccessToken::new(self.token.as_str(), None))
    }

    fn strategy_name(&self) -> &'static str {
        "static_token"
    }
}
