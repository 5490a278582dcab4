use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use scopefinder_application::{AccessToken, AccessTokenProvider};
use scopefinder_core::AppResult;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECONDS: i64 = 300;

/// Reuses a token from an inner provider until it is close to expiry.
pub struct CachedTokenProvider {
    inner: Arc<dyn AccessTokenProvider>,
    cached: Mutex<Option<AccessToken>>,
}

impl CachedTokenProvider {
    /// Wraps a credential strategy with a token cache.
    #[must_use]
    pub fn new(inner: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for CachedTokenProvider {
    async fn access_token(&self) -> AppResult<AccessToken> {
        // Held across the refresh so concurrent requests share one token call.
        let mut cached = self.cached.lock().await;
        let margin = Duration::seconds(REFRESH_MARGIN_SECONDS);

        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now(), margin)
        {
            return Ok(token.clone());
        }

        let token = self.inner.access_token().await.inspect_err(|error| {
            warn!(
                strategy = self.inner.strategy_name(),
                error = %error,
                "directory access token request failed"
            );
        })?;
        debug!(
            strategy = self.inner.strategy_name(),
            expires_at = ?token.expires_at(),
            "acquired directory access token"
        );
        *cached = Some(token.clone());

        Ok(token)
    }

    fn strategy_name(&self) -> &'static str {
        self.inner.strategy_name()
    }
}
