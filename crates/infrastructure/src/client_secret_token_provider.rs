use async_trait::async_trait;
use scopefinder_application::{AccessToken, AccessTokenProvider};
use scopefinder_core::{AppError, AppResult};

use crate::oauth_token_response::read_token_response;

/// Default Entra ID authority host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Scope requested for Microsoft Graph application permissions.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// App registration credentials for the OAuth2 client credentials grant.
#[derive(Clone)]
pub struct ClientSecretConfig {
    /// Directory (tenant) id.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret value.
    pub client_secret: String,
    /// Authority host, normally [`DEFAULT_AUTHORITY_HOST`].
    pub authority_host: String,
}

/// Client credentials grant against the Entra ID token endpoint.
pub struct ClientSecretTokenProvider {
    http_client: reqwest::Client,
    config: ClientSecretConfig,
}

impl ClientSecretTokenProvider {
    /// Creates a provider. Tenant, client id and secret must be non-empty.
    pub fn new(http_client: reqwest::Client, config: ClientSecretConfig) -> AppResult<Self> {
        for (name, value) in [
            ("AZURE_TENANT_ID", &config.tenant_id),
            ("AZURE_CLIENT_ID", &config.client_id),
            ("AZURE_CLIENT_SECRET", &config.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} must not be empty")));
            }
        }

        Ok(Self {
            http_client,
            config,
        })
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_host.trim_end_matches('/'),
            self.config.tenant_id
        )
    }
}

#[async_trait]
impl AccessTokenProvider for ClientSecretTokenProvider {
    async fn access_token(&self) -> AppResult<AccessToken> {
        let operation = "Failed to acquire client credentials token";
        let response = self
            .http_client
            .post(self.token_endpoint())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", GRAPH_DEFAULT_SCOPE),
            ])
            .send()
            .await
            .map_err(|error| AppError::upstream(operation, error))?;

        read_token_response(response, operation).await
    }

    fn strategy_name(&self) -> &'static str {
        "client_secret"
    }
}
