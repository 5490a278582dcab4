use async_trait::async_trait;
use scopefinder_application::{AccessToken, AccessTokenProvider};
use scopefinder_core::{AppError, AppResult};
use url::Url;

use crate::oauth_token_response::read_token_response;

/// Resource requested from managed identity endpoints.
pub const GRAPH_RESOURCE: &str = "https://graph.microsoft.com";

const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";

/// Where the hosting platform exposes its identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedIdentityEndpoint {
    /// App Service / Functions endpoint from `IDENTITY_ENDPOINT` and `IDENTITY_HEADER`.
    AppService {
        /// Local token endpoint.
        endpoint: Url,
        /// Secret sent as `X-IDENTITY-HEADER`.
        header: String,
    },
    /// Azure Instance Metadata Service.
    Imds,
}

impl ManagedIdentityEndpoint {
    /// Detects the endpoint from the App Service variables, falling back to IMDS.
    pub fn detect(
        identity_endpoint: Option<String>,
        identity_header: Option<String>,
    ) -> AppResult<Self> {
        match (identity_endpoint, identity_header) {
            (Some(endpoint), Some(header))
                if !endpoint.trim().is_empty() && !header.trim().is_empty() =>
            {
                let endpoint = Url::parse(endpoint.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid IDENTITY_ENDPOINT: {error}"))
                })?;
                Ok(Self::AppService { endpoint, header })
            }
            _ => Ok(Self::Imds),
        }
    }
}

/// Token acquisition through the platform managed identity.
pub struct ManagedIdentityTokenProvider {
    http_client: reqwest::Client,
    endpoint: ManagedIdentityEndpoint,
    client_id: Option<String>,
}

impl ManagedIdentityTokenProvider {
    /// Creates a provider. `client_id` selects a user-assigned identity.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        endpoint: ManagedIdentityEndpoint,
        client_id: Option<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint,
            client_id: client_id.filter(|value| !value.trim().is_empty()),
        }
    }

    fn token_request(&self) -> reqwest::RequestBuilder {
        let mut query = vec![("resource", GRAPH_RESOURCE)];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        match &self.endpoint {
            ManagedIdentityEndpoint::AppService { endpoint, header } => {
                query.push(("api-version", APP_SERVICE_API_VERSION));
                self.http_client
                    .get(endpoint.clone())
                    .header("X-IDENTITY-HEADER", header.as_str())
                    .query(&query)
            }
            ManagedIdentityEndpoint::Imds => {
                query.push(("api-version", IMDS_API_VERSION));
                self.http_client
                    .get(IMDS_TOKEN_ENDPOINT)
                    .header("Metadata", "true")
                    .query(&query)
            }
        }
    }
}

#[async_trait]
impl AccessTokenProvider for ManagedIdentityTokenProvider {
    async fn access_token(&self) -> AppResult<AccessToken> {
        let operation = "Failed to acquire managed identity token";
        let response = self
            .token_request()
            .send()
            .await
            .map_err(|error| AppError::upstream(operation, error))?;

        read_token_response(response, operation).await
    }

    fn strategy_name(&self) -> &'static str {
        "managed_identity"
    }
}
