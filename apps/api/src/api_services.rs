use std::sync::Arc;

use scopefinder_application::{
    AccessPackageSearchService, AccessTokenProvider, DirectoryClientFactory,
    DirectoryResolverService,
};
use scopefinder_core::AppError;
use scopefinder_infrastructure::{
    AzureCliTokenProvider, CachedTokenProvider, ClientSecretConfig, ClientSecretTokenProvider,
    GraphDirectoryClientFactory, ManagedIdentityEndpoint, ManagedIdentityTokenProvider,
    StaticTokenProvider,
};
use tracing::info;

use crate::api_config::{ApiConfig, CredentialMode};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(config.graph_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let token_provider = build_token_provider(config, http_client.clone())?;
    info!(
        environment = %config.environment,
        credential_strategy = token_provider.strategy_name(),
        "directory credential strategy selected"
    );

    let directory_factory: Arc<dyn DirectoryClientFactory> = Arc::new(
        GraphDirectoryClientFactory::new(
            http_client,
            config.graph_base_url.as_str(),
            Arc::new(CachedTokenProvider::new(token_provider)),
        )?,
    );

    Ok(AppState {
        search_service: AccessPackageSearchService::new(
            directory_factory.clone(),
            config.search_concurrency,
        ),
        resolver_service: DirectoryResolverService::new(directory_factory),
        environment: config.environment.clone(),
    })
}

fn build_token_provider(
    config: &ApiConfig,
    http_client: reqwest::Client,
) -> Result<Arc<dyn AccessTokenProvider>, AppError> {
    let credentials = &config.credentials;

    match config.resolved_credential_mode() {
        CredentialMode::ManagedIdentity => {
            let endpoint = ManagedIdentityEndpoint::detect(
                credentials.identity_endpoint.clone(),
                credentials.identity_header.clone(),
            )?;
            Ok(Arc::new(ManagedIdentityTokenProvider::new(
                http_client,
                endpoint,
                credentials.client_id.clone(),
            )))
        }
        CredentialMode::ClientSecret => {
            let config = ClientSecretConfig {
                tenant_id: required(&credentials.tenant_id, "AZURE_TENANT_ID")?,
                client_id: required(&credentials.client_id, "AZURE_CLIENT_ID")?,
                client_secret: required(&credentials.client_secret, "AZURE_CLIENT_SECRET")?,
                authority_host: credentials.authority_host.clone(),
            };
            Ok(Arc::new(ClientSecretTokenProvider::new(http_client, config)?))
        }
        CredentialMode::AzureCli => Ok(Arc::new(AzureCliTokenProvider::new(
            credentials.tenant_id.clone(),
        ))),
        CredentialMode::StaticToken => Ok(Arc::new(StaticTokenProvider::new(required(
            &credentials.static_access_token,
            "AZURE_ACCESS_TOKEN",
        )?)?)),
        CredentialMode::Auto => Err(AppError::Internal(
            "credential mode was not resolved".to_owned(),
        )),
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, AppError> {
    value
        .clone()
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
