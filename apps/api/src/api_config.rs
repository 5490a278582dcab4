use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use scopefinder_application::DEFAULT_SEARCH_CONCURRENCY;
use scopefinder_core::AppError;
use scopefinder_infrastructure::{DEFAULT_AUTHORITY_HOST, DEFAULT_GRAPH_BASE_URL};
use tracing_subscriber::EnvFilter;

use crate::api_router::RouterOptions;

/// How the service authenticates to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    Auto,
    ManagedIdentity,
    ClientSecret,
    AzureCli,
    StaticToken,
}

impl FromStr for CredentialMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "managed_identity" => Ok(Self::ManagedIdentity),
            "client_secret" => Ok(Self::ClientSecret),
            "azure_cli" => Ok(Self::AzureCli),
            "static_token" => Ok(Self::StaticToken),
            other => Err(AppError::Validation(format!(
                "CREDENTIAL_MODE must be one of 'auto', 'managed_identity', 'client_secret', 'azure_cli', 'static_token', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AzureCredentialConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub authority_host: String,
    pub static_access_token: Option<String>,
    pub identity_endpoint: Option<String>,
    pub identity_header: Option<String>,
}

impl AzureCredentialConfig {
    fn has_client_secret(&self) -> bool {
        self.tenant_id.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub environment: String,
    pub credential_mode: CredentialMode,
    pub credentials: AzureCredentialConfig,
    pub graph_base_url: String,
    pub graph_timeout: Duration,
    pub request_timeout: Duration,
    pub search_concurrency: usize,
    pub static_dir: Option<PathBuf>,
    pub frontend_url: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional("API_PORT")
            .or_else(|| optional("PORT"))
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3000);

        let environment =
            optional("APP_ENVIRONMENT").unwrap_or_else(|| "development".to_owned());
        let credential_mode = optional("CREDENTIAL_MODE")
            .map(|value| CredentialMode::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(CredentialMode::Auto);

        let credentials = AzureCredentialConfig {
            tenant_id: optional("AZURE_TENANT_ID"),
            client_id: optional("AZURE_CLIENT_ID"),
            client_secret: optional("AZURE_CLIENT_SECRET"),
            authority_host: optional("AZURE_AUTHORITY_HOST")
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_owned()),
            static_access_token: optional("AZURE_ACCESS_TOKEN"),
            identity_endpoint: optional("IDENTITY_ENDPOINT"),
            identity_header: optional("IDENTITY_HEADER"),
        };

        let graph_timeout =
            Duration::from_secs(seconds_env(&optional, "GRAPH_TIMEOUT_SECONDS", 30)?);
        let request_timeout =
            Duration::from_secs(seconds_env(&optional, "REQUEST_TIMEOUT_SECONDS", 120)?);
        let search_concurrency = optional("SEARCH_CONCURRENCY")
            .map(|value| {
                value.trim().parse::<usize>().map_err(|error| {
                    AppError::Validation(format!("invalid SEARCH_CONCURRENCY: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SEARCH_CONCURRENCY)
            .max(1);

        Ok(Self {
            api_host,
            api_port,
            environment,
            credential_mode,
            credentials,
            graph_base_url: optional("GRAPH_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_owned()),
            graph_timeout,
            request_timeout,
            search_concurrency,
            static_dir: optional("STATIC_DIR").map(PathBuf::from),
            frontend_url: optional("FRONTEND_URL"),
        })
    }

    /// Picks the concrete strategy for `CREDENTIAL_MODE=auto`.
    pub fn resolved_credential_mode(&self) -> CredentialMode {
        match self.credential_mode {
            CredentialMode::Auto if self.environment.eq_ignore_ascii_case("production") => {
                CredentialMode::ManagedIdentity
            }
            CredentialMode::Auto if self.credentials.has_client_secret() => {
                CredentialMode::ClientSecret
            }
            CredentialMode::Auto => CredentialMode::AzureCli,
            explicit => explicit,
        }
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            frontend_url: self.frontend_url.clone(),
            static_dir: self.static_dir.clone(),
            request_timeout: self.request_timeout,
        }
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn seconds_env(
    optional: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, AppError> {
    let Some(value) = optional(name) else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Validation(format!("{name} must be positive"))),
        Ok(seconds) => Ok(seconds),
        Err(error) => Err(AppError::Validation(format!("invalid {name}: {error}"))),
    }
}
