//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod azure_cli_token_provider;
mod cached_token_provider;
mod client_secret_token_provider;
mod graph_directory_service;
mod in_memory_directory;
mod managed_identity_token_provider;
mod oauth_token_response;
mod static_token_provider;

pub use azure_cli_token_provider::AzureCliTokenProvider;
pub use cached_token_provider::CachedTokenProvider;
pub use client_secret_token_provider::{
    ClientSecretConfig, ClientSecretTokenProvider, DEFAULT_AUTHORITY_HOST, GRAPH_DEFAULT_SCOPE,
};
pub use graph_directory_service::{
    DEFAULT_GRAPH_BASE_URL, GraphDirectoryClientFactory, GraphDirectoryService,
};
pub use in_memory_directory::InMemoryDirectory;
pub use managed_identity_token_provider::{
    GRAPH_RESOURCE, ManagedIdentityEndpoint, ManagedIdentityTokenProvider,
};
pub use static_token_provider::StaticTokenProvider;
