//! Application services and ports.

#![forbid(unsafe_code)]

mod access_package_search_service;
mod directory_ports;
mod directory_resolver_service;

#[cfg(test)]
mod test_support;

pub use access_package_search_service::{
    AccessPackageSearchService, DEFAULT_SEARCH_CONCURRENCY, PackageScanFailure, SearchOutcome,
};
pub use directory_ports::{
    AccessToken, AccessTokenProvider, DirectoryClientFactory, DirectoryService,
};
pub use directory_resolver_service::DirectoryResolverService;
