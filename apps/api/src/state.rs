use scopefinder_application::{AccessPackageSearchService, DirectoryResolverService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub search_service: AccessPackageSearchService,
    pub resolver_service: DirectoryResolverService,
    pub environment: String,
}
