use std::sync::Arc;

use async_trait::async_trait;
use scopefinder_core::AppResult;
use scopefinder_domain::{AccessPackage, AccessPackageSummary, ApplicationRef, GroupRef};

/// Port for the identity governance directory (Microsoft Graph in production).
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Lists every access package with the `id,displayName` projection only.
    async fn list_access_packages(&self) -> AppResult<Vec<AccessPackageSummary>>;

    /// Fetches one access package with resource role scopes, roles and scopes expanded.
    async fn get_access_package(&self, access_package_id: &str) -> AppResult<AccessPackage>;

    /// Lists groups whose display name equals `display_name` exactly.
    async fn find_groups_by_display_name(&self, display_name: &str) -> AppResult<Vec<GroupRef>>;

    /// Lists service principals whose display name starts with `prefix`.
    async fn find_service_principals_by_prefix(
        &self,
        prefix: &str,
    ) -> AppResult<Vec<ApplicationRef>>;
}

/// Produces an authenticated directory client for the duration of one request.
///
/// The credential strategy is chosen once when the factory is built.
#[async_trait]
pub trait DirectoryClientFactory: Send + Sync {
    /// Returns a directory client bound to a valid credential.
    async fn connect(&self) -> AppResult<Arc<dyn DirectoryService>>;
}
