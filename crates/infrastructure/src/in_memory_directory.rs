use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scopefinder_application::{DirectoryClientFactory, DirectoryService};
use scopefinder_core::{AppError, AppResult};
use scopefinder_domain::{AccessPackage, AccessPackageSummary, ApplicationRef, GroupRef};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct DirectorySnapshot {
    access_packages: Vec<AccessPackage>,
    groups: Vec<GroupRef>,
    service_principals: Vec<ApplicationRef>,
    failing_access_packages: HashSet<String>,
    catalog_unavailable: bool,
    resolvers_unavailable: bool,
    latency: Option<Duration>,
}

/// In-memory directory implementation.
///
/// Clones share the same snapshot, so one handle can seed data while another
/// is handed out as the directory client.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    snapshot: Arc<RwLock<DirectorySnapshot>>,
    connections: Arc<AtomicUsize>,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an access package to the catalog.
    pub async fn add_access_package(&self, access_package: AccessPackage) {
        self.snapshot
            .write()
            .await
            .access_packages
            .push(access_package);
    }

    /// Appends a group.
    pub async fn add_group(&self, group: GroupRef) {
        self.snapshot.write().await.groups.push(group);
    }

    /// Appends a service principal.
    pub async fn add_service_principal(&self, application: ApplicationRef) {
        self.snapshot
            .write()
            .await
            .service_principals
            .push(application);
    }

    /// Makes detail fetches for one access package fail.
    pub async fn fail_access_package(&self, access_package_id: impl Into<String>) {
        self.snapshot
            .write()
            .await
            .failing_access_packages
            .insert(access_package_id.into());
    }

    /// Makes catalog listing fail.
    pub async fn set_catalog_unavailable(&self, unavailable: bool) {
        self.snapshot.write().await.catalog_unavailable = unavailable;
    }

    /// Makes group and service principal queries fail.
    pub async fn set_resolvers_unavailable(&self, unavailable: bool) {
        self.snapshot.write().await.resolvers_unavailable = unavailable;
    }

    /// Delays every directory query by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        self.snapshot.write().await.latency = Some(latency);
    }

    async fn simulate_latency(&self) {
        let latency = self.snapshot.read().await.latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Returns how many clients were handed out.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    async fn list_access_packages(&self) -> AppResult<Vec<AccessPackageSummary>> {
        self.simulate_latency().await;
        let snapshot = self.snapshot.read().await;
        if snapshot.catalog_unavailable {
            return Err(AppError::upstream(
                "Failed to list access packages",
                "directory unavailable",
            ));
        }

        Ok(snapshot
            .access_packages
            .iter()
            .map(|access_package| AccessPackageSummary {
                id: access_package.id().to_owned(),
                display_name: access_package.display_name().to_owned(),
            })
            .collect())
    }

    async fn get_access_package(&self, access_package_id: &str) -> AppResult<AccessPackage> {
        self.simulate_latency().await;
        let snapshot = self.snapshot.read().await;
        if snapshot.failing_access_packages.contains(access_package_id) {
            return Err(AppError::upstream(
                "Failed to fetch access package details",
                format!("access package '{access_package_id}' is unavailable"),
            ));
        }

        snapshot
            .access_packages
            .iter()
            .find(|access_package| access_package.id() == access_package_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("access package '{access_package_id}' not found"))
            })
    }

    async fn find_groups_by_display_name(&self, display_name: &str) -> AppResult<Vec<GroupRef>> {
        self.simulate_latency().await;
        let snapshot = self.snapshot.read().await;
        if snapshot.resolvers_unavailable {
            return Err(AppError::upstream(
                "Failed to resolve group",
                "directory unavailable",
            ));
        }

        Ok(snapshot
            .groups
            .iter()
            .filter(|group| group.display_name == display_name)
            .cloned()
            .collect())
    }

    async fn find_service_principals_by_prefix(
        &self,
        prefix: &str,
    ) -> AppResult<Vec<ApplicationRef>> {
        self.simulate_latency().await;
        let snapshot = self.snapshot.read().await;
        if snapshot.resolvers_unavailable {
            return Err(AppError::upstream(
                "Failed to resolve application",
                "directory unavailable",
            ));
        }

        Ok(snapshot
            .service_principals
            .iter()
            .filter(|application| application.display_name.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DirectoryClientFactory for InMemoryDirectory {
    async fn connect(&self) -> AppResult<Arc<dyn DirectoryService>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.clone()))
    }
}
