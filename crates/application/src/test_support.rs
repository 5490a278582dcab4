use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use scopefinder_core::{AppError, AppResult};
use scopefinder_domain::{
    AccessPackage, AccessPackageSummary, ApplicationRef, GroupRef, ResourceRoleScope,
    ResourceScope,
};

use crate::directory_ports::{DirectoryClientFactory, DirectoryService};

#[derive(Default)]
pub(crate) struct FakeDirectory {
    pub(crate) packages: Vec<AccessPackage>,
    pub(crate) failing_packages: HashSet<String>,
    pub(crate) catalog_unavailable: bool,
    pub(crate) groups: Vec<GroupRef>,
    pub(crate) service_principals: Vec<ApplicationRef>,
    pub(crate) detail_calls: AtomicUsize,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

#[async_trait]
impl DirectoryService for FakeDirectory {
    async fn list_access_packages(&self) -> AppResult<Vec<AccessPackageSummary>> {
        if self.catalog_unavailable {
            return Err(AppError::upstream(
                "Failed to list access packages",
                "503 Service Unavailable",
            ));
        }

        Ok(self
            .packages
            .iter()
            .map(|package| AccessPackageSummary {
                id: package.id().to_owned(),
                display_name: package.display_name().to_owned(),
            })
            .collect())
    }

    async fn get_access_package(&self, access_package_id: &str) -> AppResult<AccessPackage> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_packages.contains(access_package_id) {
            return Err(AppError::upstream(
                "Failed to fetch access package",
                "429 Too Many Requests",
            ));
        }

        self.packages
            .iter()
            .find(|package| package.id() == access_package_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("access package '{access_package_id}'")))
    }

    async fn find_groups_by_display_name(&self, display_name: &str) -> AppResult<Vec<GroupRef>> {
        Ok(self
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
        Ok(self
            .service_principals
            .iter()
            .filter(|application| application.display_name.starts_with(prefix))
            .cloned()
            .collect())
    }
}

pub(crate) struct FakeDirectoryFactory {
    pub(crate) directory: Option<Arc<FakeDirectory>>,
    pub(crate) connects: AtomicUsize,
}

impl FakeDirectoryFactory {
    pub(crate) fn new(directory: FakeDirectory) -> Self {
        Self {
            directory: Some(Arc::new(directory)),
            connects: AtomicUsize::new(0),
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self {
            directory: None,
            connects: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DirectoryClientFactory for FakeDirectoryFactory {
    async fn connect(&self) -> AppResult<Arc<dyn DirectoryService>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.directory {
            Some(directory) => Ok(directory.clone() as Arc<dyn DirectoryService>),
            None => Err(AppError::upstream(
                "Failed to acquire directory credentials",
                "no credential available",
            )),
        }
    }
}

pub(crate) fn group_scope(group_id: &str, name: &str, role: &str) -> ResourceRoleScope {
    ResourceRoleScope::new(
        Some(ResourceScope::new(group_id, "AadGroup", Some(name.to_owned()))),
        Some(role.to_owned()),
    )
}
