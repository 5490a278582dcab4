use std::sync::Arc;

use scopefinder_core::{AppError, AppResult, NonEmptyString};
use scopefinder_domain::{ApplicationRef, GroupRef, Resolution};
use tracing::debug;

use crate::directory_ports::DirectoryClientFactory;

/// Translates human-entered names into origin identifiers usable by search.
#[derive(Clone)]
pub struct DirectoryResolverService {
    directory_factory: Arc<dyn DirectoryClientFactory>,
}

impl DirectoryResolverService {
    /// Creates a resolver service.
    #[must_use]
    pub fn new(directory_factory: Arc<dyn DirectoryClientFactory>) -> Self {
        Self { directory_factory }
    }

    /// Resolves a group by exact display name.
    ///
    /// Display names are not unique in the directory, so duplicates produce
    /// [`Resolution::Multiple`] rather than an arbitrary pick.
    pub async fn resolve_group(&self, group_name: &str) -> AppResult<Resolution<GroupRef>> {
        let group_name = NonEmptyString::new(group_name)
            .map_err(|_| AppError::Validation("groupName is required".to_owned()))?;

        let directory = self.directory_factory.connect().await?;
        let groups = directory
            .find_groups_by_display_name(group_name.as_str())
            .await?;
        debug!(
            group_name = %group_name.as_str(),
            candidate_count = groups.len(),
            "resolved group display name"
        );

        Resolution::from_candidates(groups).ok_or_else(|| {
            AppError::NotFound(format!("Group '{}' not found", group_name.as_str()))
        })
    }

    /// Resolves service principals whose display name starts with `application_name`.
    pub async fn resolve_application(
        &self,
        application_name: &str,
    ) -> AppResult<Resolution<ApplicationRef>> {
        let application_name = NonEmptyString::new(application_name)
            .map_err(|_| AppError::Validation("applicationName is required".to_owned()))?;

        let directory = self.directory_factory.connect().await?;
        let applications = directory
            .find_service_principals_by_prefix(application_name.as_str())
            .await?;
        debug!(
            application_name = %application_name.as_str(),
            candidate_count = applications.len(),
            "resolved application name prefix"
        );

        Resolution::from_candidates(applications).ok_or_else(|| {
            AppError::NotFound(format!(
                "Application '{}' not found",
                application_name.as_str()
            ))
        })
    }
}
