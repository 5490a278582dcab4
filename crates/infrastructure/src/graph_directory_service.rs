//! Microsoft Graph adapter for the directory port.

mod wire;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use scopefinder_application::{
    AccessToken, AccessTokenProvider, DirectoryClientFactory, DirectoryService,
};
use scopefinder_core::{AppError, AppResult};
use scopefinder_domain::{AccessPackage, AccessPackageSummary, ApplicationRef, GroupRef};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use self::wire::{
    GraphAccessPackage, GraphAccessPackageSummary, GraphErrorEnvelope, GraphGroup, GraphPage,
    GraphServicePrincipal,
};

/// Default Microsoft Graph endpoint.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const ACCESS_PACKAGES_PATH: &str = "identityGovernance/entitlementManagement/accessPackages";
const ACCESS_PACKAGE_EXPAND: &str = "resourceRoleScopes($expand=role,scope)";

/// Builds Graph clients bound to a token from the configured credential strategy.
#[derive(Clone)]
pub struct GraphDirectoryClientFactory {
    http_client: reqwest::Client,
    base_url: Url,
    token_provider: Arc<dyn AccessTokenProvider>,
}

impl GraphDirectoryClientFactory {
    /// Creates a factory. `base_url` is the Graph version root, e.g. `https://graph.microsoft.com/v1.0`.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        token_provider: Arc<dyn AccessTokenProvider>,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            token_provider,
        })
    }

    /// Returns the credential strategy label.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.token_provider.strategy_name()
    }
}

#[async_trait]
impl DirectoryClientFactory for GraphDirectoryClientFactory {
    async fn connect(&self) -> AppResult<Arc<dyn DirectoryService>> {
        let access_token = self.token_provider.access_token().await?;

        Ok(Arc::new(GraphDirectoryService {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            access_token,
        }))
    }
}

/// Directory client for one request, holding an acquired access token.
pub struct GraphDirectoryService {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: AccessToken,
}

impl GraphDirectoryService {
    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|error| AppError::Internal(format!("invalid Graph path '{path}': {error}")))
    }

    fn query_endpoint(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    fn access_package_endpoint(&self, access_package_id: &str) -> AppResult<Url> {
        let mut url = self.endpoint(ACCESS_PACKAGES_PATH)?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("Graph base URL cannot carry a path".to_owned()))?
            .push(access_package_id);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = request
            .bearer_auth(self.access_token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| AppError::upstream(operation, error))?;

        let status = response.status();
        if !status.is_success() {
            let details = describe_graph_failure(status, response.text().await);
            return Err(AppError::upstream(operation, details));
        }

        response
            .json::<T>()
            .await
            .map_err(|error| AppError::upstream(operation, format!("invalid response body: {error}")))
    }

    /// Follows `@odata.nextLink` until the last page. A link that was already
    /// fetched ends the walk.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        first_page: Url,
        operation: &str,
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut next_page = Some(first_page);

        while let Some(page_url) = next_page.take() {
            if !visited.insert(page_url.to_string()) {
                warn!(next_link = %page_url, "Graph repeated a paging link, stopping");
                break;
            }

            let page: GraphPage<T> = self
                .get_json(self.http_client.get(page_url), operation)
                .await?;
            items.extend(page.value);
            next_page = page
                .next_link
                .map(|link| {
                    Url::parse(link.as_str()).map_err(|error| {
                        AppError::upstream(operation, format!("invalid @odata.nextLink: {error}"))
                    })
                })
                .transpose()?;
        }

        Ok(items)
    }
}

#[async_trait]
impl DirectoryService for GraphDirectoryService {
    async fn list_access_packages(&self) -> AppResult<Vec<AccessPackageSummary>> {
        let first_page =
            self.query_endpoint(ACCESS_PACKAGES_PATH, &[("$select", "id,displayName")])?;

        let packages: Vec<GraphAccessPackageSummary> = self
            .get_all_pages(first_page, "Failed to list access packages")
            .await?;
        debug!(package_count = packages.len(), "listed access packages");

        Ok(packages.into_iter().map(Into::into).collect())
    }

    async fn get_access_package(&self, access_package_id: &str) -> AppResult<AccessPackage> {
        let request = self
            .http_client
            .get(self.access_package_endpoint(access_package_id)?)
            .query(&[("$expand", ACCESS_PACKAGE_EXPAND)]);

        let package: GraphAccessPackage = self
            .get_json(request, "Failed to fetch access package details")
            .await?;

        Ok(package.into())
    }

    async fn find_groups_by_display_name(&self, display_name: &str) -> AppResult<Vec<GroupRef>> {
        let filter = format!("displayName eq '{}'", odata_string_literal(display_name));
        let first_page = self.query_endpoint(
            "groups",
            &[("$filter", filter.as_str()), ("$select", "id,displayName")],
        )?;

        let groups: Vec<GraphGroup> = self
            .get_all_pages(first_page, "Failed to resolve group")
            .await?;

        Ok(groups.into_iter().map(Into::into).collect())
    }

    async fn find_service_principals_by_prefix(
        &self,
        prefix: &str,
    ) -> AppResult<Vec<ApplicationRef>> {
        let filter = format!("startswith(displayName,'{}')", odata_string_literal(prefix));
        let first_page = self.query_endpoint(
            "servicePrincipals",
            &[
                ("$filter", filter.as_str()),
                ("$select", "id,displayName,appId"),
            ],
        )?;

        let service_principals: Vec<GraphServicePrincipal> = self
            .get_all_pages(first_page, "Failed to resolve application")
            .await?;

        Ok(service_principals.into_iter().map(Into::into).collect())
    }
}

/// Parses the Graph root and guarantees a trailing slash so relative joins keep the version segment.
fn normalize_base_url(base_url: &str) -> AppResult<Url> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|error| AppError::Validation(format!("invalid GRAPH_BASE_URL: {error}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Validation(
            "GRAPH_BASE_URL must be an absolute http(s) URL".to_owned(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(path.as_str());
    }

    Ok(url)
}

/// Escapes a value for use inside a single-quoted OData string literal.
fn odata_string_literal(value: &str) -> String {
    value.replace('\'', "''")
}

fn describe_graph_failure(
    status: StatusCode,
    body: Result<String, impl std::fmt::Display>,
) -> String {
    match body {
        Ok(body) => describe_graph_error(status, body.as_str()),
        Err(error) => format!("{status}: unreadable error body: {error}"),
    }
}

fn describe_graph_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<GraphErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "{status}: {} ({})",
            envelope.error.message, envelope.error.code
        ),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{status}: {}", body.trim()),
    }
}

#[cfg(test)]
mod tests;
