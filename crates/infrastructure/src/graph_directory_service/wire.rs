use scopefinder_domain::{
    AccessPackage, AccessPackageSummary, ApplicationRef, GroupRef, ResourceRoleScope,
    ResourceScope,
};
use serde::Deserialize;

/// One page of an OData collection.
#[derive(Debug, Deserialize)]
pub(super) struct GraphPage<T> {
    #[serde(default = "Vec::new")]
    pub(super) value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub(super) next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphAccessPackageSummary {
    id: String,
    display_name: Option<String>,
}

impl From<GraphAccessPackageSummary> for AccessPackageSummary {
    fn from(value: GraphAccessPackageSummary) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphAccessPackage {
    id: String,
    display_name: Option<String>,
    resource_role_scopes: Option<Vec<GraphResourceRoleScope>>,
}

#[derive(Debug, Deserialize)]
struct GraphResourceRoleScope {
    role: Option<GraphResourceRole>,
    scope: Option<GraphResourceScope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphResourceRole {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphResourceScope {
    origin_id: Option<String>,
    origin_system: Option<String>,
    display_name: Option<String>,
}

impl From<GraphAccessPackage> for AccessPackage {
    fn from(value: GraphAccessPackage) -> Self {
        let resource_role_scopes = value
            .resource_role_scopes
            .unwrap_or_default()
            .into_iter()
            .map(|resource_role_scope| {
                ResourceRoleScope::new(
                    resource_role_scope.scope.and_then(GraphResourceScope::into_scope),
                    resource_role_scope.role.and_then(|role| role.display_name),
                )
            })
            .collect();

        AccessPackage::new(
            value.id,
            value.display_name.unwrap_or_default(),
            resource_role_scopes,
        )
    }
}

impl GraphResourceScope {
    /// Scopes without an origin id cannot be matched and are dropped.
    fn into_scope(self) -> Option<ResourceScope> {
        let origin_id = self.origin_id?;
        Some(ResourceScope::new(
            origin_id,
            self.origin_system.unwrap_or_default(),
            self.display_name,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphGroup {
    id: String,
    display_name: Option<String>,
}

impl From<GraphGroup> for GroupRef {
    fn from(value: GraphGroup) -> Self {
        Self {
            group_id: value.id,
            display_name: value.display_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphServicePrincipal {
    id: String,
    display_name: Option<String>,
    app_id: Option<String>,
}

impl From<GraphServicePrincipal> for ApplicationRef {
    fn from(value: GraphServicePrincipal) -> Self {
        Self {
            object_id: value.id,
            display_name: value.display_name.unwrap_or_default(),
            app_id: value.app_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphErrorEnvelope {
    pub(super) error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphErrorBody {
    #[serde(default)]
    pub(super) code: String,
    #[serde(default)]
    pub(super) message: String,
}
