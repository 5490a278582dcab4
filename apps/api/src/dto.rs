use scopefinder_application::SearchOutcome;
use scopefinder_domain::{ApplicationRef, GroupRef, MatchRecord, Resolution};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
}

/// Incoming payload for access package search.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/search-request.ts"
)]
pub struct SearchRequest {
    pub search_type: Option<String>,
    pub search_value: Option<String>,
}

/// One access package resource role scope that matched a search.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/match-record-response.ts"
)]
pub struct MatchRecordResponse {
    pub access_package_name: String,
    pub access_package_id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub resource_id: String,
    pub role_name: String,
}

impl From<MatchRecord> for MatchRecordResponse {
    fn from(value: MatchRecord) -> Self {
        Self {
            access_package_name: value.access_package_name,
            access_package_id: value.access_package_id,
            resource_name: value.resource_name,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            role_name: value.role_name,
        }
    }
}

/// Search results with the echoed criterion.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/search-response.ts"
)]
pub struct SearchResponse {
    pub results: Vec<MatchRecordResponse>,
    pub search_type: String,
    pub search_value: String,
    /// Access packages skipped because their details could not be fetched.
    pub partial_failures: Vec<String>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(value: SearchOutcome) -> Self {
        Self {
            results: value.records.into_iter().map(Into::into).collect(),
            search_type: value.criterion.search_type().as_str().to_owned(),
            search_value: value.criterion.search_value().to_owned(),
            partial_failures: value
                .partial_failures
                .into_iter()
                .map(|failure| failure.access_package_id)
                .collect(),
        }
    }
}

/// Incoming payload for group resolution.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolve-group-request.ts"
)]
pub struct ResolveGroupRequest {
    pub group_name: Option<String>,
}

/// API representation of a group.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-response.ts"
)]
pub struct GroupResponse {
    pub group_id: String,
    pub display_name: String,
}

impl From<GroupRef> for GroupResponse {
    fn from(value: GroupRef) -> Self {
        Self {
            group_id: value.group_id,
            display_name: value.display_name,
        }
    }
}

/// Several groups share the requested display name.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ambiguous-groups-response.ts"
)]
pub struct AmbiguousGroupsResponse {
    pub multiple: bool,
    pub groups: Vec<GroupResponse>,
}

/// Group resolution result.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolve-group-response.ts"
)]
pub enum ResolveGroupResponse {
    Single(GroupResponse),
    Multiple(AmbiguousGroupsResponse),
}

impl From<Resolution<GroupRef>> for ResolveGroupResponse {
    fn from(value: Resolution<GroupRef>) -> Self {
        match value {
            Resolution::Single(group) => Self::Single(group.into()),
            Resolution::Multiple(groups) => Self::Multiple(AmbiguousGroupsResponse {
                multiple: true,
                groups: groups.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

/// Incoming payload for application resolution.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolve-application-request.ts"
)]
pub struct ResolveApplicationRequest {
    pub application_name: Option<String>,
}

/// API representation of a service principal.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/application-response.ts"
)]
pub struct ApplicationResponse {
    pub object_id: String,
    pub display_name: String,
    pub app_id: String,
}

impl From<ApplicationRef> for ApplicationResponse {
    fn from(value: ApplicationRef) -> Self {
        Self {
            object_id: value.object_id,
            display_name: value.display_name,
            app_id: value.app_id,
        }
    }
}

/// Several service principals start with the requested prefix.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ambiguous-applications-response.ts"
)]
pub struct AmbiguousApplicationsResponse {
    pub multiple: bool,
    pub applications: Vec<ApplicationResponse>,
}

/// Application resolution result.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolve-application-response.ts"
)]
pub enum ResolveApplicationResponse {
    Single(ApplicationResponse),
    Multiple(AmbiguousApplicationsResponse),
}

impl From<Resolution<ApplicationRef>> for ResolveApplicationResponse {
    fn from(value: Resolution<ApplicationRef>) -> Self {
        match value {
            Resolution::Single(application) => Self::Single(application.into()),
            Resolution::Multiple(applications) => {
                Self::Multiple(AmbiguousApplicationsResponse {
                    multiple: true,
                    applications: applications.into_iter().map(Into::into).collect(),
                })
            }
        }
    }
}
