use std::fmt::{Display, Formatter};

use scopefinder_core::{AppResult, NonEmptyString};

use crate::governance::{AccessPackage, OriginSystem, ResourceRoleScope};

/// Placeholder emitted when the directory omits a resource or role name.
pub const NOT_AVAILABLE: &str = "N/A";

/// Kind of resource a search targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Enterprise application, matched by service principal object id.
    Application,
    /// Group, matched by group object id.
    Group,
    /// SharePoint Online site, matched by site URL.
    SharePoint,
    /// Any other transport value. Kept so it can be echoed back; matches nothing.
    Unrecognized(String),
}

impl SearchType {
    /// Parses a transport value. Unknown values are preserved, never rejected.
    #[must_use]
    pub fn from_transport(value: &str) -> Self {
        match value {
            "application" => Self::Application,
            "group" => Self::Group,
            "sharepoint" => Self::SharePoint,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Returns the transport value for this search type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Application => "application",
            Self::Group => "group",
            Self::SharePoint => "sharepoint",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Returns the origin system a scope must carry to match this type.
    #[must_use]
    pub fn origin_system(&self) -> Option<OriginSystem> {
        match self {
            Self::Application => Some(OriginSystem::AadApplication),
            Self::Group => Some(OriginSystem::AadGroup),
            Self::SharePoint => Some(OriginSystem::SharePointOnline),
            Self::Unrecognized(_) => None,
        }
    }
}

impl Display for SearchType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Search request resolved to an origin identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriterion {
    search_type: SearchType,
    search_value: NonEmptyString,
}

impl SearchCriterion {
    /// Creates a criterion. The value must not be blank.
    pub fn new(search_type: SearchType, search_value: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            search_type,
            search_value: NonEmptyString::new(search_value)?,
        })
    }

    /// Returns the targeted resource type.
    #[must_use]
    pub fn search_type(&self) -> &SearchType {
        &self.search_type
    }

    /// Returns the origin identifier to match.
    #[must_use]
    pub fn search_value(&self) -> &str {
        self.search_value.as_str()
    }

    /// Returns whether a resource role scope references the searched resource.
    ///
    /// Both the origin system and the origin id must match exactly.
    #[must_use]
    pub fn matches(&self, resource_role_scope: &ResourceRoleScope) -> bool {
        let Some(expected_system) = self.search_type.origin_system() else {
            return false;
        };
        let Some(scope) = resource_role_scope.scope() else {
            return false;
        };

        scope.known_origin_system() == Some(expected_system)
            && scope.origin_id() == self.search_value.as_str()
    }

    /// Collects match records for one access package, in scope order.
    #[must_use]
    pub fn match_access_package(&self, access_package: &AccessPackage) -> Vec<MatchRecord> {
        access_package
            .resource_role_scopes()
            .iter()
            .filter(|resource_role_scope| self.matches(resource_role_scope))
            .filter_map(|resource_role_scope| {
                MatchRecord::from_resource_role_scope(access_package, resource_role_scope)
            })
            .collect()
    }
}

/// One matching (access package, resource role scope) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Display name of the access package.
    pub access_package_name: String,
    /// Identifier of the access package.
    pub access_package_id: String,
    /// Resource display name, or [`NOT_AVAILABLE`].
    pub resource_name: String,
    /// Origin system tag of the resource.
    pub resource_type: String,
    /// Origin identifier of the resource.
    pub resource_id: String,
    /// Granted role display name, or [`NOT_AVAILABLE`].
    pub role_name: String,
}

impl MatchRecord {
    fn from_resource_role_scope(
        access_package: &AccessPackage,
        resource_role_scope: &ResourceRoleScope,
    ) -> Option<Self> {
        let scope = resource_role_scope.scope()?;

        Some(Self {
            access_package_name: access_package.display_name().to_owned(),
            access_package_id: access_package.id().to_owned(),
            resource_name: scope.display_name().unwrap_or(NOT_AVAILABLE).to_owned(),
            resource_type: scope.origin_system().to_owned(),
            resource_id: scope.origin_id().to_owned(),
            role_name: resource_role_scope
                .role_name()
                .unwrap_or(NOT_AVAILABLE)
                .to_owned(),
        })
    }
}
